use crate::error::RenderError;
use crate::runtime::component::{Component, ComponentBase, Computation, Fragment};
use crate::runtime::slot::Slot;

/// Shows its body while the condition holds.
pub struct IfComponent {
    base: ComponentBase,
    condition: Option<Box<dyn Computation<bool>>>,
    body: Option<Box<dyn Fragment>>,
    child: Option<Box<dyn Component>>,
}

impl IfComponent {
    pub fn new(slot: Slot) -> Self {
        IfComponent {
            base: ComponentBase::new(slot),
            condition: None,
            body: None,
            child: None,
        }
    }

    pub fn set_condition(&mut self, condition: impl Computation<bool> + 'static) {
        self.condition = Some(Box::new(condition));
    }

    pub fn set_body(&mut self, body: Box<dyn Fragment>) {
        self.body = Some(body);
    }

    pub fn is_shown(&self) -> bool {
        self.child.is_some()
    }
}

impl Component for IfComponent {
    fn slot(&self) -> &Slot {
        self.base.slot()
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.base.ensure_alive()?;
        let condition = self
            .condition
            .as_ref()
            .ok_or(RenderError::MissingBinding("condition"))?;
        let body = self
            .body
            .as_ref()
            .ok_or(RenderError::MissingBinding("body"))?;

        if condition.perform() {
            if let Some(child) = self.child.as_mut() {
                child.render()?;
            } else {
                let mut child = body.create();
                child.render()?;
                self.base.slot().append(child.slot());
                self.child = Some(child);
            }
        } else if let Some(mut child) = self.child.take() {
            child.destroy();
        }
        self.base.mark_rendered();
        Ok(())
    }

    fn destroy(&mut self) {
        if self.base.destroy() {
            if let Some(mut child) = self.child.take() {
                child.destroy();
            }
        }
    }
}
