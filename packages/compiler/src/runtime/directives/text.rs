use crate::error::RenderError;
use crate::runtime::component::{Component, ComponentBase, Computation};
use crate::runtime::slot::Slot;

/// Writes the display form of a value as escaped text.
pub struct TextComponent {
    base: ComponentBase,
    text: Slot,
    value: Option<Box<dyn Computation<String>>>,
}

impl TextComponent {
    pub fn new(slot: Slot) -> Self {
        let text = Slot::text("");
        slot.append(&text);
        TextComponent {
            base: ComponentBase::new(slot),
            text,
            value: None,
        }
    }

    pub fn set_value(&mut self, value: impl Computation<String> + 'static) {
        self.value = Some(Box::new(value));
    }
}

impl Component for TextComponent {
    fn slot(&self) -> &Slot {
        self.base.slot()
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.base.ensure_alive()?;
        let value = self
            .value
            .as_ref()
            .ok_or(RenderError::MissingBinding("value"))?;
        self.text.set_text(value.perform());
        self.base.mark_rendered();
        Ok(())
    }

    fn destroy(&mut self) {
        self.base.destroy();
    }
}
