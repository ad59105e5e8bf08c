use crate::error::RenderError;
use crate::runtime::component::{Component, ComponentBase, Computation, Fragment, Variable};
use crate::runtime::slot::Slot;

/// Repeats its body once per element of a collection.
///
/// Children are reconciled by position: on each render the first
/// `min(old, new)` children are re-rendered in place, missing ones are created
/// and appended in index order, and surplus ones are destroyed.
pub struct ForEachComponent<T> {
    base: ComponentBase,
    collection: Option<Box<dyn Computation<Vec<T>>>>,
    element_variable: Option<Box<dyn Variable<T>>>,
    index_variable: Option<Box<dyn Variable<usize>>>,
    body: Option<Box<dyn Fragment>>,
    computed_collection: Vec<T>,
    child_components: Vec<Box<dyn Component>>,
}

impl<T: Clone> ForEachComponent<T> {
    pub fn new(slot: Slot) -> Self {
        ForEachComponent {
            base: ComponentBase::new(slot),
            collection: None,
            element_variable: None,
            index_variable: None,
            body: None,
            computed_collection: Vec::new(),
            child_components: Vec::new(),
        }
    }

    pub fn set_collection(&mut self, collection: impl Computation<Vec<T>> + 'static) {
        self.collection = Some(Box::new(collection));
    }

    pub fn set_element_variable(&mut self, variable: impl Variable<T> + 'static) {
        self.element_variable = Some(Box::new(variable));
    }

    pub fn set_index_variable(&mut self, variable: impl Variable<usize> + 'static) {
        self.index_variable = Some(Box::new(variable));
    }

    pub fn set_body(&mut self, body: Box<dyn Fragment>) {
        self.body = Some(body);
    }

    /// The collection seen by the last render.
    pub fn computed_collection(&self) -> &[T] {
        &self.computed_collection
    }

    pub fn child_count(&self) -> usize {
        self.child_components.len()
    }
}

impl<T: Clone> Component for ForEachComponent<T> {
    fn slot(&self) -> &Slot {
        self.base.slot()
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.base.ensure_alive()?;
        let collection = self
            .collection
            .as_ref()
            .ok_or(RenderError::MissingBinding("collection"))?;
        let element_variable = self
            .element_variable
            .as_ref()
            .ok_or(RenderError::MissingBinding("element_variable"))?;
        let body = self
            .body
            .as_ref()
            .ok_or(RenderError::MissingBinding("body"))?;

        // A failing child does not stop the pass; the first error is returned
        // once children and collection agree in length again.
        let mut first_error = None;
        let items = collection.perform();
        let reused = items.len().min(self.child_components.len());
        for (index, item) in items.iter().enumerate() {
            element_variable.set(item.clone());
            if let Some(index_variable) = &self.index_variable {
                index_variable.set(index);
            }
            let rendered = if index < reused {
                self.child_components[index].render()
            } else {
                let mut child = body.create();
                let rendered = child.render();
                self.base.slot().append(child.slot());
                self.child_components.push(child);
                rendered
            };
            if let Err(err) = rendered {
                first_error.get_or_insert(err);
            }
        }
        for mut child in self.child_components.drain(items.len()..) {
            child.destroy();
        }

        self.computed_collection = items;
        self.base.mark_rendered();
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn destroy(&mut self) {
        if self.base.destroy() {
            for child in &mut self.child_components {
                child.destroy();
            }
            self.child_components.clear();
        }
    }
}
