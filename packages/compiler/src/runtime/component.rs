//! Components and binding capabilities
//!
//! A component owns a slot and keeps it in sync with its bindings on every
//! `render()`. Bindings are small capability traits; closures implement them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::RenderError;

use super::slot::Slot;

pub trait Component {
    fn slot(&self) -> &Slot;

    /// Bring the slot up to date with the current bindings. Re-entrant.
    fn render(&mut self) -> Result<(), RenderError>;

    /// Detach the slot and release owned children. Idempotent.
    fn destroy(&mut self);
}

/// Receives the value of a template variable.
pub trait Variable<T> {
    fn set(&self, value: T);
}

impl<T, F: Fn(T)> Variable<T> for F {
    fn set(&self, value: T) {
        self(value)
    }
}

/// Computes a value from the current data.
pub trait Computation<T> {
    fn perform(&self) -> T;
}

impl<T, F: Fn() -> T> Computation<T> for F {
    fn perform(&self) -> T {
        self()
    }
}

pub trait Action {
    fn perform(&self);
}

impl<F: Fn()> Action for F {
    fn perform(&self) {
        self()
    }
}

/// Creates fresh component instances of a piece of template content.
pub trait Fragment {
    fn create(&self) -> Box<dyn Component>;
}

impl<F: Fn() -> Box<dyn Component>> Fragment for F {
    fn create(&self) -> Box<dyn Component> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Uninitialized,
    Rendered,
    Destroyed,
}

/// Slot and lifecycle state shared by component implementations.
#[derive(Debug)]
pub struct ComponentBase {
    slot: Slot,
    state: ComponentState,
}

impl ComponentBase {
    pub fn new(slot: Slot) -> Self {
        ComponentBase {
            slot,
            state: ComponentState::Uninitialized,
        }
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    pub fn ensure_alive(&self) -> Result<(), RenderError> {
        match self.state {
            ComponentState::Destroyed => Err(RenderError::Destroyed),
            _ => Ok(()),
        }
    }

    pub fn mark_rendered(&mut self) {
        self.state = ComponentState::Rendered;
    }

    /// Move to `Destroyed` and detach the slot. Returns `false` if the
    /// component was already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.state == ComponentState::Destroyed {
            return false;
        }
        self.state = ComponentState::Destroyed;
        self.slot.delete();
        true
    }
}

/// Shared mutable cell backing a template variable.
pub struct VariableCell<T>(Rc<RefCell<T>>);

impl<T> VariableCell<T> {
    pub fn new(value: T) -> Self {
        VariableCell(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }
}

impl<T: Clone> VariableCell<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T: 'static> VariableCell<T> {
    /// A [`Variable`] writing into this cell.
    pub fn setter(&self) -> impl Fn(T) + 'static {
        let cell = self.clone();
        move |value| cell.set(value)
    }
}

impl<T> Clone for VariableCell<T> {
    fn clone(&self) -> Self {
        VariableCell(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for VariableCell<T> {
    fn default() -> Self {
        VariableCell::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for VariableCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VariableCell").field(&self.0.borrow()).finish()
    }
}

/// Renders a fixed list of children inside one slot.
pub struct CompositeComponent {
    base: ComponentBase,
    children: Vec<Box<dyn Component>>,
}

impl CompositeComponent {
    pub fn new(slot: Slot, children: Vec<Box<dyn Component>>) -> Self {
        CompositeComponent {
            base: ComponentBase::new(slot),
            children,
        }
    }

    pub fn state(&self) -> ComponentState {
        self.base.state()
    }
}

impl Component for CompositeComponent {
    fn slot(&self) -> &Slot {
        self.base.slot()
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.base.ensure_alive()?;
        for child in &mut self.children {
            child.render()?;
        }
        self.base.mark_rendered();
        Ok(())
    }

    fn destroy(&mut self) {
        if self.base.destroy() {
            for child in &mut self.children {
                child.destroy();
            }
        }
    }
}
