//! Render target
//!
//! An in-memory node tree standing in for the DOM. A [`Slot`] is a cheap,
//! clonable handle; appending a slot detaches it from its previous parent.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::ml_parser::is_void_element;

#[derive(Debug, Clone, PartialEq)]
pub enum SlotKind {
    /// Groups children without producing markup of its own.
    Container,
    Element {
        tag_name: String,
        attributes: IndexMap<String, String>,
    },
    /// Literal template markup, emitted verbatim.
    Markup(String),
    /// Computed text, escaped on output.
    Text(String),
}

struct SlotNode {
    kind: SlotKind,
    parent: Weak<RefCell<SlotNode>>,
    children: Vec<Slot>,
}

#[derive(Clone)]
pub struct Slot(Rc<RefCell<SlotNode>>);

impl Slot {
    fn with_kind(kind: SlotKind) -> Slot {
        Slot(Rc::new(RefCell::new(SlotNode {
            kind,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    pub fn container() -> Slot {
        Slot::with_kind(SlotKind::Container)
    }

    pub fn element(tag_name: impl Into<String>, attributes: IndexMap<String, String>) -> Slot {
        Slot::with_kind(SlotKind::Element {
            tag_name: tag_name.into(),
            attributes,
        })
    }

    pub fn markup(value: impl Into<String>) -> Slot {
        Slot::with_kind(SlotKind::Markup(value.into()))
    }

    pub fn text(value: impl Into<String>) -> Slot {
        Slot::with_kind(SlotKind::Text(value.into()))
    }

    /// Append `child` as the last child, detaching it from its current parent.
    pub fn append(&self, child: &Slot) {
        if self.ptr_eq(child) {
            return;
        }
        child.delete();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Detach from the parent slot, if any.
    pub fn delete(&self) {
        let parent = std::mem::take(&mut self.0.borrow_mut().parent);
        if let Some(parent) = parent.upgrade() {
            parent
                .borrow_mut()
                .children
                .retain(|sibling| !sibling.ptr_eq(self));
        }
    }

    pub fn parent(&self) -> Option<Slot> {
        self.0.borrow().parent.upgrade().map(Slot)
    }

    pub fn children(&self) -> Vec<Slot> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn kind(&self) -> SlotKind {
        self.0.borrow().kind.clone()
    }

    /// Replace the content of a text slot. Other slots are left untouched.
    pub fn set_text(&self, value: impl Into<String>) {
        if let SlotKind::Text(text) = &mut self.0.borrow_mut().kind {
            *text = value.into();
        }
    }

    pub fn ptr_eq(&self, other: &Slot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Serialize this slot and its descendants.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let node = self.0.borrow();
        match &node.kind {
            SlotKind::Container => {
                for child in &node.children {
                    child.write_html(out);
                }
            }
            SlotKind::Element {
                tag_name,
                attributes,
            } => {
                out.push('<');
                out.push_str(tag_name);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "&quot;"));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(tag_name) {
                    return;
                }
                for child in &node.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag_name);
                out.push('>');
            }
            SlotKind::Markup(value) => out.push_str(value),
            SlotKind::Text(value) => escape_text(value, out),
        }
    }
}

fn escape_text(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Slot")
            .field("kind", &node.kind)
            .field("children", &node.children)
            .finish()
    }
}
