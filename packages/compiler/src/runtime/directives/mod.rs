//! Built-in directive components
//!
//! Runtime counterparts of the `flavour.directives` package.

mod foreach;
mod if_component;
mod text;

pub use foreach::ForEachComponent;
pub use if_component::IfComponent;
pub use text::TextComponent;

pub const FOREACH_CLASS: &str = "flavour.directives.ForEachComponent";
pub const IF_CLASS: &str = "flavour.directives.IfComponent";
pub const TEXT_CLASS: &str = "flavour.directives.TextComponent";
