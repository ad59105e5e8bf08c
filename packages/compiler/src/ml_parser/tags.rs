//! ML Parser Tags
//!
//! Tag classification for the lenient markup parser.

/// Tag content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    RawText,
    ParsableData,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that never have content or an end tag.
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

pub fn get_content_type(name: &str) -> TagContentType {
    if RAW_TEXT_ELEMENTS.iter().any(|tag| tag.eq_ignore_ascii_case(name)) {
        TagContentType::RawText
    } else {
        TagContentType::ParsableData
    }
}

/// Split `prefix:local` into its parts.
///
/// Only a separator after at least one character counts, so `:foo` and `foo`
/// have no namespace prefix.
pub fn split_ns_name(name: &str) -> Option<(&str, &str)> {
    match name.find(':') {
        Some(index) if index > 0 => Some((&name[..index], &name[index + 1..])),
        _ => None,
    }
}
