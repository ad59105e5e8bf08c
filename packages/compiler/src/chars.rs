/*
 * Character Codes
 *
 * Characters the markup scanner dispatches on.
 */

//! Character constants used throughout the compiler

// Special characters
pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const FF: char = '\x0C';
pub const CR: char = '\r';
pub const SPACE: char = ' ';

// Punctuation
pub const DQ: char = '"';
pub const SQ: char = '\'';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const QUESTION: char = '?';

/// Check if character is markup whitespace
pub fn is_whitespace(ch: char) -> bool {
    ch == SPACE || ch == TAB || ch == LF || ch == CR || ch == FF
}

/// Check if character is a quote
pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ
}

/// Check if character ends a tag or attribute name
pub fn is_name_end(ch: char) -> bool {
    is_whitespace(ch) || ch == GT || ch == LT || ch == SLASH || ch == EQ || is_quote(ch) || ch == EOF
}
