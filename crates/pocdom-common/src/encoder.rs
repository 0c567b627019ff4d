//! Context-aware output encoding.
//!
//! Untrusted text must be escaped differently depending on where it lands in
//! the generated page. Each function here targets one context from the
//! [OWASP XSS Prevention Cheat Sheet](https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html):
//!
//! | context                          | function                          | escape form |
//! |----------------------------------|-----------------------------------|-------------|
//! | HTML element content (rule 1)    | [`encode_for_html_content`]       | `&#xHHHH;`  |
//! | HTML attribute value (rule 2)    | [`encode_for_html_attrib`]        | `&#xHHHH;`  |
//! | single-quoted JS value (rule 3)  | [`encode_for_js_data_value`]      | `\xHH`      |
//! | CSS property value (rule 4)      | [`escape_for_css`]                | `\xHH`      |
//! | URL parameter value (rule 5)     | [`escape_for_url_parameter_value`]| `%HH`       |
//!
//! Every function is total: empty input yields an empty string.

use std::fmt;
use std::fmt::Write as _;
use std::sync::{Arc, LazyLock};

use thiserror::Error;

/// Errors raised by the code point helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// [`code_point`] was handed something other than exactly one character.
    #[error("expected exactly one character, got {0}")]
    NotSingleCharacter(usize),
}

/// The characters rule 1 requires escaping in HTML element content.
const HTML_CONTENT_SPECIALS: [char; 6] = ['&', '<', '>', '"', '\'', '/'];

/// Characters below this code point that are not ASCII alphanumerics get
/// escaped by the strict (unquoted / JS / URL) encoders.
const STRICT_LIMIT: u32 = 256;

/// Whether the strict encoders leave `c` untouched.
const fn passes_strict(c: char) -> bool {
    c.is_ascii_alphanumeric() || c as u32 >= STRICT_LIMIT
}

/// Returns the 4-hex-digit HTML numeric character reference for a code point.
///
/// ```
/// assert_eq!(pocdom_common::encoder::hex_entity(0xE7), "&#x00E7;");
/// ```
#[must_use]
pub fn hex_entity(code_point: u32) -> String {
    format!("&#x{code_point:04X};")
}

/// Returns the code point of a single-character string.
///
/// # Errors
///
/// Returns [`EncodeError::NotSingleCharacter`] if `input` is empty or holds
/// more than one character.
pub fn code_point(input: &str) -> Result<u32, EncodeError> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => Err(EncodeError::NotSingleCharacter(input.chars().count())),
    }
}

/// Escape `&`, `<`, `>`, `"`, `'` and `/` for HTML element content.
///
/// All other characters pass through unchanged.
#[must_use]
pub fn encode_for_html_content(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if HTML_CONTENT_SPECIALS.contains(&c) {
            out.push_str(&hex_entity(c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape text for an HTML attribute value.
///
/// In a quoted context only the enclosing quote character is escaped
/// (`'` when `single_quotes`, otherwise `"`). Unquoted values escape every
/// character below U+0100 that is not an ASCII letter or digit.
#[must_use]
pub fn encode_for_html_attrib(input: &str, quoted: bool, single_quotes: bool) -> String {
    let quote = if single_quotes { '\'' } else { '"' };
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let escape = if quoted { c == quote } else { !passes_strict(c) };
        if escape {
            out.push_str(&hex_entity(c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape text for a single-quoted JavaScript data value using `\xHH`.
#[must_use]
pub fn encode_for_js_data_value(input: &str) -> String {
    escape_strict(input, "\\x")
}

/// Escape text for a CSS property value.
///
/// CSS accepts the same `\xHH` form as JavaScript data values, so this
/// delegates to [`encode_for_js_data_value`].
#[must_use]
pub fn escape_for_css(input: &str) -> String {
    encode_for_js_data_value(input)
}

/// Percent-encode text for a URL query parameter value.
#[must_use]
pub fn escape_for_url_parameter_value(input: &str) -> String {
    escape_strict(input, "%")
}

fn escape_strict(input: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if passes_strict(c) {
            out.push(c);
        } else {
            let _ = write!(out, "{prefix}{:02X}", c as u32);
        }
    }
    out
}

/// Encoding capability attached to a node.
///
/// The serializer asks a node's encoder to escape the node's attribute
/// names and values and the text of its text children. Nodes without an
/// encoder (script nodes by default) are emitted verbatim.
pub trait NodeEncoder: fmt::Debug + Send + Sync {
    /// Escape the value of a text child.
    fn encode_text(&self, text: &str) -> String;

    /// Escape an attribute name.
    fn encode_attr_name(&self, name: &str) -> String;

    /// Escape an attribute value written inside double quotes.
    fn encode_attr_value(&self, value: &str) -> String;
}

/// The default encoder for HTML elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlEncoder;

impl NodeEncoder for HtmlEncoder {
    fn encode_text(&self, text: &str) -> String {
        encode_for_html_content(text)
    }

    fn encode_attr_name(&self, name: &str) -> String {
        encode_for_html_content(name)
    }

    fn encode_attr_value(&self, value: &str) -> String {
        encode_for_html_attrib(value, true, false)
    }
}

static HTML_ENCODER: LazyLock<Arc<dyn NodeEncoder>> = LazyLock::new(|| Arc::new(HtmlEncoder));

/// Shared handle to the immutable default [`HtmlEncoder`].
#[must_use]
pub fn html_encoder() -> Arc<dyn NodeEncoder> {
    Arc::clone(&HTML_ENCODER)
}
