//! HTML output for pocdom trees.
//!
//! - [`generate`] turns a subtree into markup, escaping untrusted text with
//!   each element's encoder.
//! - [`elements`] builds the common HTML elements with sensible defaults.
//!
//! ```
//! use pocdom_dom::DomTree;
//! use pocdom_html::elements::{self, InputType};
//!
//! let mut tree = DomTree::new();
//! let form = elements::form(&mut tree, "/transfer", "POST", &[]);
//! let amount = elements::input(&mut tree, "amount", InputType::Hidden, "1000", &[]);
//! tree.append(form, amount)?;
//!
//! assert_eq!(
//!     pocdom_html::generate(&tree, form)?,
//!     "<form action=\"/transfer\" method=\"POST\">\r\n \
//!      <input name=\"amount\" type=\"hidden\" value=\"1000\"></input>\r\n</form>"
//! );
//! # Ok::<(), pocdom_dom::DomError>(())
//! ```

pub mod elements;
pub mod generate;

pub use generate::{GenerateOptions, Indent, generate, generate_indented, generate_with};
