//! Common utilities for the pocdom document engine.
//!
//! This crate provides infrastructure shared by every pocdom component:
//! - **Encoder** - context-aware escaping of untrusted text
//! - **Warning System** - colored, deduplicated terminal output for lossy input

pub mod encoder;
pub mod warning;

pub use encoder::{EncodeError, HtmlEncoder, NodeEncoder, html_encoder};
