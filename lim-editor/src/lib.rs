//! Headless editor shell for Lim.
//!
//! [`Document`] is the explicit state a window would own (text, backing
//! file, dirty flag, title). [`insert_lookup`] connects it to the Wikipedia
//! summary lookup.

pub mod document;
pub mod insert;

pub use document::{Document, DocumentError};
pub use insert::insert_lookup;
