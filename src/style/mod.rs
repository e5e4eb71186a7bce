//! Style resolution: from tags, semantic classes and inline `style`
//! attributes to document formatting.
//!
//! - [`StyleContext`] is the immutable state threaded through the walk
//! - [`resolve`] derives a child context from its parent and one element
//! - [`rules`] holds the fixed heading and semantic-class tables
//! - [`InlineStyle`] parses the subset of inline CSS that is honored

mod context;
mod declaration;
pub mod rules;
mod values;

pub use context::{BlockFormat, StyleContext, resolve};
pub use declaration::InlineStyle;
