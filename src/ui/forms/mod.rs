//! Form rendering module
//!
//! - `field_renderer`: per-type field widgets
//! - `section`: the current section with its fields

mod field_renderer;
mod section;

pub use section::draw_section;
