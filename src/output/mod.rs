//! Output of the rendered topology.
//!
//! - [`mermaid`] - Mermaid flowchart rendering
//! - [`file`] - Writing the diagram file

mod file;
mod mermaid;

pub use file::write_diagram;
pub use mermaid::{render_diagram, render_lines, RenderOptions};
