//! CLI command implementations

pub mod bom;
pub mod completions;
pub mod decode;
pub mod encode;
pub mod legend;
pub mod template;
