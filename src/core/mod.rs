//! Core module - device codes, catalog, expansion and record sources

pub mod catalog;
pub mod config;
pub mod device_code;
pub mod expansion;
pub mod import;
pub mod shorthand;

pub use catalog::PartsCatalog;
pub use config::Config;
pub use device_code::{decode, encode, CodeError, DecodedCode};
pub use expansion::{process_boxes, BatchReport, ExpansionEngine};
pub use import::ImportError;
pub use shorthand::ShorthandResolver;
