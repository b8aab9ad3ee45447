//! Entity type definitions
//!
//! - [`BoxConfiguration`] - one marked-up junction box
//! - [`Part`] - a catalog part with quantity and category
//! - [`PartCollection`] - merged parts for one device code and bundle
//! - [`PartTotal`] - parts merged across every collection

pub mod box_config;
pub mod part;

pub use box_config::{BoxConfiguration, ConnectorCounts};
pub use part::{Part, PartCategory, PartCollection, PartTotal};
