//! inwall: in-wall junction box device codes and parts lists
//!
//! Encodes box markups into compact device codes, hands out two-character
//! legend aliases, and expands codes into a merged bill of materials.

pub mod cli;
pub mod core;
pub mod entities;
