//! Orgchart - organization tree engine for the employee management system
//!
//! This crate turns flat employee records into a navigable org chart:
//! forest construction with cycle and orphan recovery, pre-order
//! flattening with expansion state, and role-scoped row filtering.

pub mod config;
pub mod entity;
pub mod error;
pub mod permission;
pub mod report;
pub mod source;
pub mod state;
pub mod tree;

// Re-export commonly used types
pub use config::Config;
pub use error::{OrgError, OrgResult};
pub use state::OrgChartState;
pub use tree::OrgTreeEngine;
