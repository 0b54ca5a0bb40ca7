//! Fabric zoning CLI
//!
//! Presentation layer of the `fczone` tool: command implementations, report
//! rendering and the mapping of errors to process exit codes.

pub mod commands;
pub mod context;
pub mod exit;
pub mod render;
