//! Quote and availability engine for a small vacation-rental property.
//!
//! The [`quote`] module holds the pure pricing pipeline; the remaining modules
//! carry the configuration, error and logging plumbing shared with the API
//! service.

pub mod config;
pub mod error;
pub mod quote;
pub mod telemetry;
