//! Data models for wire advice records and configuration.

pub mod config;
pub mod record;

pub use config::WirexConfig;
pub use record::{FieldValue, WireRecord};
