//! `crowdcast`: occupancy forecasting for Wi-Fi/BLE crowd sensors.
//!
//! The crate is split along the Explicit Module Boundary Pattern (EMBP):
//! - `engine` – pure forecasting and analytics over a batch of readings
//! - `store` – append-only readings file
//! - `routes` – HTTP gateway exposing ingestion and query endpoints
//! - `config` – environment-driven configuration
//!
//! The binary in `main.rs` wires these together; integration tests reuse
//! the same `routes::router` entry point.

pub mod config;
pub mod engine;
pub mod models;
pub mod routes;
pub mod store;

pub use config::Config;

// Re-exported so sibling modules refer to `crate::Reading` rather than
// reaching into `models` directly.
pub use models::{PayloadError, Reading};
pub use store::ReadingStore;
