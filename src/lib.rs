//! Command line host for `anchor_grid`: parameter loading, telemetry and export.

pub mod config;
pub mod export;
pub mod telemetry;
