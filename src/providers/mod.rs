// ABOUTME: Provider API clients for the external fitness services
// ABOUTME: Each client maps logical operations onto authenticated HTTP calls

//! # Provider Clients
//!
//! One client per external fitness provider. Clients own their credential
//! stores and endpoint configuration; responses pass through as decoded JSON
//! without reshaping.

/// Shared date normalization and query helpers
pub mod core;
/// Hevy workout tracking client
pub mod hevy;
/// WHOOP recovery/sleep/strain client
pub mod whoop;

pub use self::core::{widen_end, widen_start, DateRange};
pub use hevy::{HevyClient, HevyConfig, KeySource};
pub use whoop::{TokenRecord, WhoopClient, WhoopConfig};
