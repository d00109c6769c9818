//! TravelMemory backend: trip routes behind Prometheus request metrics.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
