//! Synchronous client for a sharded key-value cluster that partitions its
//! keyspace across 16384 hash slots, following MOVED/ASK redirection as
//! slot ownership migrates.
//!
//! See [`client::ClusterClient`] for the entry point.

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod hash;
pub mod keys;
pub mod pool;
pub mod resp;
pub mod router;
pub mod slotmap;

pub use client::ClusterClient;
pub use config::{ClusterConfig, Endpoint};
pub use error::ClusterError;
