//! Lifecycle facade (C6): the public entry point, owning the cluster
//! context (slot map + connection cache) across calls.

use crate::config::ClusterConfig;
use crate::error::ClusterError;
use crate::pool::ConnectionCache;
use crate::resp::types::RespValue;
use crate::router::Router;
use crate::slotmap::SlotMap;
use log::debug;

/// Owns the slot map and connection cache between calls. Equivalent to the
/// original source's `clusterCtx`.
struct ClusterContext {
    config: ClusterConfig,
    slots: SlotMap,
    conns: ConnectionCache,
}

/// A synchronous client for a sharded key-value cluster.
///
/// Not `Send`/`Sync`: the connection cache is a plain, unsynchronized
/// `HashMap`, so one `ClusterClient` belongs to one thread at a time —
/// thread-safety is an explicit non-goal.
pub struct ClusterClient {
    ctx: ClusterContext,
}

impl ClusterClient {
    /// Opens a cluster client, eagerly populating the slot map from the
    /// bootstrap endpoints (equivalent to `init_connection`).
    pub fn new(config: ClusterConfig) -> Result<Self, ClusterError> {
        let mut slots = SlotMap::new();
        slots.refresh_asap = true;
        slots.rebuild(&config);
        let conns = ConnectionCache::new(config.max_conn);
        debug!("cluster client initialized with {} bootstrap endpoint(s)", config.bootstrap.len());
        Ok(Self { ctx: ClusterContext { config, slots, conns } })
    }

    /// Sends one command to the cluster, following redirects as needed.
    pub fn execute(&mut self, argv: &[&[u8]]) -> Result<RespValue, ClusterError> {
        Router::new(&self.ctx.config, &mut self.ctx.slots, &mut self.ctx.conns).send(argv)
    }

    /// Number of connections currently cached.
    pub fn cached_connections(&self) -> usize {
        self.ctx.conns.len()
    }
}

// No explicit Drop impl is needed: ConnectionCache's HashMap<String,
// Connection> drops each TcpStream (and thus closes the socket) when the
// client itself is dropped — equivalent to `destroy_connection`.
