//! Connection cache (C3): one live connection per node address, bounded in
//! size, evicted uniformly at random when full — never LRU, and never the
//! original source's `rand() % (size + 1)` off-by-one.

use crate::connection::Connection;
use crate::error::ClusterError;
use log::debug;
use rand::Rng;
use std::collections::HashMap;

/// A bounded cache of one connection per cluster node address.
pub struct ConnectionCache {
    conns: HashMap<String, Connection>,
    max_conn: usize,
}

impl ConnectionCache {
    pub fn new(max_conn: usize) -> Self {
        Self { conns: HashMap::new(), max_conn }
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Returns a live, liveness-checked connection to `addr`, connecting
    /// (and evicting to make room, if necessary) on a cache miss.
    pub fn get_or_connect(&mut self, addr: &str) -> Result<&mut Connection, ClusterError> {
        if self.conns.contains_key(addr) {
            if self.conns.get_mut(addr).unwrap().ping().unwrap_or(false) {
                return Ok(self.conns.get_mut(addr).unwrap());
            }
            debug!("evicting stale connection to {addr} (failed liveness PING)");
            self.conns.remove(addr);
        }

        self.evict_if_full();
        let conn = Connection::connect(addr)?;
        debug!("opened connection to {addr} ({} cached)", self.conns.len() + 1);
        Ok(self.conns.entry(addr.to_string()).or_insert(conn))
    }

    /// Drops the connection to `addr`, if one is cached, without replacing it.
    pub fn invalidate(&mut self, addr: &str) {
        self.conns.remove(addr);
    }

    /// Evicts one connection chosen uniformly at random from `[0, len)` if
    /// the cache is at capacity. The original C implementation drew
    /// `rand() % (size + 1)`, which is biased and can walk past the last
    /// entry; this draws uniformly over the actual entries instead.
    fn evict_if_full(&mut self) {
        if self.conns.len() < self.max_conn {
            return;
        }
        let victim_idx = rand::thread_rng().gen_range(0..self.conns.len());
        if let Some(key) = self.conns.keys().nth(victim_idx).cloned() {
            debug!("evicting connection to {key} (cache at capacity {})", self.max_conn);
            self.conns.remove(&key);
        }
    }
}
