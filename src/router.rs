//! Router (C5): the redirection state machine that sends one command to the
//! cluster, following MOVED/ASK replies until a final answer or the
//! redirection budget is exhausted.

use crate::config::ClusterConfig;
use crate::error::{ClusterError, RedirectKind};
use crate::hash::hash_slot;
use crate::keys::key_of;
use crate::pool::ConnectionCache;
use crate::resp::types::RespValue;
use crate::slotmap::SlotMap;
use log::{debug, warn};
use rand::Rng;
use std::thread;
use std::time::Duration;

/// Routes one command to the cluster, owning the slot map and connection
/// cache a [`crate::client::ClusterClient`] hands it.
pub struct Router<'a> {
    config: &'a ClusterConfig,
    slots: &'a mut SlotMap,
    conns: &'a mut ConnectionCache,
}

impl<'a> Router<'a> {
    pub fn new(config: &'a ClusterConfig, slots: &'a mut SlotMap, conns: &'a mut ConnectionCache) -> Self {
        Self { config, slots, conns }
    }

    /// Sends `argv` to the cluster, following redirects until a final
    /// reply or `config.redirection_ttl` hops are exhausted.
    pub fn send(&mut self, argv: &[&[u8]]) -> Result<RespValue, ClusterError> {
        if self.slots.refresh_asap {
            self.slots.rebuild(self.config);
        }

        let slot = key_of(argv).map(hash_slot);
        let mut try_random = slot.is_none();
        let mut asking = false;
        let mut ttl = self.config.redirection_ttl;

        loop {
            if ttl == 0 {
                warn!("redirection budget exhausted after {} hops", self.config.redirection_ttl);
                return Err(ClusterError::Redirection { hops: self.config.redirection_ttl });
            }
            ttl -= 1;

            // A command with no key always routes randomly, for the whole
            // lifetime of this call — `slot` has no slot to fall back to.
            let addr = if slot.is_none() || try_random {
                self.random_addr()
            } else {
                self.addr_for_slot(slot.unwrap())
            };
            try_random = false;

            let Some(addr) = addr else {
                try_random = true;
                continue;
            };

            let conn = match self.conns.get_or_connect(&addr) {
                Ok(conn) => conn,
                Err(_) => {
                    try_random = true;
                    continue;
                }
            };

            if asking {
                asking = false;
                match conn.execute_asking(argv) {
                    Err(_) => {
                        // A transport-level failure against this node: the
                        // connection is no good, drop it and try elsewhere.
                        self.conns.invalidate(&addr);
                        try_random = true;
                        continue;
                    }
                    Ok((asking_reply, reply)) => {
                        // Either reply being null or an error means this
                        // ASKING attempt failed — retry randomly, never
                        // re-inspect it for a fresh MOVED/ASK redirect.
                        if asking_reply.is_null() || asking_reply.is_error() || reply.is_null() || reply.is_error() {
                            try_random = true;
                            if ttl < self.config.redirection_ttl / 2 {
                                thread::sleep(Duration::from_micros(100));
                            }
                            continue;
                        }
                        return Ok(reply);
                    }
                }
            }

            match conn.execute(argv) {
                Err(_) => {
                    self.conns.invalidate(&addr);
                    try_random = true;
                    continue;
                }
                Ok(reply) => {
                    let Some(msg) = reply.as_error_msg() else {
                        return Ok(reply);
                    };

                    match RedirectKind::from_error_msg(msg) {
                        RedirectKind::Moved { slot: moved_slot, addr } => {
                            debug!("MOVED {moved_slot} -> {addr}");
                            if let Ok(endpoint) = crate::config::parse_host_port(&addr) {
                                self.slots.patch(moved_slot, endpoint);
                            }
                            self.slots.refresh_asap = true;
                        }
                        RedirectKind::Ask { slot: ask_slot, addr } => {
                            debug!("ASK {ask_slot} -> {addr}");
                            if let Ok(endpoint) = crate::config::parse_host_port(&addr) {
                                self.slots.patch(ask_slot, endpoint);
                            }
                            asking = true;
                        }
                        RedirectKind::Other => {
                            return Ok(reply);
                        }
                    }
                }
            }
        }
    }

    fn addr_for_slot(&self, slot: u16) -> Option<String> {
        self.slots.get(slot).map(|entry| entry.primary.addr())
    }

    /// Picks an endpoint uniformly at random from the slot map. Yields
    /// `None` when the map is empty — the caller treats that as a
    /// transient failure and retries within its TTL, rather than this
    /// function substituting some other endpoint of its own choosing.
    /// Draws from `[0, len)`, unlike the original source's
    /// `rand() % (size + 1)`.
    fn random_addr(&self) -> Option<String> {
        let len = self.slots.len();
        if len == 0 {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..len);
        self.slots.entries().nth(idx).map(|entry| entry.primary.addr())
    }
}
