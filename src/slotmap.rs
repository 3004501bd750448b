//! Slot map (C4): which endpoint owns each hash slot, and the rebuild
//! protocol that refreshes that mapping from `CLUSTER SLOTS`.

use crate::config::{ClusterConfig, Endpoint};
use crate::connection::Connection;
use crate::hash::SLOT_COUNT;
use crate::resp::types::RespValue;
use log::{debug, warn};
use std::collections::HashMap;

/// The endpoints that own one slot: a primary plus up to
/// `slot_endpoint_bound` replicas, in the order `CLUSTER SLOTS` returned
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub primary: Endpoint,
    pub replicas: Vec<Endpoint>,
}

impl SlotEntry {
    pub fn nodes(&self) -> impl Iterator<Item = &Endpoint> {
        std::iter::once(&self.primary).chain(self.replicas.iter())
    }
}

/// Sparse slot → owner mapping. A missing entry means ownership is
/// unknown for that slot — callers fall back to a random connection.
#[derive(Debug, Default)]
pub struct SlotMap {
    entries: HashMap<u16, SlotEntry>,
    /// Set when every bootstrap endpoint failed during the last rebuild
    /// attempt, so the next command should retry the rebuild immediately.
    pub refresh_asap: bool,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: u16) -> Option<&SlotEntry> {
        self.entries.get(&slot)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over every known slot entry, for random-endpoint selection
    /// when a command carries no key.
    pub fn entries(&self) -> impl Iterator<Item = &SlotEntry> {
        self.entries.values()
    }

    /// Rebuilds the map by querying `CLUSTER SLOTS` from each bootstrap
    /// endpoint in order, stopping at the first success. A full replace,
    /// never a partial merge: a half-applied topology is worse than the
    /// stale one it would have replaced.
    pub fn rebuild(&mut self, config: &ClusterConfig) {
        debug!("rebuilding slot map from {} bootstrap endpoint(s)", config.bootstrap.len());
        for endpoint in &config.bootstrap {
            match query_cluster_slots(endpoint, config.slot_endpoint_bound) {
                Ok(entries) => {
                    debug!("slot map rebuilt from {endpoint} ({} entries)", entries.len());
                    self.entries = entries;
                    self.refresh_asap = false;
                    return;
                }
                Err(e) => {
                    warn!("slot map rebuild failed against {endpoint}: {e}");
                }
            }
        }
        warn!("slot map rebuild failed against every bootstrap endpoint");
        self.refresh_asap = true;
    }

    /// Applies a single MOVED/ASK redirect hint without a full rebuild, so
    /// the very next lookup for this slot goes straight to the new owner.
    /// Replaces the entry wholesale (any previously known replicas are
    /// discarded along with the stale primary) rather than patching just
    /// the primary field, matching the redirection handling in
    /// `hicluster.c::send_cluster_command`.
    pub fn patch(&mut self, slot: u16, new_primary: Endpoint) {
        self.entries.insert(slot, SlotEntry { primary: new_primary, replicas: Vec::new() });
    }
}

fn query_cluster_slots(
    endpoint: &Endpoint,
    slot_endpoint_bound: usize,
) -> Result<HashMap<u16, SlotEntry>, crate::error::ClusterError> {
    let mut conn = Connection::connect(&endpoint.addr())?;
    let reply = conn.execute(&[b"CLUSTER", b"SLOTS"])?;
    parse_cluster_slots(reply, slot_endpoint_bound)
}

fn parse_cluster_slots(
    reply: RespValue,
    slot_endpoint_bound: usize,
) -> Result<HashMap<u16, SlotEntry>, crate::error::ClusterError> {
    let rows = reply
        .into_array()
        .ok_or_else(|| crate::error::ClusterError::Protocol("CLUSTER SLOTS did not return an array".into()))?;

    let mut entries = HashMap::new();
    for row in rows {
        let mut fields = row
            .into_array()
            .ok_or_else(|| crate::error::ClusterError::Protocol("CLUSTER SLOTS row is not an array".into()))?
            .into_iter();

        let start = fields
            .next()
            .and_then(|v| v.as_int())
            .ok_or_else(|| crate::error::ClusterError::Protocol("missing slot range start".into()))?;
        let end = fields
            .next()
            .and_then(|v| v.as_int())
            .ok_or_else(|| crate::error::ClusterError::Protocol("missing slot range end".into()))?;

        // The bound covers the whole ordered endpoint list for this slot,
        // primary included, not just the replicas after it.
        let nodes: Vec<Endpoint> = fields.filter_map(parse_node_triple).take(slot_endpoint_bound).collect();
        let Some((primary, replicas)) = nodes.split_first() else {
            continue;
        };
        let replicas: Vec<Endpoint> = replicas.to_vec();

        for slot in start.max(0) as u16..=(end.min(SLOT_COUNT as i64 - 1) as u16) {
            entries.insert(
                slot,
                SlotEntry { primary: primary.clone(), replicas: replicas.clone() },
            );
        }
    }
    Ok(entries)
}

fn parse_node_triple(value: RespValue) -> Option<Endpoint> {
    let mut fields = value.into_array()?.into_iter();
    let host = fields.next()?.as_str()?.to_string();
    let port = fields.next()?.as_int()? as u16;
    Some(Endpoint::new(host, port))
}
