//! In-process simulation of the coordination store
//!
//! `MemoryStore` models exactly the store semantics the lock protocol
//! depends on: sessions with ephemeral-node ownership, per-parent
//! zero-padded sequence counters, and single-fire existence watches. It
//! backs the workspace test suites and doubles as an embedded store for
//! single-process use.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use taro_common::paths;

use crate::error::{Result, StoreError};
use crate::model::{CreateMode, ExistsWatch, WatchEvent};

struct Node {
    data: Vec<u8>,
    /// Session that owns this node; `Some` only for ephemerals
    owner: Option<u64>,
    /// Counter for sequential children, kept on the parent as the store does
    next_sequence: u64,
}

impl Node {
    fn new(data: Vec<u8>, owner: Option<u64>) -> Self {
        Self {
            data,
            owner,
            next_sequence: 0,
        }
    }
}

struct Namespace {
    nodes: BTreeMap<String, Node>,
    watches: HashMap<String, Vec<oneshot::Sender<WatchEvent>>>,
    next_session: u64,
}

impl Namespace {
    fn fire(&mut self, path: &str, event: WatchEvent) {
        if let Some(senders) = self.watches.remove(path) {
            for tx in senders {
                // A closed receiver just means the waiter went away first
                let _ = tx.send(event);
            }
        }
    }

    /// Prefix every child key starts with; children of a path are contiguous
    /// in the map's byte ordering
    fn children_prefix(path: &str) -> String {
        if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        }
    }

    fn has_children(&self, path: &str) -> bool {
        let prefix = Self::children_prefix(path);
        self.nodes
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }
}

/// Handle onto a shared in-memory namespace, bound to one session
///
/// [`MemoryStore::session`] derives a handle with a fresh session from the
/// same namespace; ephemeral nodes die with [`MemoryStore::close_session`],
/// exactly as they would when a real client's session lapses.
pub struct MemoryStore {
    shared: Arc<Mutex<Namespace>>,
    session_id: u64,
}

impl MemoryStore {
    /// Create a fresh namespace containing only the root node
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::new(Vec::new(), None));
        Self {
            shared: Arc::new(Mutex::new(Namespace {
                nodes,
                watches: HashMap::new(),
                next_session: 2,
            })),
            session_id: 1,
        }
    }

    /// Derive a handle with its own session over the same namespace
    pub fn session(&self) -> MemoryStore {
        let mut ns = self.shared.lock();
        let session_id = ns.next_session;
        ns.next_session += 1;
        MemoryStore {
            shared: Arc::clone(&self.shared),
            session_id,
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// End this handle's session: every ephemeral it owns is removed and the
    /// corresponding watches fire, as on a real session expiry
    pub fn close_session(&self) {
        let mut ns = self.shared.lock();
        let doomed: Vec<String> = ns
            .nodes
            .iter()
            .filter(|(_, node)| node.owner == Some(self.session_id))
            .map(|(path, _)| path.clone())
            .collect();
        for path in doomed {
            ns.nodes.remove(&path);
            ns.fire(&path, WatchEvent::Deleted);
            tracing::debug!(path = %path, session = self.session_id, "ephemeral removed with session");
        }
    }

    /// Fire a connection-state event at every registered watch, as a real
    /// client delivers on disconnect. Watches are single-fire, so every
    /// registration is consumed.
    pub fn signal_connection_event(&self) {
        let mut ns = self.shared.lock();
        for (_, senders) in ns.watches.drain() {
            for tx in senders {
                let _ = tx.send(WatchEvent::ConnectionStateChanged);
            }
        }
    }

    /// Node payload, mostly useful to tests
    pub fn data(&self, path: &str) -> Option<Vec<u8>> {
        let ns = self.shared.lock();
        ns.nodes.get(path).map(|node| node.data.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl crate::store::CoordinationStore for MemoryStore {
    async fn create(&self, path: &str, data: &[u8], mode: CreateMode) -> Result<String> {
        paths::validate_path(path).map_err(|_| StoreError::BadPath(path.to_string()))?;
        if path == "/" {
            return Err(StoreError::NodeExists(path.to_string()));
        }
        let parent = match paths::parent(path) {
            Some(parent) => parent.to_string(),
            None => return Err(StoreError::BadPath(path.to_string())),
        };

        let mut ns = self.shared.lock();
        let actual = {
            let parent_node = ns
                .nodes
                .get_mut(&parent)
                .ok_or_else(|| StoreError::NoNode(parent.clone()))?;
            if mode.is_sequential() {
                let sequence = parent_node.next_sequence;
                parent_node.next_sequence += 1;
                format!(
                    "{path}{sequence:0width$}",
                    width = taro_common::SEQUENCE_WIDTH
                )
            } else {
                path.to_string()
            }
        };
        if ns.nodes.contains_key(&actual) {
            return Err(StoreError::NodeExists(actual));
        }
        let owner = mode.is_ephemeral().then_some(self.session_id);
        ns.nodes.insert(actual.clone(), Node::new(data.to_vec(), owner));
        ns.fire(&actual, WatchEvent::Created);
        Ok(actual)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let ns = self.shared.lock();
        Ok(ns.nodes.contains_key(path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut ns = self.shared.lock();
        if !ns.nodes.contains_key(path) {
            return Err(StoreError::NoNode(path.to_string()));
        }
        if ns.has_children(path) {
            return Err(StoreError::NotEmpty(path.to_string()));
        }
        ns.nodes.remove(path);
        ns.fire(path, WatchEvent::Deleted);
        Ok(())
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>> {
        let ns = self.shared.lock();
        if !ns.nodes.contains_key(path) {
            return Err(StoreError::NoNode(path.to_string()));
        }
        let prefix = Namespace::children_prefix(path);
        let names = ns
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| {
                let rest = &key[prefix.len()..];
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
            })
            .collect();
        Ok(names)
    }

    async fn watch_exists(&self, path: &str) -> Result<ExistsWatch> {
        let (tx, rx) = oneshot::channel();
        let mut ns = self.shared.lock();
        let exists = ns.nodes.contains_key(path);
        ns.watches.entry(path.to_string()).or_default().push(tx);
        Ok(ExistsWatch { exists, events: rx })
    }
}
