use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::access::engine::Authorizer;
use crate::access::index::PermissionIndex;
use crate::access::types::{Decision, Snapshot};

/// Holds the currently published [`PermissionIndex`].
///
/// Readers load the `Arc` without locking and never wait on a publish. A
/// rebuild happens before the handle is touched and is installed with a
/// single atomic pointer swap, so a reader observes either the previous or
/// the new index in full.
#[derive(Debug)]
pub struct IndexHandle {
    current: ArcSwap<PermissionIndex>,
    generation: AtomicU64,
}

impl IndexHandle {
    pub fn new(index: PermissionIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(PermissionIndex::from_snapshot(snapshot))
    }

    /// The index readers should use right now.
    pub fn current(&self) -> Arc<PermissionIndex> {
        self.current.load_full()
    }

    /// Number of times an index has been published over the initial one.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Install `index`, returning the one it replaces.
    pub fn publish(&self, index: PermissionIndex) -> Arc<PermissionIndex> {
        let previous = self.current.swap(Arc::new(index));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "Published permission index");
        previous
    }

    /// Build an index for `snapshot` and publish it.
    pub fn rebuild(&self, snapshot: &Snapshot) -> Arc<PermissionIndex> {
        self.publish(PermissionIndex::from_snapshot(snapshot))
    }
}

impl Authorizer for IndexHandle {
    fn resolve(&self, principal: &str, resource: &str, action: &str) -> Decision {
        self.current().resolve(principal, resource, action)
    }
}
