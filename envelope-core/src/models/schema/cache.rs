use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::resource::SchemaResource;
use super::walker::{EnvelopeDescriptor, SchemaWalker};
use crate::models::errors::SchemaError;

/// Envelope descriptors keyed by message kind. Entries are computed at most
/// once and never evicted.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<String, Arc<EnvelopeDescriptor>>>,
    computations: AtomicUsize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&self, kind: &str, resource: &SchemaResource) -> Result<Arc<EnvelopeDescriptor>, SchemaError> {
        if let Some(descriptor) = self.entries.read().get(kind) {
            debug!(kind = %kind, "Envelope cache hit");
            return Ok(Arc::clone(descriptor));
        }

        // Held across the walk so no caller sees a half-built entry.
        let mut entries = self.entries.write();
        if let Some(descriptor) = entries.get(kind) {
            debug!(kind = %kind, "Envelope resolved by a concurrent caller");
            return Ok(Arc::clone(descriptor));
        }

        debug!(kind = %kind, "Envelope cache miss");
        self.computations.fetch_add(1, Ordering::SeqCst);
        let descriptor = Arc::new(SchemaWalker::resolve(resource, kind)?);
        entries.insert(kind.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    pub fn get(&self, kind: &str) -> Option<Arc<EnvelopeDescriptor>> {
        self.entries.read().get(kind).cloned()
    }

    /// Number of schema walks performed so far.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
