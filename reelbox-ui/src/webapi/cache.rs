use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use parking_lot::Mutex;
use reelbox_core::envelope::Envelope;

/// Last successful envelope per endpoint, shared by the worker threads.
pub struct WebApiCache {
    responses: Mutex<LruCache<Arc<str>, Envelope>>,
}

impl WebApiCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            responses: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Envelope> {
        self.responses.lock().get(key).cloned()
    }

    /// Failed envelopes are never stored, so a later request retries.
    pub fn put(&self, key: Arc<str>, envelope: Envelope) {
        if envelope.success {
            self.responses.lock().put(key, envelope);
        }
    }

    pub fn len(&self) -> usize {
        self.responses.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
