/**
 * cache.rs
 * Sitemap cache owned by the application
 *
 * Entries are immutable `Arc<Sitemap>` snapshots keyed by root ontology
 * IRI. Derived template data is never written into a shared ontology on
 * first use; a reload swaps the whole snapshot, and requests holding the
 * previous one keep using it until they finish.
 */

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use super::model::Sitemap;
use crate::errors::Result;

#[derive(Debug)]
pub struct OntologyCache {
    enabled: bool,
    entries: RwLock<HashMap<String, Arc<Sitemap>>>,
}

impl OntologyCache {
    /// `enabled = false` rebuilds the sitemap on every request
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, ontology: &str) -> Option<Arc<Sitemap>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ontology)
            .cloned()
    }

    /// Cached sitemap for `ontology`, loading it on a miss.
    ///
    /// Loading happens outside the lock. When two callers race on the same
    /// miss, the first inserted snapshot wins and both get it.
    pub fn get_or_load<F>(&self, ontology: &str, load: F) -> Result<Arc<Sitemap>>
    where
        F: FnOnce() -> Result<Sitemap>,
    {
        if !self.enabled {
            return Ok(Arc::new(load()?));
        }

        if let Some(sitemap) = self.get(ontology) {
            debug!("Sitemap cache hit for <{}>", ontology);
            return Ok(sitemap);
        }

        let loaded = Arc::new(load()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(ontology.to_string()).or_insert(loaded)))
    }

    /// Load `ontology` again and replace the cached snapshot
    pub fn reload<F>(&self, ontology: &str, load: F) -> Result<Arc<Sitemap>>
    where
        F: FnOnce() -> Result<Sitemap>,
    {
        let loaded = Arc::new(load()?);
        if self.enabled {
            info!("Reloaded sitemap <{}>", ontology);
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(ontology.to_string(), Arc::clone(&loaded));
        }
        Ok(loaded)
    }

    /// Drop the cached snapshot; returns whether there was one
    pub fn invalidate(&self, ontology: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(ontology)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
