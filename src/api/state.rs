//! Shared service state
//!
//! Everything a handler needs, built once from the configuration and
//! shared by reference between the CLI commands and the HTTP server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::adapters::image::DEFAULT_CACHE_ENTRIES;
use crate::adapters::{
    CachingImageSource, FetchingImageSource, JsonlHashRegistry, JsonlOutcomeStore,
    JsonlTimelineStore, OfflineReverseSearch,
};
use crate::config::Config;
use crate::core::ports::{
    HashRegistry, ImageSource, OutcomeStore, ReverseImageSearch, TimelineStore,
};
use crate::core::services::{CrossVerifier, Verifier};
use crate::paths;

/// Verifiers, store and configuration for one running service
pub struct AppState {
    config: Arc<Config>,
    verifier: Verifier,
    cross_verifier: CrossVerifier,
    store: Arc<dyn OutcomeStore>,
    timeline: Arc<dyn TimelineStore>,
    started: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("verifier", &self.verifier)
            .field("cross_verifier", &self.cross_verifier)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the service from explicit collaborators
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        images: Arc<dyn ImageSource>,
        registry: Arc<dyn HashRegistry>,
        search: Arc<dyn ReverseImageSearch>,
        store: Arc<dyn OutcomeStore>,
        timeline: Arc<dyn TimelineStore>,
    ) -> Self {
        let verifier =
            Verifier::with_default_runners(Arc::clone(&config), Arc::clone(&images), registry, search)
                .with_store(Arc::clone(&store))
                .with_timeline(Arc::clone(&timeline));
        let cross_verifier = CrossVerifier::new(Arc::clone(&config), images)
            .with_store(Arc::clone(&store))
            .with_timeline(Arc::clone(&timeline));
        Self {
            config,
            verifier,
            cross_verifier,
            store,
            timeline,
            started: Instant::now(),
        }
    }

    /// Production wiring: HTTP/file images, JSON-lines store, timeline and
    /// hash registry next to each other, no reverse search service
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let store_path = config.store_path();
        let registry_path = paths::hash_registry_beside(&store_path);
        let timeline_path = paths::timeline_beside(&store_path);
        debug!("store {}, hash registry {}", store_path.display(), registry_path.display());

        let images = CachingImageSource::new(
            Arc::new(FetchingImageSource::new(&config.limits)?),
            config.limits.request_timeout(),
            DEFAULT_CACHE_ENTRIES,
        );
        let registry = JsonlHashRegistry::open(registry_path)?;
        Ok(Self::new(
            Arc::new(config),
            Arc::new(images),
            Arc::new(registry),
            Arc::new(OfflineReverseSearch),
            Arc::new(JsonlOutcomeStore::new(store_path)),
            Arc::new(JsonlTimelineStore::new(timeline_path)),
        ))
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initial verification pipeline
    #[must_use]
    pub const fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Before/after comparator
    #[must_use]
    pub const fn cross_verifier(&self) -> &CrossVerifier {
        &self.cross_verifier
    }

    /// Record store
    #[must_use]
    pub fn store(&self) -> &dyn OutcomeStore {
        self.store.as_ref()
    }

    /// Issue timeline
    #[must_use]
    pub fn timeline(&self) -> &dyn TimelineStore {
        self.timeline.as_ref()
    }

    /// Time since the state was built
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}
