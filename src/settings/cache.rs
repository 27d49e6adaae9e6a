//! Per-document settings cache
//!
//! In global mode every lookup resolves to the single process-wide value.
//! In scoped mode each open document gets one memoized configuration pull:
//! the pending fetch is stored under the document's URI so concurrent
//! lookups share one request, and each entry carries a generation so a
//! result that arrives after its entry was cleared or evicted can be
//! recognised as stale.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::settings::error::SettingsError;
use crate::settings::source::SettingsSource;
use crate::settings::types::Settings;

type SettingsFetch = Shared<BoxFuture<'static, Result<Settings, SettingsError>>>;

struct Entry {
    generation: u64,
    fetch: SettingsFetch,
}

#[derive(Default)]
struct State {
    scoped: bool,
    global: Settings,
    entries: HashMap<Url, Entry>,
    next_generation: u64,
}

enum Lookup {
    Ready(Settings),
    Pending {
        generation: u64,
        fetch: SettingsFetch,
    },
}

/// Settings returned by [`SettingsCache::get`], tagged with the cache entry
/// they were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub settings: Settings,
    generation: Option<u64>,
}

pub struct SettingsCache {
    source: Arc<dyn SettingsSource>,
    state: Mutex<State>,
}

impl SettingsCache {
    /// Creates a cache in global mode with default settings.
    pub fn new(source: Arc<dyn SettingsSource>) -> Self {
        Self {
            source,
            state: Mutex::new(State::default()),
        }
    }

    /// Switches between per-document pulls (`true`) and the global value.
    pub fn set_scoped(&self, scoped: bool) {
        let mut state = self.state();
        state.scoped = scoped;
        state.entries.clear();
    }

    pub fn is_scoped(&self) -> bool {
        self.state().scoped
    }

    /// Replaces the process-wide settings used in global mode.
    pub fn set_global(&self, settings: Settings) {
        self.state().global = settings;
    }

    pub fn global(&self) -> Settings {
        self.state().global
    }

    /// Looks up the settings for `uri`.
    ///
    /// The cache is consulted when this is called, not when the returned
    /// future is first polled, so the result reflects the cache as it was at
    /// the call site. A miss in scoped mode memoizes a new fetch; a failed
    /// fetch is evicted again so the next lookup retries.
    pub fn get(&self, uri: &Url) -> BoxFuture<'_, Result<ResolvedSettings, SettingsError>> {
        let lookup = self.lookup(uri);
        let uri = uri.clone();

        async move {
            let (generation, fetch) = match lookup {
                Lookup::Ready(settings) => {
                    return Ok(ResolvedSettings {
                        settings,
                        generation: None,
                    });
                }
                Lookup::Pending { generation, fetch } => (generation, fetch),
            };

            match fetch.await {
                Ok(settings) => Ok(ResolvedSettings {
                    settings,
                    generation: Some(generation),
                }),
                Err(e) => {
                    if self.evict_generation(&uri, generation) {
                        debug!("Evicted failed settings fetch for {}", uri);
                    }
                    Err(e)
                }
            }
        }
        .boxed()
    }

    /// True while the entry `resolved` was read from is still cached.
    pub fn is_current(&self, uri: &Url, resolved: &ResolvedSettings) -> bool {
        match resolved.generation {
            None => true,
            Some(generation) => self
                .state()
                .entries
                .get(uri)
                .is_some_and(|entry| entry.generation == generation),
        }
    }

    /// Drops the cached entry for `uri`, if any.
    pub fn evict(&self, uri: &Url) -> bool {
        self.state().entries.remove(uri).is_some()
    }

    /// Drops every cached entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut state = self.state();
        let removed = state.entries.len();
        state.entries.clear();
        removed
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.state().entries.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    fn lookup(&self, uri: &Url) -> Lookup {
        let mut state = self.state();
        if !state.scoped {
            return Lookup::Ready(state.global);
        }

        if let Some(entry) = state.entries.get(uri) {
            return Lookup::Pending {
                generation: entry.generation,
                fetch: entry.fetch.clone(),
            };
        }

        state.next_generation += 1;
        let generation = state.next_generation;

        let source = Arc::clone(&self.source);
        let scope = uri.clone();
        let fetch = async move { source.fetch(&scope).await }.boxed().shared();

        debug!("Settings cache miss for {}, fetching", uri);
        state.entries.insert(
            uri.clone(),
            Entry {
                generation,
                fetch: fetch.clone(),
            },
        );

        Lookup::Pending { generation, fetch }
    }

    fn evict_generation(&self, uri: &Url, generation: u64) -> bool {
        let mut state = self.state();
        let matches = state
            .entries
            .get(uri)
            .is_some_and(|entry| entry.generation == generation);
        if matches {
            state.entries.remove(uri);
        }
        matches
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
