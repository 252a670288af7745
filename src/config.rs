//! Configured defaults: account credentials and root-request attributes
//! merged under every operation's caller options.
//!
//! Modelled as an explicit object held by the client rather than hidden
//! process-global state. Loading happens once on first access and the
//! result is cached until [`Defaults::reset`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::domain::Options;

#[derive(Debug, Clone)]
enum Source {
    Static(Options),
    /// JSON file keyed by environment name, e.g. `{"development": {...}}`.
    File {
        path: PathBuf,
        environment: String,
    },
}

#[derive(Debug)]
/// Lazily-loaded, cached defaults for a client instance.
///
/// The cache is read-mostly: first access loads and publishes the options
/// atomically (double-checked behind an `RwLock`, so concurrent first
/// readers cannot trigger duplicate loads); later reads share the published
/// `Arc`. An unavailable or malformed source yields empty defaults.
pub struct Defaults {
    source: Source,
    cache: RwLock<Option<Arc<Options>>>,
}

impl Defaults {
    /// No defaults at all; every operation uses caller options as-is.
    pub fn none() -> Self {
        Self::from_options(Options::new())
    }

    /// Fixed in-memory defaults.
    pub fn from_options(options: Options) -> Self {
        Self {
            source: Source::Static(options),
            cache: RwLock::new(None),
        }
    }

    /// Defaults from a host application's JSON config file, keyed by an
    /// environment name. Missing file, missing environment, or malformed
    /// content all load as empty defaults.
    pub fn from_file(path: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            source: Source::File {
                path: path.into(),
                environment: environment.into(),
            },
            cache: RwLock::new(None),
        }
    }

    /// The cached defaults, loading them on first access.
    pub fn get(&self) -> Arc<Options> {
        if let Ok(cache) = self.cache.read() {
            if let Some(options) = cache.as_ref() {
                return Arc::clone(options);
            }
        }

        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Re-check under the write lock; another caller may have published.
        if let Some(options) = cache.as_ref() {
            return Arc::clone(options);
        }
        let options = Arc::new(self.load());
        *cache = Some(Arc::clone(&options));
        options
    }

    /// Drop the cached value; the next [`Defaults::get`] reloads the source.
    pub fn reset(&self) {
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cache = None;
    }

    fn load(&self) -> Options {
        match &self.source {
            Source::Static(options) => options.clone(),
            Source::File { path, environment } => {
                let Ok(contents) = std::fs::read_to_string(path) else {
                    return Options::new();
                };
                let Ok(mut environments) =
                    serde_json::from_str::<BTreeMap<String, Options>>(&contents)
                else {
                    return Options::new();
                };
                environments.remove(environment).unwrap_or_default()
            }
        }
    }
}
