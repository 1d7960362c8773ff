//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds one store per collection:
//! - **Jobs** — inspection/certification jobs keyed by job UUID
//! - **Certificates** — issued certificates keyed by certificate UUID
//! - **Clients** — the client directory
//! - **Schemas** — versioned category schemas, keyed by category name
//! - **Counters** — named sequence counters backing number allocation
//!
//! Everything is in-memory. The stores are `Arc`-backed, so cloning
//! `AppState` into each handler is cheap and all clones observe the same
//! data.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use gemcert_core::{AllocationError, ClientId, SequenceFormat, Timestamp};
use gemcert_schema::{CategorySchema, FieldDef, SchemaError};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because we never hold the lock across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Return the first record matching the predicate.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// Update a record in place. Returns the updated record, or `None` if
    /// not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure receives a `&mut T` and may inspect the current state,
    /// validate preconditions, mutate the record, and return `Ok(R)` or
    /// `Err(E)`. The entire operation runs under a single write lock,
    /// eliminating TOCTOU races between read and update.
    ///
    /// Returns `None` if the record doesn't exist, or `Some(result)` with
    /// the closure's `Result`.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Sequence Counters --------------------------------------------------------

/// Named sequence counters backing job and certificate number allocation.
///
/// Each scope key maps to the last sequence value handed out. Allocation
/// increments and renders under one write lock, so two concurrent
/// allocations in the same scope can never observe the same value.
/// Counters only ever move forward; a failed request downstream of an
/// allocation leaves a gap in the sequence, never a duplicate.
#[derive(Debug, Clone)]
pub struct CounterStore {
    counters: Arc<RwLock<HashMap<String, u64>>>,
}

impl CounterStore {
    /// Create an empty counter store.
    pub fn new() -> Self {
        Self {
            counters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Atomically take the next number in `format`'s sequence for `date`.
    ///
    /// A scope that has never allocated starts at the format's first
    /// value. Date-stamped formats roll over to a fresh sub-sequence per
    /// calendar date. When the format's pad width caps the sequence and
    /// the cap is reached, allocation fails and the counter is left
    /// unchanged.
    pub fn allocate(
        &self,
        format: &SequenceFormat,
        date: NaiveDate,
    ) -> Result<String, AllocationError> {
        let key = format.scope_key(date);
        let mut counters = self.counters.write();
        let slot = counters
            .entry(key.clone())
            .or_insert(format.first.saturating_sub(1));
        let next = *slot + 1;
        if let Some(capacity) = format.capacity() {
            if next > capacity {
                return Err(AllocationError::SequenceExhausted {
                    scope_key: key,
                    capacity,
                });
            }
        }
        *slot = next;
        Ok(format.render(date, next))
    }

    /// The last value allocated for a scope key, if any.
    pub fn current(&self, scope_key: &str) -> Option<u64> {
        self.counters.read().get(scope_key).copied()
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

// -- Schema Registry ----------------------------------------------------------

/// Versioned category schemas, keyed by category name.
///
/// Versions are dense and append-only: registering a schema for a
/// category assigns `existing count + 1`. Version assignment and the
/// append run under one write lock, so concurrent registrations for the
/// same category serialize instead of racing to the same version number.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Arc<RwLock<HashMap<String, Vec<CategorySchema>>>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next schema version for `category`.
    ///
    /// The field definitions are checked before anything is stored; a
    /// rejected registration leaves the registry untouched.
    pub fn register(
        &self,
        category: &str,
        fields: Vec<FieldDef>,
        now: Timestamp,
    ) -> Result<CategorySchema, SchemaError> {
        let key = category.trim();
        let mut schemas = self.schemas.write();
        let version = schemas.get(key).map_or(0, Vec::len) as u32 + 1;
        let schema = CategorySchema::new(key, version, fields, now)?;
        schemas.entry(key.to_string()).or_default().push(schema.clone());
        Ok(schema)
    }

    /// The newest schema version for `category`, if any is registered.
    pub fn active(&self, category: &str) -> Option<CategorySchema> {
        self.schemas
            .read()
            .get(category.trim())
            .and_then(|versions| versions.last().cloned())
    }

    /// A specific schema version for `category`.
    pub fn version(&self, category: &str, version: u32) -> Option<CategorySchema> {
        self.schemas
            .read()
            .get(category.trim())
            .and_then(|versions| versions.iter().find(|s| s.version == version).cloned())
    }

    /// All schema versions for `category`, oldest first.
    pub fn versions(&self, category: &str) -> Vec<CategorySchema> {
        self.schemas
            .read()
            .get(category.trim())
            .cloned()
            .unwrap_or_default()
    }

    /// All registered category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }
}

// -- Client Directory ---------------------------------------------------------

/// A registered client of the certification lab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClientRecord {
    /// Unique client identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: ClientId,
    /// Display name.
    pub name: String,
    /// Contact email, if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone, if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// When the client was registered.
    #[schema(value_type = String, example = "2025-01-23T12:00:00Z")]
    pub created_at: Timestamp,
}

// -- Application State --------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Whether to install the Prometheus recorder at startup.
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Build configuration from the environment.
    ///
    /// `PORT` (default 8080) and `GEMCERT_METRICS_ENABLED` (metrics are on
    /// unless the variable is set to `"false"`).
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let metrics_enabled = std::env::var("GEMCERT_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);
        Self {
            port,
            metrics_enabled,
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each store.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Store<gemcert_state::Job>,
    pub certificates: Store<gemcert_state::Certificate>,
    pub clients: Store<ClientRecord>,
    pub schemas: SchemaRegistry,
    pub counters: CounterStore,

    /// Handle to the installed Prometheus recorder, rendered by
    /// `GET /metrics`. `None` when the recorder is not installed (tests,
    /// or a failed install at startup).
    pub metrics: Option<PrometheusHandle>,

    pub config: AppConfig,
}

// `PrometheusHandle` does not implement `Debug`, so this is written out
// by hand.
impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jobs", &self.jobs)
            .field("certificates", &self.certificates)
            .field("clients", &self.clients)
            .field("schemas", &self.schemas)
            .field("counters", &self.counters)
            .field("metrics_installed", &self.metrics.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// Create a new application state with default configuration and no
    /// metrics recorder.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional Prometheus handle.
    pub fn with_config(config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            jobs: Store::new(),
            certificates: Store::new(),
            clients: Store::new(),
            schemas: SchemaRegistry::new(),
            counters: CounterStore::new(),
            metrics,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
