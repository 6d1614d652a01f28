//! Endpoint registry: instance → endpoint mapping and the schema cache.
//!
//! Schemas are fetched in background tasks when an instance registers and
//! published by swapping the whole `Arc<SchemaModel>`, so readers always see
//! a complete model. A failed fetch never replaces a cached schema. When the
//! last instance of an endpoint unregisters, its schema is evicted.

use reqwest::header::HeaderMap;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::{build_catalog, CatalogEntry};
use crate::compat::{self, Parent, TreeIssue};
use crate::config::{parse_headers, RegistryConfig};
use crate::error::{ConfigError, FetchError};
use crate::introspection::IntrospectionClient;
use crate::schema::{SchemaModel, ROOT_TYPE};
use crate::selection::SelectionNode;

const EVENT_CAPACITY: usize = 64;

/// Notification sent to subscribers when the cache changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaEvent {
    /// A fresh schema replaced (or created) the cache entry.
    Updated { endpoint_url: String },
    /// A refresh failed; the previous entry, if any, is still in place.
    RefreshFailed {
        endpoint_url: String,
        message: String,
    },
    /// The last instance unregistered and the schema was dropped.
    Evicted { endpoint_url: String },
}

/// Registry bookkeeping guarded by the registry lock.
#[derive(Debug, Default)]
pub struct RegistryState {
    instances: HashMap<String, String>,
    schemas: HashMap<String, Arc<SchemaModel>>,
    headers: HashMap<String, HeaderMap>,
    in_flight: HashSet<String>,
}

impl RegistryState {
    /// Endpoint URL an instance is registered against.
    pub fn instance_endpoint(&self, instance_id: &str) -> Option<&str> {
        self.instances.get(instance_id).map(String::as_str)
    }

    /// Cached schema for an endpoint.
    pub fn schema(&self, endpoint_url: &str) -> Option<&Arc<SchemaModel>> {
        self.schemas.get(endpoint_url)
    }

    pub fn is_referenced(&self, endpoint_url: &str) -> bool {
        self.instances.values().any(|url| url == endpoint_url)
    }

    pub(crate) fn insert_instance(
        &mut self,
        instance_id: &str,
        endpoint_url: &str,
    ) -> Option<String> {
        self.instances
            .insert(instance_id.to_string(), endpoint_url.to_string())
    }

    pub(crate) fn insert_schema(&mut self, endpoint_url: &str, schema: Arc<SchemaModel>) {
        self.schemas.insert(endpoint_url.to_string(), schema);
    }

    /// Drop the schema of an endpoint nobody references. Returns whether one was dropped.
    fn evict_if_unreferenced(&mut self, endpoint_url: &str) -> bool {
        if self.is_referenced(endpoint_url) {
            return false;
        }
        self.headers.remove(endpoint_url);
        self.schemas.remove(endpoint_url).is_some()
    }
}

/// Owns instance registrations and the per-endpoint schema cache.
///
/// Cloning is cheap; clones share state.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    client: IntrospectionClient,
    state: Arc<RwLock<RegistryState>>,
    events: broadcast::Sender<SchemaEvent>,
}

impl EndpointRegistry {
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            client: IntrospectionClient::new(&config)?,
            state: Arc::new(RwLock::new(RegistryState::default())),
            events,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SchemaEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Receive cache change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SchemaEvent> {
        self.events.subscribe()
    }

    /// Map `instance_id` to `endpoint_url` and start fetching its schema.
    ///
    /// Returns the fetch task, or `None` when the schema is already cached,
    /// a fetch is already running, or no Tokio runtime is available.
    pub fn register_instance(
        &self,
        instance_id: &str,
        endpoint_url: &str,
    ) -> Option<JoinHandle<()>> {
        let evicted = {
            let mut state = self.write();
            let previous = state.insert_instance(instance_id, endpoint_url);
            previous
                .filter(|prev| prev != endpoint_url)
                .filter(|prev| state.evict_if_unreferenced(prev))
        };
        if let Some(prev) = evicted {
            info!(endpoint = %prev, "evicted schema after instance moved");
            self.emit(SchemaEvent::Evicted { endpoint_url: prev });
        }

        {
            let mut state = self.write();
            if state.schemas.contains_key(endpoint_url)
                || !state.in_flight.insert(endpoint_url.to_string())
            {
                debug!(endpoint = endpoint_url, "schema cached or in flight");
                return None;
            }
        }
        self.spawn_refresh(endpoint_url)
    }

    /// Like [`register_instance`](Self::register_instance), with extra
    /// request headers for this endpoint given as a JSON object string.
    pub fn register_instance_with_headers(
        &self,
        instance_id: &str,
        endpoint_url: &str,
        headers_json: &str,
    ) -> Result<Option<JoinHandle<()>>, ConfigError> {
        let headers = parse_headers(headers_json)?;
        self.write().headers.insert(endpoint_url.to_string(), headers);
        Ok(self.register_instance(instance_id, endpoint_url))
    }

    /// Remove an instance. Evicts the endpoint's schema if this was its last instance.
    pub fn unregister_instance(&self, instance_id: &str) {
        let evicted = {
            let mut state = self.write();
            let Some(endpoint_url) = state.instances.remove(instance_id) else {
                return;
            };
            state
                .evict_if_unreferenced(&endpoint_url)
                .then_some(endpoint_url)
        };
        if let Some(endpoint_url) = evicted {
            info!(endpoint = %endpoint_url, "evicted schema");
            self.emit(SchemaEvent::Evicted { endpoint_url });
        }
    }

    fn spawn_refresh(&self, endpoint_url: &str) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(endpoint = endpoint_url, "no async runtime; skipping schema fetch");
                self.write().in_flight.remove(endpoint_url);
                return None;
            }
        };
        let registry = self.clone();
        let endpoint_url = endpoint_url.to_string();
        Some(handle.spawn(async move {
            // Failures are logged and published by `refresh`.
            let _ = registry.refresh(&endpoint_url).await;
        }))
    }

    /// Fetch and rebuild the schema for `endpoint_url` now.
    ///
    /// On success the cache entry is replaced, unless no instance references
    /// the endpoint anymore. On failure the cache is left as it was.
    pub async fn refresh(&self, endpoint_url: &str) -> Result<Arc<SchemaModel>, FetchError> {
        let headers = self
            .read()
            .headers
            .get(endpoint_url)
            .cloned()
            .unwrap_or_default();

        let result = self.client.fetch(endpoint_url, &headers).await;

        let schema = {
            let mut state = self.write();
            state.in_flight.remove(endpoint_url);
            match result {
                Ok(schema) => {
                    let schema = Arc::new(schema);
                    let referenced = state.is_referenced(endpoint_url);
                    if referenced {
                        state.insert_schema(endpoint_url, Arc::clone(&schema));
                    }
                    Ok((schema, referenced))
                }
                Err(e) => Err(e),
            }
        };

        match schema {
            Ok((schema, true)) => {
                info!(endpoint = endpoint_url, "schema updated");
                self.emit(SchemaEvent::Updated {
                    endpoint_url: endpoint_url.to_string(),
                });
                Ok(schema)
            }
            Ok((schema, false)) => {
                debug!(endpoint = endpoint_url, "discarding schema of unregistered endpoint");
                Ok(schema)
            }
            Err(e) => {
                self.refresh_failed(endpoint_url, &e);
                Err(e)
            }
        }
    }

    /// Record a failed refresh. The cached schema, if any, stays in place.
    pub fn refresh_failed(&self, endpoint_url: &str, cause: &FetchError) {
        let stale = self.read().schemas.contains_key(endpoint_url);
        warn!(
            endpoint = endpoint_url,
            error = %cause,
            keeping_cached = stale,
            "introspection failed"
        );
        self.emit(SchemaEvent::RefreshFailed {
            endpoint_url: endpoint_url.to_string(),
            message: cause.to_string(),
        });
    }

    /// Snapshot of the cached schema for an endpoint.
    pub fn schema(&self, endpoint_url: &str) -> Option<Arc<SchemaModel>> {
        self.read().schema(endpoint_url).cloned()
    }

    pub fn endpoint_for(&self, instance_id: &str) -> Option<String> {
        self.read().instance_endpoint(instance_id).map(String::from)
    }

    /// Root-level entries (`query`, `mutation`, fragments) for an endpoint.
    /// Empty until the schema is cached.
    pub fn list_selectable_roots(&self, endpoint_url: &str) -> Vec<CatalogEntry> {
        self.catalog(endpoint_url, ROOT_TYPE)
    }

    /// Root-level entries for the endpoint an instance is registered against.
    pub fn instance_roots(&self, instance_id: &str) -> Vec<CatalogEntry> {
        match self.endpoint_for(instance_id) {
            Some(url) => self.list_selectable_roots(&url),
            None => Vec::new(),
        }
    }

    /// Selectable children of `type_name` on an endpoint.
    pub fn catalog(&self, endpoint_url: &str, type_name: &str) -> Vec<CatalogEntry> {
        self.schema(endpoint_url)
            .map(|schema| build_catalog(&schema, type_name))
            .unwrap_or_default()
    }

    /// Whether `child` may connect to `parent` under the current schemas.
    pub fn is_compatible(&self, child: &SelectionNode, parent: &Parent<'_>) -> bool {
        compat::is_compatible(&self.read(), child, parent)
    }

    /// Stale references and illegal connections in a tree. Empty until the
    /// tree's endpoint has a cached schema.
    pub fn validate_tree(&self, root: &SelectionNode) -> Vec<TreeIssue> {
        match self.schema(&root.endpoint_url) {
            Some(schema) => compat::validate_tree(&schema, root),
            None => Vec::new(),
        }
    }
}
