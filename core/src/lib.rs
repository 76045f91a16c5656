//! Blocking API client for an `objects` REST collection.
//!
//! # Overview
//! Layers, leaf first:
//! - [`Config`] resolves base URL, timeout and credentials.
//! - [`ApiClient`] joins endpoints onto the base URL, applies default headers
//!   and timeout, and turns statuses of 400 and above into errors.
//! - [`ObjectsApi`] maps CRUD operations onto verbs and paths, returning raw
//!   JSON.
//! - [`ObjectsPage`] wraps `ObjectsApi` and converts JSON to [`ObjectModel`].
//!
//! # Design
//! - No hidden defaults: every layer receives the one below it explicitly.
//! - The network sits behind the [`Transport`] trait; [`UreqTransport`] is the
//!   blocking implementation, tests substitute an in-memory one.
//! - One request per call. No retries, caching or pagination.
//!
//! ```no_run
//! use objects_core::{ApiClient, Config, ObjectModel, ObjectsApi, ObjectsPage};
//!
//! let config = Config::from_env()?;
//! let page = ObjectsPage::new(ObjectsApi::new(ApiClient::from_config(&config)?));
//! let created = page.create_object(&ObjectModel::new("Apple MacBook Pro 16", None))?;
//! assert!(page.delete_object(&created.id)?);
//! # Ok::<(), objects_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod page;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::ObjectsApi;
pub use config::Config;
pub use error::{ApiError, ConfigError, FixtureError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use page::ObjectsPage;
pub use transport::{ApiClient, RequestOptions, Transport, UreqTransport};
pub use types::{ObjectModel, ObjectPatch};
