//! Blocking client for the Campaign Monitor (createsend) REST API.
//!
//! # Overview
//! `ApiClient` resolves relative paths against a base URL, JSON-encodes
//! request bodies, sends them through a `Transport` and classifies the
//! response: 2xx decodes into the caller's type, 400 becomes a structured
//! `CreatesendError`, anything else a generic HTTP error.
//!
//! # Design
//! - Authentication is a transport decorator (`ApiKeyAuth`) around the
//!   default ureq transport, so the pipeline never handles credentials.
//! - Endpoint methods in `api` are thin: they build a path, choose a decode
//!   target and call `execute` or `execute_empty`.
//! - No retries, caching or pagination traversal; each call is one request.
//!
//! ```no_run
//! use createsend_core::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(ClientConfig::from_env()?)?;
//! for c in client.list_clients()? {
//!     println!("{} {}", c.name, c.client_id);
//! }
//! # Ok::<(), createsend_core::ApiError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

pub use api::campaigns::Recipient;
pub use api::clients::{Client, List, ListForEmail};
pub use api::lists::{
    CustomFieldCreate, CustomFieldDefinition, DataType, ListCreateOptions, ListSegment,
    ListSubscribersOptions, SubscriberGroup, UnsubscribeSetting,
};
pub use api::segments::{Rule, RuleGroup, SegmentCreate, SegmentDetail};
pub use api::subscribers::{ImportSubscriber, ImportSubscribers, NewSubscriber, Subscriber};
pub use api::webhooks::{Webhook, WebhookCreate};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, CreatesendError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ApiKeyAuth, Transport, UreqTransport};
pub use types::{CustomField, OrderDirection, Page, PageOptions};
