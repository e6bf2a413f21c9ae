//! Client for the Universe ticketing API.
//!
//! Acquires a bearer token through the client-credentials grant, keeps it in
//! an injected [`KeyValueStore`], and attaches it to GET requests against
//! the guestlist, current-user and listings endpoints.
//!
//! Known quirks:
//! - query values are not percent-encoded (see [`query::serialize`]);
//! - with no stored token, requests carry `authorization: Bearer null`;
//! - token expiry is never checked.

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod storage;
pub mod types;

pub use client::{UniverseClient, TOKEN_STORAGE_KEY};
pub use config::{Config, Credentials, Endpoints};
pub use error::{ClientError, Result};
pub use query::{GuestlistFilter, QueryParams, QueryValue};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use types::TokenRecord;
