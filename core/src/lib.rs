//! Blocking client for the IGDB video-game metadata API.
//!
//! # Overview
//! `IgdbClient` hands out one [`Service`] per resource (platforms, pulse
//! groups, test dummies). Each service turns `get` / `list` / `index` /
//! `search` / `count` / `fields` calls into GET requests, applies the
//! caller's [`QueryOption`]s, and decodes the JSON body into typed records
//! or an [`ApiError`].
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest` / `HttpResponse`);
//!   the network round trip sits behind the [`Transport`] trait, with a
//!   `ureq` implementation behind the default `ureq-client` feature.
//! - Service logic is written once, generic over [`Resource`].
//! - Response classification is a fixed table: empty array is `NoResults`,
//!   unparsable body is `InvalidJson`, non-2xx is `Http`.
//!
//! ```no_run
//! use igdb_core::{ClientConfig, IgdbClient, QueryOption};
//!
//! let client = IgdbClient::new(ClientConfig::from_env()?);
//! let ps2 = client.platforms().get(8, &[QueryOption::fields(["name", "slug"])])?;
//! println!("{}", ps2.name);
//! # Ok::<(), igdb_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod service;
pub mod transport;
pub mod types;

pub use client::IgdbClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{Operator, Order, Query, QueryOption, SubFilter};
pub use service::{Resource, Service};
pub use transport::Transport;
#[cfg(feature = "ureq-client")]
pub use transport::UreqTransport;
pub use types::{
    Count, Platform, PlatformCategory, PulseGroup, Tag, TestDummy, TestDummyEnum, Url,
};
