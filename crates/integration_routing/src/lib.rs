//! Pedestrian routing for Station Walk
//!
//! Computes walking routes between two coordinates via the
//! [OneMap](https://www.onemap.gov.sg/apidocs/) routing service, which
//! requires a short-lived access token obtained with account credentials.
//!
//! # Architecture
//!
//! [`RoutingClient`] defines the interface, implemented by
//! [`OneMapRoutingClient`]. Tokens are never refreshed reactively: a failed
//! call surfaces as [`RoutingError::Unauthorized`] and callers decide when to
//! call [`RoutingClient::refresh_token`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{OneMapRoutingClient, RoutingClient, RoutingConfig};
//!
//! let client = OneMapRoutingClient::new(&RoutingConfig::default())?;
//! client.refresh_token().await?;
//! let summary = client.walking_route(&station, &cafe).await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{OneMapRoutingClient, RoutingClient};
pub use config::RoutingConfig;
pub use error::RoutingError;
pub use models::{AccessToken, RouteSummary};
