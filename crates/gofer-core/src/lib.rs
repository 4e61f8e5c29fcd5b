//! gofer Core Library
//!
//! Protocol translation for the gofer gateway: everything needed to turn a
//! gopher-family server's replies into HTML a browser can navigate, with no
//! dependency on the HTTP framework that serves it.
//!
//! # Modules
//!
//! - [`transport`] - Bounded single-shot TCP exchanges with remote servers
//! - [`directory`] - Directory listing model and malformed-line recovery
//! - [`item_type`] - Item type tags and their pipelines
//! - [`locator`] - Navigation context, gopher URIs and gateway links
//! - [`render`] - HTML rendering of listings and sub-client pages
//! - [`gateway`] - Top-level navigation dispatch
//! - [`ph`] - CSO/ph directory-lookup sub-client
//! - [`search`] - Index-search sub-client
//! - [`activity`] - Activity tracking and idle shutdown
//! - [`launcher`] - Browser launcher trait
//! - [`content`] - Content-type guessing for opaque payloads
//! - [`config`] - Fixed configuration
//! - [`error`] - Error types

pub mod activity;
pub mod config;
pub mod content;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod item_type;
pub mod launcher;
pub mod locator;
pub mod ph;
pub mod render;
pub mod search;
pub mod transport;

// Re-export commonly used types
pub use activity::{ActivityMonitor, ActivityTracker};
pub use config::GatewayConfig;
pub use directory::{DirectoryRecord, MalformedLine};
pub use error::{GatewayError, Result};
pub use gateway::{navigate, Reply};
pub use item_type::{ItemType, Pipeline};
pub use launcher::{Launcher, NoOpLauncher, RecordingLauncher};
pub use locator::{NavigationContext, NavigationRequest};
pub use ph::PhClient;
pub use search::SearchClient;
pub use transport::{Transport, TransportError};
