//! User directory pipeline for an IOMAD/Moodle-compatible LMS
//!
//! The remote client populates the directory list, the filter engine derives
//! the visible subset from the current filter state, and the dispatcher runs
//! user actions against the service and reloads the list when they change
//! it.
//!
//! ```rust,no_run
//! use common::config::LmsConfig;
//! use directory::{Directory, DirectoryClient, Notifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LmsConfig::from_env()?;
//!     let (notifier, _notifications) = Notifier::channel();
//!     let directory = Directory::new(DirectoryClient::new(&config)?, notifier);
//!     directory.load_all().await;
//!     println!("{}", directory.store().visible().await.summary());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod models;
pub mod notification;
pub mod role;
pub mod store;
pub mod validation;
pub mod wire;

pub use client::DirectoryClient;
pub use dispatcher::{Directory, UserAction};
pub use error::{DirectoryError, DirectoryResult, ErrorKind};
pub use filter::{FilteredView, apply_filters};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use role::detect_role;
pub use store::{DirectoryStore, LoadPhase};
