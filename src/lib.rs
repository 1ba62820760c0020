//! RPC Key Lifecycle
//!
//! Provisioning, rotation and lookup of project-scoped RPC API keys issued
//! by a remote key service, with:
//! - One isolated configuration per network (base URL, bearer credential, quota)
//! - A remote client and a deterministic mock behind one trait
//! - A facade that picks the backend once at startup

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{FetchError, Key, KeyLifecycle, Network, ProvisionError, RemoteServiceError};
pub use infrastructure::key_service::KeyLifecycleFacade;
