//! Domain layer - Core business logic and entities

pub mod error;
pub mod key;

pub use error::{BoxError, FetchError, ProvisionError, RemoteServiceError};
pub use key::{Key, KeyLifecycle, Network, NetworkContext, ParseNetworkError};
