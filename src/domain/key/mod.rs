//! Project API keys scoped per network

mod entity;
mod lifecycle;
mod network;

pub use entity::Key;
pub use lifecycle::KeyLifecycle;
pub use network::{Network, NetworkContext, ParseNetworkError};

#[cfg(test)]
pub use lifecycle::MockKeyLifecycle;
