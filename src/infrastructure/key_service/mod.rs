//! Key lifecycle implementations backed by the key-issuing service

mod facade;
mod factory;
pub mod http_client;
mod mock_client;
mod network_store;
mod remote_client;

pub use facade::KeyLifecycleFacade;
pub use factory::KeyLifecycleFactory;
pub use http_client::{HttpClient, HttpClientTrait};
pub use mock_client::{MockKeyLifecycleClient, MOCK_QUOTA};
pub use network_store::NetworkCredentialStore;
pub use remote_client::RemoteKeyLifecycleClient;
