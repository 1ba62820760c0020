use thiserror::Error;

use super::key::Network;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure talking to the remote key-issuing service
#[derive(Debug, Error)]
pub enum RemoteServiceError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
}

impl RemoteServiceError {
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// URL of the request that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::MalformedResponse { url, .. } => url,
        }
    }
}

/// Failure resolving the current key of a project
#[derive(Debug, Error)]
pub enum FetchError {
    /// The project has no key with `invalid == false`. Expected after an
    /// invalidation, so callers branch on this variant.
    #[error("No valid key for project '{project_ref}' on {network} ({total} keys found)")]
    NoValidKey {
        project_ref: String,
        network: Network,
        total: usize,
    },

    #[error(transparent)]
    Remote(#[from] RemoteServiceError),
}

impl FetchError {
    pub fn is_no_valid_key(&self) -> bool {
        matches!(self, Self::NoValidKey { .. })
    }
}

/// Failure provisioning a new project.
///
/// The two variants tell apart a project that was never created from one
/// that exists remotely but did not receive its first token.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Failed to create project '{project_ref}' on {network}")]
    ProjectCreation {
        project_ref: String,
        network: Network,
        #[source]
        source: RemoteServiceError,
    },

    #[error("Project '{project_ref}' created on {network} but initial token issuance failed")]
    InitialToken {
        project_ref: String,
        network: Network,
        #[source]
        source: RemoteServiceError,
    },
}

impl ProvisionError {
    pub fn project_creation(
        project_ref: impl Into<String>,
        network: Network,
        source: RemoteServiceError,
    ) -> Self {
        Self::ProjectCreation {
            project_ref: project_ref.into(),
            network,
            source,
        }
    }

    pub fn initial_token(
        project_ref: impl Into<String>,
        network: Network,
        source: RemoteServiceError,
    ) -> Self {
        Self::InitialToken {
            project_ref: project_ref.into(),
            network,
            source,
        }
    }

    /// Whether the remote project exists despite the failure
    pub fn project_created(&self) -> bool {
        matches!(self, Self::InitialToken { .. })
    }

    pub fn remote_cause(&self) -> &RemoteServiceError {
        match self {
            Self::ProjectCreation { source, .. } | Self::InitialToken { source, .. } => source,
        }
    }
}
