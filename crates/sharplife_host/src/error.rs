// crates/sharplife_host/src/error.rs
use std::path::PathBuf;

use sharplife_shared::HResult;
use thiserror::Error;

/// Why the configuration file could not be turned into a [`Configuration`](crate::config::Configuration).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {message}")]
    Parse { message: String },
}

/// Failure of one bootstrap stage.
///
/// Every variant past configuration may carry the status code the runtime host reported.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration is invalid")]
    ConfigurationInvalid(#[from] ConfigError),

    #[error("runtime library could not be found (searched {} directories)", searched.len())]
    RuntimeNotFound { searched: Vec<PathBuf> },

    #[error("{symbol} not found in runtime library")]
    SymbolNotFound { symbol: &'static str },

    #[error("failed to get runtime host interface")]
    InterfaceUnavailable(Option<HResult>),

    #[error("failed to start the runtime")]
    StartFailed(Option<HResult>),

    #[error("failed to create execution domain")]
    DomainCreationFailed(Option<HResult>),

    #[error("failed to create delegate")]
    DelegateCreationFailed(Option<HResult>),
}

impl BootstrapError {
    /// Status code reported by the runtime host, if the stage had one.
    pub fn status(&self) -> Option<HResult> {
        match self {
            Self::InterfaceUnavailable(hr)
            | Self::StartFailed(hr)
            | Self::DomainCreationFailed(hr)
            | Self::DelegateCreationFailed(hr) => *hr,
            Self::ConfigurationInvalid(_) | Self::RuntimeNotFound { .. } | Self::SymbolNotFound { .. } => {
                None
            }
        }
    }
}

pub type Result<T, E = BootstrapError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_only_reported_for_host_stages() {
        let err = BootstrapError::StartFailed(Some(HResult::E_FAIL));
        assert_eq!(err.status(), Some(HResult::E_FAIL));

        let err = BootstrapError::SymbolNotFound { symbol: "GetCLRRuntimeHost" };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "GetCLRRuntimeHost not found in runtime library");
    }
}
