use std::any::type_name;
use std::error::Error as StdError;

use thiserror::Error;

/// Failures raised while resolving a contract.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("no binding registered for `{contract}`")]
    NotBound { contract: &'static str },

    #[error("failed to construct `{implementation}`: {source}")]
    Construction {
        implementation: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("dependency cycle while constructing `{implementation}`")]
    Cycle { implementation: &'static str },

    #[error("binding for `{contract}` resolved to `{implementation}`, which does not provide it")]
    TypeMismatch {
        contract: &'static str,
        implementation: &'static str,
    },
}

impl ContainerError {
    /// Wraps a constructor failure of implementation `I`.
    pub fn construction<I: ?Sized>(source: impl StdError + Send + Sync + 'static) -> Self {
        ContainerError::Construction {
            implementation: type_name::<I>(),
            source: Box::new(source),
        }
    }
}
