//! Gateway Error Types
//!
//! Public operations on the gateway are fail-open and return plain values;
//! these errors surface only at construction time.

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors building or configuring a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Remote analysis client error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Invalid gateway configuration: {0}")]
    Config(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
