use crate::core::network::Network;
use thiserror::Error;

/// SDK-specific error types for permission registry operations
#[derive(Debug, Error)]
pub enum PermissionSdkError {
    /// Address did not pass the client-side `0x` + 64 hex check
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    /// Any other argument rejected before reaching the network
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No wallet connected
    #[error("Wallet not connected")]
    NotConnected,

    /// Wallet reports a different network than the configured target
    #[error("Wrong network: expected {expected}, wallet is on {actual}")]
    WrongNetwork { expected: Network, actual: String },

    /// User declined to sign
    #[error("Wallet rejected the request: {0}")]
    WalletRejected(String),

    /// Transport failure, safe to retry unmodified
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Submission failed for a reason other than the contract (funds, sequence number, ...)
    #[error("Submission error: {0}")]
    Submission(String),

    /// The contract aborted the call
    #[error("Execution aborted (code {code:?}): {vm_status}")]
    ExecutionAbort { code: Option<u64>, vm_status: String },

    /// View call failed without an on-chain abort
    #[error("View call error: {0}")]
    ViewCall(String),

    /// Return value did not have the expected shape
    #[error("View decode error: {0}")]
    ViewDecode(String),

    /// Stopped waiting for confirmation; the transaction may still be committed
    #[error("Timed out waiting for transaction {hash}")]
    ConfirmationTimeout { hash: String },

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PermissionSdkError {
    /// Whether the same call can be retried without modification
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            PermissionSdkError::NetworkUnavailable(_) | PermissionSdkError::ViewCall(_)
        )
    }

    /// User-initiated cancellation rather than a failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PermissionSdkError::WalletRejected(_))
    }

    /// Abort code carried by an on-chain rejection
    pub fn abort_code(&self) -> Option<u64> {
        match self {
            PermissionSdkError::ExecutionAbort { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PermissionSdkError {
    fn from(err: serde_json::Error) -> Self {
        PermissionSdkError::ViewDecode(err.to_string())
    }
}

impl From<reqwest::Error> for PermissionSdkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PermissionSdkError::ViewDecode(err.to_string())
        } else {
            PermissionSdkError::NetworkUnavailable(err.to_string())
        }
    }
}

impl From<toml::de::Error> for PermissionSdkError {
    fn from(err: toml::de::Error) -> Self {
        PermissionSdkError::Config(err.to_string())
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, PermissionSdkError>;
