use crate::advanced::payloads::EntryFunctionPayload;
use crate::error::Result;
use crate::types::{AccountAddress, PendingTransaction};
use async_trait::async_trait;

/// Abstraction for an entity that can sign and submit entry-function transactions.
/// This allows the SDK to work with:
/// 1. Browser wallet adapters (the wallet builds, signs and submits)
/// 2. Local accounts in scripts and tests
#[async_trait]
pub trait PermissionSigner: Send + Sync {
    fn address(&self) -> AccountAddress;

    /// Network name the wallet is connected to, if it reports one
    fn network(&self) -> Option<String> {
        None
    }

    /// Sign the payload and submit it to the node.
    /// Returns `WalletRejected` when the user declines.
    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> Result<PendingTransaction>;
}
