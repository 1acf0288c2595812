use crate::advanced::payloads::ViewRequest;
use crate::error::{PermissionSdkError, Result};
use crate::types::{PendingTransaction, TransactionReceipt};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Read side of a chain node. Implemented by `RestConnection` and by test doubles.
#[async_trait]
pub trait AptosConnection: Send + Sync {
    /// Execute a read-only function. Failure means "unknown", never "false".
    async fn call_view(&self, request: &ViewRequest) -> Result<Vec<Value>>;

    /// Committed transaction by hash, `None` while pending or not yet indexed
    async fn get_transaction(&self, hash: &str) -> Result<Option<TransactionReceipt>>;

    /// Chain clock in Unix seconds
    async fn ledger_timestamp(&self) -> Result<u64>;
}

#[async_trait]
impl<T: AptosConnection + ?Sized> AptosConnection for Arc<T> {
    async fn call_view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        (**self).call_view(request).await
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        (**self).get_transaction(hash).await
    }

    async fn ledger_timestamp(&self) -> Result<u64> {
        (**self).ledger_timestamp().await
    }
}

/// Poll `get_transaction` until the transaction is committed or `timeout` elapses.
///
/// The returned receipt may describe a failed execution; the caller decides
/// whether that is an error. A timeout only stops the wait.
pub async fn wait_for_transaction(
    connection: &(impl AptosConnection + ?Sized),
    pending: &PendingTransaction,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<TransactionReceipt> {
    let poll = async {
        loop {
            if let Some(receipt) = connection.get_transaction(&pending.hash).await? {
                return Ok::<_, PermissionSdkError>(receipt);
            }
            tokio::time::sleep(poll_interval).await;
        }
    };

    match tokio::time::timeout(timeout, poll).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(hash = %pending.hash, ?timeout, "stopped waiting for confirmation");
            Err(PermissionSdkError::ConfirmationTimeout {
                hash: pending.hash.clone(),
            })
        },
    }
}
