pub mod abi;
pub mod advanced;
pub mod basic;
pub mod core;
pub mod error;
pub mod types;
pub mod utils;

pub use crate::basic::client::PermissionClient;
pub use crate::core::config::ClientConfig;
pub use crate::core::connection::AptosConnection;
pub use crate::core::network::{ConnectionState, Network, WalletAccount};
pub use crate::core::rest::RestConnection;
pub use crate::core::signer::PermissionSigner;
pub use crate::error::{PermissionSdkError, Result};
pub use crate::types::{
    status_label, AccountAddress, CheckOutcome, Permission, PermissionEvent, PermissionStatus,
    PermissionType, TransactionReceipt,
};
pub use crate::utils::{compute_expiry, compute_expiry_from_now, is_well_formed_address};
