use crate::advanced::payloads::MoveArg;
use crate::error::{PermissionSdkError, Result};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 32-byte account address, rendered as `0x` + 64 lowercase hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;
    pub const ZERO: AccountAddress = AccountAddress([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Parse the strict client-side form: `0x` followed by exactly 64 hex digits
    pub fn parse_strict(s: &str) -> Result<Self> {
        if !utils::is_well_formed_address(s) {
            return Err(PermissionSdkError::InvalidAddressFormat(s.to_string()));
        }
        Self::from_hex_digits(&s[2..], s)
    }

    /// Parse an address as a node returns it, which may use the short form (`0x1`)
    pub fn parse_relaxed(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() || digits.len() > 64 {
            return Err(PermissionSdkError::InvalidAddressFormat(s.to_string()));
        }
        let padded = format!("{:0>64}", digits);
        Self::from_hex_digits(&padded, s)
    }

    fn from_hex_digits(digits: &str, original: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| PermissionSdkError::InvalidAddressFormat(original.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self)
    }
}

impl FromStr for AccountAddress {
    type Err = PermissionSdkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountAddress::parse_relaxed(&s).map_err(serde::de::Error::custom)
    }
}

/// On-chain permission status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    Active,
    Expired,
    Revoked,
    /// Any tag the client does not know about
    Unknown(u8),
}

impl PermissionStatus {
    pub const ACTIVE: u8 = 1;
    pub const EXPIRED: u8 = 2;
    pub const REVOKED: u8 = 3;

    pub fn from_code(code: u8) -> Self {
        match code {
            Self::ACTIVE => PermissionStatus::Active,
            Self::EXPIRED => PermissionStatus::Expired,
            Self::REVOKED => PermissionStatus::Revoked,
            other => PermissionStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            PermissionStatus::Active => Self::ACTIVE,
            PermissionStatus::Expired => Self::EXPIRED,
            PermissionStatus::Revoked => Self::REVOKED,
            PermissionStatus::Unknown(code) => *code,
        }
    }

    /// Human label. Table lookup only; the chain clock is authoritative.
    pub fn label(&self) -> &'static str {
        status_label(self.code())
    }
}

/// Label for a raw status code, "Unknown" for anything unrecognised
pub fn status_label(code: u8) -> &'static str {
    match code {
        PermissionStatus::ACTIVE => "Active",
        PermissionStatus::EXPIRED => "Expired",
        PermissionStatus::REVOKED => "Revoked",
        _ => "Unknown",
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Conventional permission types. The contract accepts any string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionType {
    Read,
    Write,
    Admin,
    Special,
    Custom(String),
}

impl PermissionType {
    pub const KNOWN: [PermissionType; 4] = [
        PermissionType::Read,
        PermissionType::Write,
        PermissionType::Admin,
        PermissionType::Special,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PermissionType::Read => "READ_ACCESS",
            PermissionType::Write => "WRITE_ACCESS",
            PermissionType::Admin => "ADMIN_ACCESS",
            PermissionType::Special => "SPECIAL_ACCESS",
            PermissionType::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = PermissionSdkError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(PermissionSdkError::InvalidArgument(
                "permission_type must not be empty".to_string(),
            ));
        }
        Ok(match s {
            "READ_ACCESS" => PermissionType::Read,
            "WRITE_ACCESS" => PermissionType::Write,
            "ADMIN_ACCESS" => PermissionType::Admin,
            "SPECIAL_ACCESS" => PermissionType::Special,
            other => PermissionType::Custom(other.to_string()),
        })
    }
}

impl From<PermissionType> for String {
    fn from(t: PermissionType) -> Self {
        t.as_str().to_string()
    }
}

/// A permission record as stored in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub grantee: AccountAddress,
    pub permission_type: String,
    pub expiry_timestamp: u64,
    pub granted_by: AccountAddress,
    pub granted_at: u64,
    pub status: PermissionStatus,
    pub metadata: String,
}

impl Permission {
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    /// Arguments `grant_permission` takes to recreate this record's key, expiry and metadata
    pub fn to_grant_args(&self) -> Vec<MoveArg> {
        vec![
            MoveArg::Address(self.grantee),
            MoveArg::String(self.permission_type.clone()),
            MoveArg::U64(self.expiry_timestamp),
            MoveArg::String(self.metadata.clone()),
        ]
    }
}

/// Handle returned by the wallet once a transaction is accepted by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
    #[serde(default)]
    pub sender: Option<AccountAddress>,
}

impl PendingTransaction {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            sender: None,
        }
    }
}

/// Raw event as found in a committed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub data: serde_json::Value,
}

/// Events emitted by the permission module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionEvent {
    Granted {
        grantee: AccountAddress,
        permission_type: String,
        expiry_timestamp: u64,
        granted_by: AccountAddress,
        granted_at: u64,
        permission_key: String,
    },
    Revoked {
        grantee: AccountAddress,
        permission_type: String,
        revoked_by: AccountAddress,
        revoked_at: u64,
        permission_key: String,
    },
    Expired {
        grantee: AccountAddress,
        permission_type: String,
        expired_at: u64,
        permission_key: String,
    },
}

/// Outcome of a committed transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReceipt {
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    pub abort_code: Option<u64>,
    pub gas_used: Option<u64>,
    pub version: Option<u64>,
    pub events: Vec<RawEvent>,
}

impl TransactionReceipt {
    /// Permission events in emission order; foreign events are skipped
    pub fn permission_events(&self) -> Vec<PermissionEvent> {
        self.events
            .iter()
            .filter_map(|e| utils::decode_permission_event(e).ok().flatten())
            .collect()
    }
}

/// Result of a best-effort check. `Unknown` means the lookup failed, not "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Yes,
    No,
    Unknown,
}

impl From<bool> for CheckOutcome {
    fn from(value: bool) -> Self {
        if value {
            CheckOutcome::Yes
        } else {
            CheckOutcome::No
        }
    }
}

impl CheckOutcome {
    pub fn is_yes(&self) -> bool {
        matches!(self, CheckOutcome::Yes)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Yes => "Yes",
            CheckOutcome::No => "No",
            CheckOutcome::Unknown => "Unknown",
        }
    }
}
