use crate::core::constants::MODULE_NAME;
use crate::types::AccountAddress;
use serde::{Serialize, Serializer};
use std::fmt;

/// Fully-qualified Move function: `{address}::{module}::{function}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionId {
    pub module_address: AccountAddress,
    pub module_name: String,
    pub function_name: String,
}

impl FunctionId {
    pub fn new(module_address: AccountAddress, function_name: &str) -> Self {
        Self {
            module_address,
            module_name: MODULE_NAME.to_string(),
            function_name: function_name.to_string(),
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.module_address, self.module_name, self.function_name
        )
    }
}

impl Serialize for FunctionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Positional argument, encoded the way the REST API expects JSON arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveArg {
    Address(AccountAddress),
    String(String),
    U64(u64),
}

impl MoveArg {
    /// Encoded text form: addresses as `0x` hex, integers as decimal strings
    pub fn encode(&self) -> String {
        match self {
            MoveArg::Address(a) => a.to_string(),
            MoveArg::String(s) => s.clone(),
            MoveArg::U64(v) => v.to_string(),
        }
    }
}

impl Serialize for MoveArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

/// Body of an entry-function transaction, handed to the wallet for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFunctionPayload {
    pub function: FunctionId,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<MoveArg>,
}

/// Body of a `/view` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRequest {
    pub function: FunctionId,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<MoveArg>,
}

fn entry(module: AccountAddress, name: &str, arguments: Vec<MoveArg>) -> EntryFunctionPayload {
    EntryFunctionPayload {
        function: FunctionId::new(module, name),
        type_arguments: vec![],
        arguments,
    }
}

fn view(module: AccountAddress, name: &str, arguments: Vec<MoveArg>) -> ViewRequest {
    ViewRequest {
        function: FunctionId::new(module, name),
        type_arguments: vec![],
        arguments,
    }
}

// Raw constructors. No validation beyond the types; see `basic::actions` for checked builders.

pub fn initialize(module: AccountAddress) -> EntryFunctionPayload {
    entry(module, "initialize", vec![])
}

pub fn grant_permission(
    module: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
    expiry_timestamp: u64,
    metadata: &str,
) -> EntryFunctionPayload {
    entry(
        module,
        "grant_permission",
        vec![
            MoveArg::Address(grantee),
            MoveArg::String(permission_type.to_string()),
            MoveArg::U64(expiry_timestamp),
            MoveArg::String(metadata.to_string()),
        ],
    )
}

pub fn revoke_permission(
    module: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
) -> EntryFunctionPayload {
    entry(
        module,
        "revoke_permission",
        vec![
            MoveArg::Address(grantee),
            MoveArg::String(permission_type.to_string()),
        ],
    )
}

fn permission_key_args(
    admin: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
) -> Vec<MoveArg> {
    vec![
        MoveArg::Address(admin),
        MoveArg::Address(grantee),
        MoveArg::String(permission_type.to_string()),
    ]
}

pub fn is_permission_valid(
    module: AccountAddress,
    admin: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
) -> ViewRequest {
    view(
        module,
        "is_permission_valid",
        permission_key_args(admin, grantee, permission_type),
    )
}

pub fn view_is_permission_valid(
    module: AccountAddress,
    admin: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
) -> ViewRequest {
    view(
        module,
        "view_is_permission_valid",
        permission_key_args(admin, grantee, permission_type),
    )
}

pub fn get_permission(
    module: AccountAddress,
    admin: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
) -> ViewRequest {
    view(
        module,
        "get_permission",
        permission_key_args(admin, grantee, permission_type),
    )
}

pub fn view_permission(
    module: AccountAddress,
    admin: AccountAddress,
    grantee: AccountAddress,
    permission_type: &str,
) -> ViewRequest {
    view(
        module,
        "view_permission",
        permission_key_args(admin, grantee, permission_type),
    )
}

pub fn is_admin(module: AccountAddress, account: AccountAddress, admin: AccountAddress) -> ViewRequest {
    view(
        module,
        "is_admin",
        vec![MoveArg::Address(account), MoveArg::Address(admin)],
    )
}

pub fn get_admin(module: AccountAddress, admin: AccountAddress) -> ViewRequest {
    view(module, "get_admin", vec![MoveArg::Address(admin)])
}
