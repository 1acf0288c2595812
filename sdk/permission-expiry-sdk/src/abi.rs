//! Static description of the `permission_expiry` module interface.
//!
//! Mirrors the exposed functions of the published module, minus the leading
//! `&signer` parameter of entry functions (the wallet supplies it). Used to
//! check payload arity before submission and to report gas estimates.

use crate::error::{PermissionSdkError, Result};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Signed, state-changing
    Entry,
    /// `#[view]`, callable through the view endpoint
    View,
    /// Public read function without the view attribute
    Public,
}

impl FunctionKind {
    pub fn is_entry(&self) -> bool {
        matches!(self, FunctionKind::Entry)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AbiFunction {
    pub name: &'static str,
    pub kind: FunctionKind,
    pub params: &'static [&'static str],
    pub returns: &'static [&'static str],
    /// Gas units measured for typical calls; zero for reads
    pub estimated_gas_units: u64,
    pub description: &'static str,
}

const STRING: &str = "0x1::string::String";

pub const PERMISSION_EXPIRY_ABI: &[AbiFunction] = &[
    AbiFunction {
        name: "initialize",
        kind: FunctionKind::Entry,
        params: &[],
        returns: &[],
        estimated_gas_units: 1500,
        description: "Initialize permission registry - creates global resource",
    },
    AbiFunction {
        name: "grant_permission",
        kind: FunctionKind::Entry,
        params: &["address", STRING, "u64", STRING],
        returns: &[],
        estimated_gas_units: 2000,
        description: "Grant new permission - writes to storage, emits event",
    },
    AbiFunction {
        name: "revoke_permission",
        kind: FunctionKind::Entry,
        params: &["address", STRING],
        returns: &[],
        estimated_gas_units: 1800,
        description: "Revoke existing permission - updates storage, emits event",
    },
    AbiFunction {
        name: "is_permission_valid",
        kind: FunctionKind::Public,
        params: &["address", "address", STRING],
        returns: &["bool"],
        estimated_gas_units: 0,
        description: "Check permission validity - read-only operation",
    },
    AbiFunction {
        name: "get_permission",
        kind: FunctionKind::Public,
        params: &["address", "address", STRING],
        returns: &["address", STRING, "u64", "address", "u64", "u8", STRING],
        estimated_gas_units: 0,
        description: "Get permission fields - read-only operation",
    },
    AbiFunction {
        name: "is_admin",
        kind: FunctionKind::Public,
        params: &["address", "address"],
        returns: &["bool"],
        estimated_gas_units: 0,
        description: "Check admin status - read-only operation",
    },
    AbiFunction {
        name: "get_admin",
        kind: FunctionKind::Public,
        params: &["address"],
        returns: &["address"],
        estimated_gas_units: 0,
        description: "Get admin address - read-only operation",
    },
    AbiFunction {
        name: "view_permission",
        kind: FunctionKind::View,
        params: &["address", "address", STRING],
        returns: &["permission_expiry::Permission"],
        estimated_gas_units: 0,
        description: "Get permission details - read-only operation",
    },
    AbiFunction {
        name: "view_is_permission_valid",
        kind: FunctionKind::View,
        params: &["address", "address", STRING],
        returns: &["bool"],
        estimated_gas_units: 0,
        description: "Check permission validity - read-only operation",
    },
];

pub fn find_function(name: &str) -> Option<&'static AbiFunction> {
    PERMISSION_EXPIRY_ABI.iter().find(|f| f.name == name)
}

/// Check that `name` exists, has the expected kind and takes `arg_count` arguments
pub fn check_call(name: &str, entry: bool, arg_count: usize) -> Result<&'static AbiFunction> {
    let function = find_function(name).ok_or_else(|| {
        PermissionSdkError::InvalidArgument(format!("unknown function `{}`", name))
    })?;

    if function.kind.is_entry() != entry {
        return Err(PermissionSdkError::InvalidArgument(format!(
            "`{}` is not an {} function",
            name,
            if entry { "entry" } else { "read" }
        )));
    }

    if function.params.len() != arg_count {
        return Err(PermissionSdkError::InvalidArgument(format!(
            "`{}` takes {} arguments, got {}",
            name,
            function.params.len(),
            arg_count
        )));
    }

    Ok(function)
}

//=============================================================================
// Abort codes
//=============================================================================

pub mod abort_codes {
    pub const E_NOT_ADMIN: u64 = 1;
    pub const E_PERMISSION_NOT_FOUND: u64 = 2;
    pub const E_ALREADY_INITIALIZED: u64 = 3;
    pub const E_INVALID_EXPIRY: u64 = 4;
    pub const E_NOT_INITIALIZED: u64 = 5;
}

/// Strip the `std::error` category (upper bits) and keep the module reason
pub fn abort_reason(code: u64) -> u64 {
    code & 0xffff
}

pub fn describe_abort(code: u64) -> &'static str {
    use abort_codes::*;
    match abort_reason(code) {
        E_NOT_ADMIN => "caller is not the registry admin",
        E_PERMISSION_NOT_FOUND => "permission not found",
        E_ALREADY_INITIALIZED => "registry already initialized",
        E_INVALID_EXPIRY => "expiry timestamp is not in the future",
        E_NOT_INITIALIZED => "registry not initialized",
        _ => "unknown abort code",
    }
}

/// Plain-text gas estimate table
pub fn gas_report() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "| {:<25} | {:<9} | {:<6} | Description",
        "Function Name", "Gas Units", "Kind"
    );
    for f in PERMISSION_EXPIRY_ABI {
        let gas = if f.estimated_gas_units == 0 {
            "FREE".to_string()
        } else {
            f.estimated_gas_units.to_string()
        };
        let kind = if f.kind.is_entry() { "entry" } else { "view" };
        let _ = writeln!(
            out,
            "| {:<25} | {:<9} | {:<6} | {}",
            f.name, gas, kind, f.description
        );
    }
    out
}
