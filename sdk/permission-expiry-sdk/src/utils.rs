use crate::core::constants::{ADDRESS_STR_LEN, SECONDS_PER_HOUR};
use crate::error::{PermissionSdkError, Result};
use crate::types::{AccountAddress, Permission, PermissionEvent, PermissionStatus, RawEvent};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

//=============================================================================
// Argument Validation
//=============================================================================

/// `0x` followed by exactly 64 hex digits
pub fn is_well_formed_address(s: &str) -> bool {
    s.len() == ADDRESS_STR_LEN
        && s.starts_with("0x")
        && s[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse a user-supplied address, rejecting anything but the canonical long form
pub fn parse_address_arg(s: &str) -> Result<AccountAddress> {
    AccountAddress::parse_strict(s)
}

pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PermissionSdkError::InvalidArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

//=============================================================================
// Time
//=============================================================================

pub fn current_unix_seconds() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| PermissionSdkError::InvalidArgument(format!("system clock before epoch: {}", e)))
}

/// `now + hours * 3600`, rejecting zero durations and overflow
pub fn compute_expiry(hours: u64, now: u64) -> Result<u64> {
    if hours == 0 {
        return Err(PermissionSdkError::InvalidArgument(
            "expiry duration must be at least one hour".to_string(),
        ));
    }
    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|secs| now.checked_add(secs))
        .ok_or_else(|| {
            PermissionSdkError::InvalidArgument(format!("expiry of {} hours overflows u64", hours))
        })
}

/// Expiry measured from the caller's wall clock at the moment of the call
pub fn compute_expiry_from_now(hours: u64) -> Result<u64> {
    compute_expiry(hours, current_unix_seconds()?)
}

//=============================================================================
// View Result Decoding
//=============================================================================

fn decode_err(what: &str, value: &Value) -> PermissionSdkError {
    PermissionSdkError::ViewDecode(format!("expected {}, got {}", what, value))
}

/// Accepts a decimal string or a JSON integer. No float round-trip.
pub fn decode_u64(value: &Value) -> Result<u64> {
    match value {
        Value::String(s) => s.parse::<u64>().map_err(|_| decode_err("u64", value)),
        Value::Number(n) => n.as_u64().ok_or_else(|| decode_err("u64", value)),
        _ => Err(decode_err("u64", value)),
    }
}

pub fn decode_u8(value: &Value) -> Result<u8> {
    let v = decode_u64(value)?;
    u8::try_from(v).map_err(|_| decode_err("u8", value))
}

pub fn decode_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        _ => Err(decode_err("bool", value)),
    }
}

pub fn decode_address(value: &Value) -> Result<AccountAddress> {
    match value {
        Value::String(s) => AccountAddress::parse_relaxed(s).map_err(|_| decode_err("address", value)),
        _ => Err(decode_err("address", value)),
    }
}

pub fn decode_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(decode_err("string", value)),
    }
}

/// The one value a single-return function produced
pub fn single_return<'a>(values: &'a [Value], function: &str) -> Result<&'a Value> {
    match values {
        [value] => Ok(value),
        _ => Err(PermissionSdkError::ViewDecode(format!(
            "`{}` returned {} values, expected 1",
            function,
            values.len()
        ))),
    }
}

/// Positional form: `(grantee, permission_type, expiry, granted_by, granted_at, status, metadata)`
pub fn decode_permission_tuple(values: &[Value]) -> Result<Permission> {
    let [grantee, permission_type, expiry, granted_by, granted_at, status, metadata] = values else {
        return Err(PermissionSdkError::ViewDecode(format!(
            "permission tuple has {} fields, expected 7",
            values.len()
        )));
    };

    Ok(Permission {
        grantee: decode_address(grantee)?,
        permission_type: decode_string(permission_type)?,
        expiry_timestamp: decode_u64(expiry)?,
        granted_by: decode_address(granted_by)?,
        granted_at: decode_u64(granted_at)?,
        status: PermissionStatus::from_code(decode_u8(status)?),
        metadata: decode_string(metadata)?,
    })
}

fn field<'a>(object: &'a Value, name: &str) -> Result<&'a Value> {
    object
        .get(name)
        .ok_or_else(|| PermissionSdkError::ViewDecode(format!("missing field `{}`", name)))
}

/// Struct form returned by `view_permission`
pub fn decode_permission_object(object: &Value) -> Result<Permission> {
    if !object.is_object() {
        return Err(decode_err("Permission struct", object));
    }

    Ok(Permission {
        grantee: decode_address(field(object, "grantee")?)?,
        permission_type: decode_string(field(object, "permission_type")?)?,
        expiry_timestamp: decode_u64(field(object, "expiry_timestamp")?)?,
        granted_by: decode_address(field(object, "granted_by")?)?,
        granted_at: decode_u64(field(object, "granted_at")?)?,
        status: PermissionStatus::from_code(decode_u8(field(object, "status")?)?),
        metadata: decode_string(field(object, "metadata")?)?,
    })
}

/// Decode either return shape. An empty result or a `null` struct is "not found".
pub fn decode_permission(values: &[Value]) -> Result<Option<Permission>> {
    match values {
        [] | [Value::Null] => Ok(None),
        [object @ Value::Object(_)] => decode_permission_object(object).map(Some),
        _ => decode_permission_tuple(values).map(Some),
    }
}

//=============================================================================
// Event Decoding
//=============================================================================

/// Decode a module event. `Ok(None)` for events of other modules or structs.
pub fn decode_permission_event(event: &RawEvent) -> Result<Option<PermissionEvent>> {
    if !event.type_tag.contains("::permission_expiry::") {
        return Ok(None);
    }
    let struct_name = event.type_tag.rsplit("::").next().unwrap_or_default();

    let data = &event.data;
    let decoded = match struct_name {
        "PermissionGrantedEvent" => PermissionEvent::Granted {
            grantee: decode_address(field(data, "grantee")?)?,
            permission_type: decode_string(field(data, "permission_type")?)?,
            expiry_timestamp: decode_u64(field(data, "expiry_timestamp")?)?,
            granted_by: decode_address(field(data, "granted_by")?)?,
            granted_at: decode_u64(field(data, "granted_at")?)?,
            permission_key: decode_string(field(data, "permission_key")?)?,
        },
        "PermissionRevokedEvent" => PermissionEvent::Revoked {
            grantee: decode_address(field(data, "grantee")?)?,
            permission_type: decode_string(field(data, "permission_type")?)?,
            revoked_by: decode_address(field(data, "revoked_by")?)?,
            revoked_at: decode_u64(field(data, "revoked_at")?)?,
            permission_key: decode_string(field(data, "permission_key")?)?,
        },
        "PermissionExpiredEvent" => PermissionEvent::Expired {
            grantee: decode_address(field(data, "grantee")?)?,
            permission_type: decode_string(field(data, "permission_type")?)?,
            expired_at: decode_u64(field(data, "expired_at")?)?,
            permission_key: decode_string(field(data, "permission_key")?)?,
        },
        _ => return Ok(None),
    };

    Ok(Some(decoded))
}

//=============================================================================
// VM Status Parsing
//=============================================================================

fn parse_code(token: &str) -> Option<u64> {
    match token.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

/// Extract the abort code from a VM status string.
///
/// Handles `Move abort in 0x42::permission_expiry: E_NOT_ADMIN(0x1): ...`,
/// `Move abort: code 0x60002` and `Move abort in 0x1::m: 0x60002`.
pub fn parse_abort_code(vm_status: &str) -> Option<u64> {
    let lower = vm_status.to_ascii_lowercase();
    let start = lower.find("abort")?;
    let tail = &vm_status[start..];

    if let Some(open) = tail.find("(0x") {
        let inner = &tail[open + 1..];
        if let Some(close) = inner.find(')') {
            if let Some(code) = parse_code(&inner[..close]) {
                return Some(code);
            }
        }
    }

    if let Some(pos) = tail.to_ascii_lowercase().find("code ") {
        let token = tail[pos + 5..]
            .split(|c: char| c.is_whitespace() || c == ',' || c == ':' || c == ')')
            .next()
            .unwrap_or_default();
        if let Some(code) = parse_code(token) {
            return Some(code);
        }
    }

    tail.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == ':' || c == ',' || c == '(' || c == ')' || c == '.'))
        .filter(|t| t.starts_with("0x") && !t.contains("::"))
        .filter_map(parse_code)
        .last()
}
