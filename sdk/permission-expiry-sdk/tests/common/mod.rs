#![allow(dead_code)]

use async_trait::async_trait;
use permission_expiry_sdk::abi::abort_codes::*;
use permission_expiry_sdk::advanced::payloads::{EntryFunctionPayload, MoveArg, ViewRequest};
use permission_expiry_sdk::core::connection::AptosConnection;
use permission_expiry_sdk::core::signer::PermissionSigner;
use permission_expiry_sdk::types::{PendingTransaction, RawEvent};
use permission_expiry_sdk::{
    AccountAddress, ClientConfig, ConnectionState, Network, PermissionClient, PermissionSdkError,
    PermissionStatus, Result, TransactionReceipt, WalletAccount,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const MODULE: AccountAddress = AccountAddress::new([0x42; 32]);

// `std::error::not_found` category, as the module wraps its reasons
const NOT_FOUND_CATEGORY: u64 = 0x6 << 16;

#[derive(Debug, Clone)]
struct StoredPermission {
    grantee: AccountAddress,
    permission_type: String,
    expiry_timestamp: u64,
    granted_by: AccountAddress,
    granted_at: u64,
    revoked: bool,
    metadata: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    admin: AccountAddress,
    permissions: HashMap<(AccountAddress, String), StoredPermission>,
    next_id: u64,
}

#[derive(Default)]
struct ChainState {
    now: u64,
    registries: HashMap<AccountAddress, RegistryState>,
    committed: HashMap<String, TransactionReceipt>,
    held: HashMap<String, TransactionReceipt>,
    hold_confirmations: bool,
    fail_views: bool,
    tx_counter: u64,
}

/// In-memory stand-in for a node running the permission module
pub struct MockChain {
    state: Mutex<ChainState>,
    view_calls: AtomicUsize,
    tx_lookups: AtomicUsize,
    submissions: AtomicUsize,
}

fn abort(reason: u64, name: &str) -> (u64, String) {
    let code = if reason == E_PERMISSION_NOT_FOUND {
        NOT_FOUND_CATEGORY | reason
    } else {
        reason
    };
    (
        code,
        format!(
            "Move abort in {}::permission_expiry: {}(0x{:x}): ",
            MODULE, name, code
        ),
    )
}

fn abort_error((code, vm_status): (u64, String)) -> PermissionSdkError {
    PermissionSdkError::ExecutionAbort {
        code: Some(code),
        vm_status,
    }
}

fn arg_address(args: &[MoveArg], i: usize) -> AccountAddress {
    match &args[i] {
        MoveArg::Address(a) => *a,
        other => panic!("argument {} is not an address: {:?}", i, other),
    }
}

fn arg_string(args: &[MoveArg], i: usize) -> String {
    match &args[i] {
        MoveArg::String(s) => s.clone(),
        other => panic!("argument {} is not a string: {:?}", i, other),
    }
}

fn arg_u64(args: &[MoveArg], i: usize) -> u64 {
    match &args[i] {
        MoveArg::U64(v) => *v,
        other => panic!("argument {} is not a u64: {:?}", i, other),
    }
}

impl StoredPermission {
    fn status(&self, now: u64) -> PermissionStatus {
        if self.revoked {
            PermissionStatus::Revoked
        } else if now >= self.expiry_timestamp {
            PermissionStatus::Expired
        } else {
            PermissionStatus::Active
        }
    }

    fn to_tuple(&self, now: u64) -> Vec<Value> {
        vec![
            json!(self.grantee.to_string()),
            json!(self.permission_type),
            json!(self.expiry_timestamp.to_string()),
            json!(self.granted_by.to_string()),
            json!(self.granted_at.to_string()),
            json!(self.status(now).code()),
            json!(self.metadata),
        ]
    }

    fn to_object(&self, now: u64) -> Value {
        json!({
            "grantee": self.grantee.to_string(),
            "permission_type": self.permission_type,
            "expiry_timestamp": self.expiry_timestamp.to_string(),
            "granted_by": self.granted_by.to_string(),
            "granted_at": self.granted_at.to_string(),
            "status": self.status(now).code(),
            "metadata": self.metadata,
        })
    }
}

fn permission_key(grantee: &AccountAddress, permission_type: &str) -> String {
    format!("{}::{}", grantee, permission_type)
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Arc::new(Self {
            state: Mutex::new(ChainState {
                now,
                ..Default::default()
            }),
            view_calls: AtomicUsize::new(0),
            tx_lookups: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
        })
    }

    pub fn now(&self) -> u64 {
        self.state.lock().unwrap().now
    }

    pub fn advance(&self, secs: u64) {
        self.state.lock().unwrap().now += secs;
    }

    /// Keep committed transactions invisible until `release_held`
    pub fn hold_confirmations(&self, hold: bool) {
        self.state.lock().unwrap().hold_confirmations = hold;
    }

    pub fn release_held(&self) {
        let mut state = self.state.lock().unwrap();
        let held: Vec<_> = state.held.drain().collect();
        state.committed.extend(held);
    }

    /// Make every view call fail as if the node were unreachable
    pub fn fail_views(&self, fail: bool) {
        self.state.lock().unwrap().fail_views = fail;
    }

    pub fn view_calls(&self) -> usize {
        self.view_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.view_calls() + self.tx_lookups.load(Ordering::SeqCst) + self.submissions()
    }

    fn execute(
        &self,
        sender: AccountAddress,
        payload: &EntryFunctionPayload,
    ) -> std::result::Result<Vec<RawEvent>, (u64, String)> {
        let mut state = self.state.lock().unwrap();
        let now = state.now;
        let args = &payload.arguments;

        match payload.function.function_name.as_str() {
            "initialize" => {
                if state.registries.contains_key(&sender) {
                    return Err(abort(E_ALREADY_INITIALIZED, "E_ALREADY_INITIALIZED"));
                }
                state.registries.insert(
                    sender,
                    RegistryState {
                        admin: sender,
                        ..Default::default()
                    },
                );
                Ok(vec![])
            },
            "grant_permission" => {
                let grantee = arg_address(args, 0);
                let permission_type = arg_string(args, 1);
                let expiry_timestamp = arg_u64(args, 2);
                let metadata = arg_string(args, 3);

                let registry = state
                    .registries
                    .get_mut(&sender)
                    .ok_or_else(|| abort(E_NOT_INITIALIZED, "E_NOT_INITIALIZED"))?;
                if registry.admin != sender {
                    return Err(abort(E_NOT_ADMIN, "E_NOT_ADMIN"));
                }
                if expiry_timestamp <= now {
                    return Err(abort(E_INVALID_EXPIRY, "E_INVALID_EXPIRY"));
                }

                registry.next_id += 1;
                registry.permissions.insert(
                    (grantee, permission_type.clone()),
                    StoredPermission {
                        grantee,
                        permission_type: permission_type.clone(),
                        expiry_timestamp,
                        granted_by: sender,
                        granted_at: now,
                        revoked: false,
                        metadata,
                    },
                );

                Ok(vec![RawEvent {
                    type_tag: format!("{}::permission_expiry::PermissionGrantedEvent", MODULE),
                    data: json!({
                        "grantee": grantee.to_string(),
                        "permission_type": permission_type,
                        "expiry_timestamp": expiry_timestamp.to_string(),
                        "granted_by": sender.to_string(),
                        "granted_at": now.to_string(),
                        "permission_key": permission_key(&grantee, &permission_type),
                    }),
                }])
            },
            "revoke_permission" => {
                let grantee = arg_address(args, 0);
                let permission_type = arg_string(args, 1);

                let registry = state
                    .registries
                    .get_mut(&sender)
                    .ok_or_else(|| abort(E_NOT_INITIALIZED, "E_NOT_INITIALIZED"))?;
                let permission = registry
                    .permissions
                    .get_mut(&(grantee, permission_type.clone()))
                    .ok_or_else(|| abort(E_PERMISSION_NOT_FOUND, "E_PERMISSION_NOT_FOUND"))?;
                permission.revoked = true;

                Ok(vec![RawEvent {
                    type_tag: format!("{}::permission_expiry::PermissionRevokedEvent", MODULE),
                    data: json!({
                        "grantee": grantee.to_string(),
                        "permission_type": permission_type,
                        "revoked_by": sender.to_string(),
                        "revoked_at": now.to_string(),
                        "permission_key": permission_key(&grantee, &permission_type),
                    }),
                }])
            },
            other => panic!("mock chain does not know entry function {}", other),
        }
    }

    fn submit(&self, sender: AccountAddress, payload: &EntryFunctionPayload) -> PendingTransaction {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        let result = self.execute(sender, payload);

        let mut state = self.state.lock().unwrap();
        state.tx_counter += 1;
        let hash = format!("0x{:064x}", state.tx_counter);

        let receipt = match result {
            Ok(events) => TransactionReceipt {
                hash: hash.clone(),
                success: true,
                vm_status: "Executed successfully".to_string(),
                abort_code: None,
                gas_used: Some(1500),
                version: Some(state.tx_counter),
                events,
            },
            Err((code, vm_status)) => TransactionReceipt {
                hash: hash.clone(),
                success: false,
                vm_status,
                abort_code: Some(code),
                gas_used: Some(10),
                version: Some(state.tx_counter),
                events: vec![],
            },
        };

        if state.hold_confirmations {
            state.held.insert(hash.clone(), receipt);
        } else {
            state.committed.insert(hash.clone(), receipt);
        }

        PendingTransaction {
            hash,
            sender: Some(sender),
        }
    }

    fn lookup(
        &self,
        state: &ChainState,
        admin: AccountAddress,
        grantee: AccountAddress,
        permission_type: &str,
    ) -> std::result::Result<StoredPermission, PermissionSdkError> {
        let registry = state
            .registries
            .get(&admin)
            .ok_or_else(|| abort_error(abort(E_NOT_INITIALIZED, "E_NOT_INITIALIZED")))?;
        registry
            .permissions
            .get(&(grantee, permission_type.to_string()))
            .cloned()
            .ok_or_else(|| abort_error(abort(E_PERMISSION_NOT_FOUND, "E_PERMISSION_NOT_FOUND")))
    }
}

#[async_trait]
impl AptosConnection for MockChain {
    async fn call_view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        self.view_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_views {
            return Err(PermissionSdkError::ViewCall("connection refused".to_string()));
        }
        assert_eq!(request.function.module_address, MODULE);

        let now = state.now;
        let args = &request.arguments;
        match request.function.function_name.as_str() {
            "is_permission_valid" | "view_is_permission_valid" => {
                let registry_exists = state.registries.contains_key(&arg_address(args, 0));
                if !registry_exists {
                    return Err(abort_error(abort(E_NOT_INITIALIZED, "E_NOT_INITIALIZED")));
                }
                let valid = self
                    .lookup(&state, arg_address(args, 0), arg_address(args, 1), &arg_string(args, 2))
                    .map(|p| p.status(now) == PermissionStatus::Active)
                    .unwrap_or(false);
                Ok(vec![json!(valid)])
            },
            "get_permission" => {
                let p = self.lookup(&state, arg_address(args, 0), arg_address(args, 1), &arg_string(args, 2))?;
                Ok(p.to_tuple(now))
            },
            "view_permission" => {
                let p = self.lookup(&state, arg_address(args, 0), arg_address(args, 1), &arg_string(args, 2))?;
                Ok(vec![p.to_object(now)])
            },
            "is_admin" => {
                let account = arg_address(args, 0);
                let admin = arg_address(args, 1);
                let is_admin = state
                    .registries
                    .get(&admin)
                    .map_or(false, |r| r.admin == account);
                Ok(vec![json!(is_admin)])
            },
            "get_admin" => {
                let registry = state
                    .registries
                    .get(&arg_address(args, 0))
                    .ok_or_else(|| abort_error(abort(E_NOT_INITIALIZED, "E_NOT_INITIALIZED")))?;
                Ok(vec![json!(registry.admin.to_string())])
            },
            other => panic!("mock chain does not know view function {}", other),
        }
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        self.tx_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().committed.get(hash).cloned())
    }

    async fn ledger_timestamp(&self) -> Result<u64> {
        Ok(self.now())
    }
}

/// Wallet double that submits straight to a `MockChain`
pub struct MockWallet {
    chain: Arc<MockChain>,
    pub address: AccountAddress,
    pub network: Option<String>,
    pub reject: bool,
}

impl MockWallet {
    pub fn new(chain: &Arc<MockChain>, seed: u8) -> Self {
        Self {
            chain: chain.clone(),
            address: AccountAddress::new([seed; 32]),
            network: Some("devnet".to_string()),
            reject: false,
        }
    }

    pub fn on_network(mut self, network: &str) -> Self {
        self.network = Some(network.to_string());
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::Connected(WalletAccount {
            address: self.address,
            network: self.network.clone(),
        })
    }

    pub fn address_str(&self) -> String {
        self.address.to_string()
    }
}

#[async_trait]
impl PermissionSigner for MockWallet {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn network(&self) -> Option<String> {
        self.network.clone()
    }

    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> Result<PendingTransaction> {
        if self.reject {
            return Err(PermissionSdkError::WalletRejected("User rejected the request".to_string()));
        }
        Ok(self.chain.submit(self.address, payload))
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new(Network::Devnet, MODULE)
        .with_confirmation_timeout(Duration::from_millis(300))
        .with_poll_interval(Duration::from_millis(10))
}

pub fn setup() -> (Arc<MockChain>, PermissionClient<Arc<MockChain>>) {
    let chain = MockChain::new();
    let client = PermissionClient::new(chain.clone(), test_config()).unwrap();
    (chain, client)
}

/// Chain with an initialized registry owned by the returned admin wallet
pub async fn setup_with_registry() -> anyhow::Result<(Arc<MockChain>, PermissionClient<Arc<MockChain>>, MockWallet)> {
    let (chain, client) = setup();
    let admin = MockWallet::new(&chain, 0xAD);
    client.initialize().send(&admin.state(), &admin).await?;
    Ok((chain, client, admin))
}

pub fn zero_address() -> String {
    format!("0x{}", "0".repeat(64))
}
