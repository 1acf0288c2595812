use crate::abi::{self, abort_codes};
use crate::advanced::payloads::{self, EntryFunctionPayload, ViewRequest};
use crate::basic::actions::{GrantPermissionBuilder, InitializeBuilder, RevokePermissionBuilder};
use crate::basic::registry::Registry;
use crate::core::config::ClientConfig;
use crate::core::connection::{wait_for_transaction, AptosConnection};
use crate::core::network::{ensure_network, ConnectionState};
use crate::core::signer::PermissionSigner;
use crate::error::{PermissionSdkError, Result};
use crate::types::{AccountAddress, CheckOutcome, Permission, TransactionReceipt};
use crate::utils;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Typed bindings for the `permission_expiry` module.
///
/// Constructed explicitly from a connection and a config; there is no shared
/// global client. All authoritative state is fetched per call.
#[derive(Debug, Clone)]
pub struct PermissionClient<C> {
    connection: C,
    config: ClientConfig,
}

impl<C: AptosConnection> PermissionClient<C> {
    pub fn new(connection: C, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { connection, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn module_address(&self) -> AccountAddress {
        self.config.module_address
    }

    /// Handle scoped to the registry owned by `admin`
    pub fn registry(&self, admin: AccountAddress) -> Registry<'_, C> {
        Registry::new(self, admin)
    }

    //=========================================================================
    // Entry functions
    //=========================================================================

    pub fn initialize(&self) -> InitializeBuilder<'_, C> {
        InitializeBuilder::new(self)
    }

    pub fn grant_permission(&self) -> GrantPermissionBuilder<'_, C> {
        GrantPermissionBuilder::new(self)
    }

    pub fn revoke_permission(&self) -> RevokePermissionBuilder<'_, C> {
        RevokePermissionBuilder::new(self)
    }

    /// Checks that must pass before the wallet is asked to sign
    pub fn preflight(&self, state: &ConnectionState, signer: &impl PermissionSigner) -> Result<()> {
        let account = state.require_account()?;
        let reported = account.network.clone().or_else(|| signer.network());
        ensure_network(&self.config.network, reported.as_deref())
    }

    /// Sign, submit and wait for the transaction to be committed.
    ///
    /// A committed-but-failed transaction is returned as `ExecutionAbort`.
    /// On `ConfirmationTimeout` the transaction may still land; re-query with
    /// [`PermissionClient::transaction_status`].
    pub async fn submit_and_confirm(
        &self,
        payload: &EntryFunctionPayload,
        signer: &impl PermissionSigner,
    ) -> Result<TransactionReceipt> {
        abi::check_call(&payload.function.function_name, true, payload.arguments.len())?;
        debug!(
            function = %payload.function,
            args = payload.arguments.len(),
            sender = %signer.address(),
            "submitting entry function"
        );

        let pending = signer.sign_and_submit(payload).await?;
        let receipt = wait_for_transaction(
            &self.connection,
            &pending,
            self.config.confirmation_timeout,
            self.config.poll_interval,
        )
        .await?;

        info!(hash = %receipt.hash, success = receipt.success, "transaction committed");
        if !receipt.success {
            return Err(PermissionSdkError::ExecutionAbort {
                code: receipt.abort_code,
                vm_status: receipt.vm_status.clone(),
            });
        }
        Ok(receipt)
    }

    /// Committed receipt for `hash`, `None` while still pending or unknown
    pub async fn transaction_status(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        self.connection.get_transaction(hash).await
    }

    //=========================================================================
    // View functions
    //=========================================================================

    async fn view(&self, request: ViewRequest) -> Result<Vec<Value>> {
        abi::check_call(&request.function.function_name, false, request.arguments.len())?;
        debug!(function = %request.function, args = request.arguments.len(), "view call");
        self.connection.call_view(&request).await
    }

    async fn view_bool(&self, request: ViewRequest) -> Result<bool> {
        let name = request.function.function_name.clone();
        let values = self.view(request).await?;
        utils::decode_bool(utils::single_return(&values, &name)?)
    }

    pub async fn is_permission_valid(&self, admin: &str, grantee: &str, permission_type: &str) -> Result<bool> {
        let (admin, grantee) = parse_pair(admin, grantee)?;
        utils::require_non_empty("permission_type", permission_type)?;
        self.view_bool(payloads::is_permission_valid(
            self.module_address(),
            admin,
            grantee,
            permission_type,
        ))
        .await
    }

    pub async fn view_is_permission_valid(
        &self,
        admin: &str,
        grantee: &str,
        permission_type: &str,
    ) -> Result<bool> {
        let (admin, grantee) = parse_pair(admin, grantee)?;
        utils::require_non_empty("permission_type", permission_type)?;
        self.view_bool(payloads::view_is_permission_valid(
            self.module_address(),
            admin,
            grantee,
            permission_type,
        ))
        .await
    }

    /// `None` when the registry has no record for the key
    pub async fn get_permission(
        &self,
        admin: &str,
        grantee: &str,
        permission_type: &str,
    ) -> Result<Option<Permission>> {
        let (admin, grantee) = parse_pair(admin, grantee)?;
        utils::require_non_empty("permission_type", permission_type)?;
        let request = payloads::get_permission(self.module_address(), admin, grantee, permission_type);
        not_found_as_none(self.view(request).await)
    }

    /// Same as [`PermissionClient::get_permission`] through the struct-returning view
    pub async fn view_permission(
        &self,
        admin: &str,
        grantee: &str,
        permission_type: &str,
    ) -> Result<Option<Permission>> {
        let (admin, grantee) = parse_pair(admin, grantee)?;
        utils::require_non_empty("permission_type", permission_type)?;
        let request = payloads::view_permission(self.module_address(), admin, grantee, permission_type);
        not_found_as_none(self.view(request).await)
    }

    pub async fn is_admin(&self, account: &str, admin: &str) -> Result<bool> {
        let (account, admin) = parse_pair(account, admin)?;
        self.view_bool(payloads::is_admin(self.module_address(), account, admin))
            .await
    }

    pub async fn get_admin(&self, admin: &str) -> Result<AccountAddress> {
        let admin = utils::parse_address_arg(admin)?;
        let values = self
            .view(payloads::get_admin(self.module_address(), admin))
            .await?;
        utils::decode_address(utils::single_return(&values, "get_admin")?)
    }

    //=========================================================================
    // Best-effort checks
    //=========================================================================

    /// Validity check for display. Lookup failures become `Unknown`, never `No`.
    pub async fn check_permission(&self, admin: &str, grantee: &str, permission_type: &str) -> CheckOutcome {
        match self
            .view_is_permission_valid(admin, grantee, permission_type)
            .await
        {
            Ok(valid) => valid.into(),
            Err(err) => {
                warn!(%err, grantee, permission_type, "permission check degraded to unknown");
                CheckOutcome::Unknown
            },
        }
    }

    /// Admin check for deciding what to render. Advisory only.
    pub async fn check_admin(&self, account: &str, admin: &str) -> CheckOutcome {
        match self.is_admin(account, admin).await {
            Ok(is_admin) => is_admin.into(),
            Err(err) => {
                warn!(%err, account, "admin check degraded to unknown");
                CheckOutcome::Unknown
            },
        }
    }

    /// Whether the connected account already owns an initialized registry
    pub async fn check_own_registry(&self, state: &ConnectionState) -> CheckOutcome {
        match state.account() {
            Some(account) => {
                let address = account.address.to_string();
                self.check_admin(&address, &address).await
            },
            None => CheckOutcome::Unknown,
        }
    }
}

fn parse_pair(a: &str, b: &str) -> Result<(AccountAddress, AccountAddress)> {
    Ok((utils::parse_address_arg(a)?, utils::parse_address_arg(b)?))
}

fn not_found_as_none(result: Result<Vec<Value>>) -> Result<Option<Permission>> {
    match result {
        Ok(values) => utils::decode_permission(&values),
        Err(PermissionSdkError::ExecutionAbort { code: Some(code), .. })
            if abi::abort_reason(code) == abort_codes::E_PERMISSION_NOT_FOUND =>
        {
            Ok(None)
        },
        Err(err) => Err(err),
    }
}
