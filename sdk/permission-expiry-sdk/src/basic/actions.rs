use crate::advanced::payloads::{self, EntryFunctionPayload};
use crate::basic::client::PermissionClient;
use crate::core::connection::AptosConnection;
use crate::core::network::ConnectionState;
use crate::core::signer::PermissionSigner;
use crate::error::{PermissionSdkError, Result};
use crate::types::{PermissionType, TransactionReceipt};
use crate::utils;

pub struct InitializeBuilder<'a, C> {
    client: &'a PermissionClient<C>,
}

impl<'a, C: AptosConnection> InitializeBuilder<'a, C> {
    pub fn new(client: &'a PermissionClient<C>) -> Self {
        Self { client }
    }

    pub fn build_payload(&self) -> EntryFunctionPayload {
        payloads::initialize(self.client.module_address())
    }

    /// Creates a registry with the signer as its admin
    pub async fn send(
        &self,
        state: &ConnectionState,
        signer: &impl PermissionSigner,
    ) -> Result<TransactionReceipt> {
        self.client.preflight(state, signer)?;
        self.client
            .submit_and_confirm(&self.build_payload(), signer)
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expiry {
    /// Duration from the moment the payload is built
    Hours(u64),
    /// Absolute Unix seconds
    At(u64),
}

pub struct GrantPermissionBuilder<'a, C> {
    client: &'a PermissionClient<C>,
    grantee: Option<String>,
    permission_type: Option<String>,
    expiry: Option<Expiry>,
    metadata: Option<String>,
}

impl<'a, C: AptosConnection> GrantPermissionBuilder<'a, C> {
    pub fn new(client: &'a PermissionClient<C>) -> Self {
        Self {
            client,
            grantee: None,
            permission_type: None,
            expiry: None,
            metadata: None,
        }
    }

    pub fn with_grantee(mut self, grantee: impl Into<String>) -> Self {
        self.grantee = Some(grantee.into());
        self
    }

    pub fn with_permission_type(mut self, permission_type: impl Into<String>) -> Self {
        self.permission_type = Some(permission_type.into());
        self
    }

    pub fn with_type(self, permission_type: PermissionType) -> Self {
        self.with_permission_type(permission_type)
    }

    pub fn with_expiry_hours(mut self, hours: u64) -> Self {
        self.expiry = Some(Expiry::Hours(hours));
        self
    }

    pub fn with_expiry_timestamp(mut self, timestamp: u64) -> Self {
        self.expiry = Some(Expiry::At(timestamp));
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Validate and encode against the given clock reading
    pub fn build_payload_at(&self, now: u64) -> Result<EntryFunctionPayload> {
        let grantee = self
            .grantee
            .as_deref()
            .ok_or_else(|| PermissionSdkError::InvalidArgument("grantee required".to_string()))?;
        let grantee = utils::parse_address_arg(grantee)?;

        let permission_type = self.permission_type.as_deref().unwrap_or_default();
        utils::require_non_empty("permission_type", permission_type)?;

        let expiry_timestamp = match self.expiry {
            Some(Expiry::Hours(hours)) => utils::compute_expiry(hours, now)?,
            Some(Expiry::At(ts)) => ts,
            None => {
                return Err(PermissionSdkError::InvalidArgument(
                    "expiry required".to_string(),
                ))
            },
        };
        if expiry_timestamp <= now {
            return Err(PermissionSdkError::InvalidArgument(format!(
                "expiry {} is not after current time {}",
                expiry_timestamp, now
            )));
        }

        let metadata = self
            .metadata
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(self.client.config().default_metadata.as_str());

        Ok(payloads::grant_permission(
            self.client.module_address(),
            grantee,
            permission_type,
            expiry_timestamp,
            metadata,
        ))
    }

    /// Validate and encode using the wall clock at this moment
    pub fn build_payload(&self) -> Result<EntryFunctionPayload> {
        self.build_payload_at(utils::current_unix_seconds()?)
    }

    /// The expiry is computed here, right before signing, not when the builder was filled in
    pub async fn send(
        &self,
        state: &ConnectionState,
        signer: &impl PermissionSigner,
    ) -> Result<TransactionReceipt> {
        let payload = self.build_payload()?;
        self.client.preflight(state, signer)?;
        self.client.submit_and_confirm(&payload, signer).await
    }
}

pub struct RevokePermissionBuilder<'a, C> {
    client: &'a PermissionClient<C>,
    grantee: Option<String>,
    permission_type: Option<String>,
}

impl<'a, C: AptosConnection> RevokePermissionBuilder<'a, C> {
    pub fn new(client: &'a PermissionClient<C>) -> Self {
        Self {
            client,
            grantee: None,
            permission_type: None,
        }
    }

    pub fn with_grantee(mut self, grantee: impl Into<String>) -> Self {
        self.grantee = Some(grantee.into());
        self
    }

    pub fn with_permission_type(mut self, permission_type: impl Into<String>) -> Self {
        self.permission_type = Some(permission_type.into());
        self
    }

    pub fn with_type(self, permission_type: PermissionType) -> Self {
        self.with_permission_type(permission_type)
    }

    pub fn build_payload(&self) -> Result<EntryFunctionPayload> {
        let grantee = self
            .grantee
            .as_deref()
            .ok_or_else(|| PermissionSdkError::InvalidArgument("grantee required".to_string()))?;
        let grantee = utils::parse_address_arg(grantee)?;

        let permission_type = self.permission_type.as_deref().unwrap_or_default();
        utils::require_non_empty("permission_type", permission_type)?;

        Ok(payloads::revoke_permission(
            self.client.module_address(),
            grantee,
            permission_type,
        ))
    }

    pub async fn send(
        &self,
        state: &ConnectionState,
        signer: &impl PermissionSigner,
    ) -> Result<TransactionReceipt> {
        let payload = self.build_payload()?;
        self.client.preflight(state, signer)?;
        self.client.submit_and_confirm(&payload, signer).await
    }
}
