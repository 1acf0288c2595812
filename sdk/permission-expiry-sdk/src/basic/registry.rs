use crate::basic::client::PermissionClient;
use crate::core::connection::AptosConnection;
use crate::error::Result;
use crate::types::{AccountAddress, Permission, PermissionType};

/// Read-only view of one admin's registry.
#[derive(Debug)]
pub struct Registry<'a, C> {
    client: &'a PermissionClient<C>,
    admin: AccountAddress,
}

impl<'a, C: AptosConnection> Registry<'a, C> {
    pub fn new(client: &'a PermissionClient<C>, admin: AccountAddress) -> Self {
        Self { client, admin }
    }

    pub fn admin(&self) -> AccountAddress {
        self.admin
    }

    /// Fetch a permission record by key
    pub async fn permission(
        &self,
        grantee: AccountAddress,
        permission_type: &PermissionType,
    ) -> Result<Option<Permission>> {
        self.client
            .view_permission(
                &self.admin.to_string(),
                &grantee.to_string(),
                permission_type.as_str(),
            )
            .await
    }

    /// Check if a permission exists and is currently valid on-chain
    pub async fn is_valid(&self, grantee: AccountAddress, permission_type: &PermissionType) -> Result<bool> {
        self.client
            .view_is_permission_valid(
                &self.admin.to_string(),
                &grantee.to_string(),
                permission_type.as_str(),
            )
            .await
    }

    /// Fetch every conventional permission type held by `grantee`
    pub async fn known_permissions(&self, grantee: AccountAddress) -> Result<Vec<Permission>> {
        let mut found = Vec::new();
        for permission_type in PermissionType::KNOWN.iter() {
            if let Some(permission) = self.permission(grantee, permission_type).await? {
                found.push(permission);
            }
        }
        Ok(found)
    }

    /// Whether `account` is this registry's admin. Advisory only.
    pub async fn is_admin(&self, account: AccountAddress) -> Result<bool> {
        self.client
            .is_admin(&account.to_string(), &self.admin.to_string())
            .await
    }

    /// Admin address as stored on-chain; fails if the registry does not exist
    pub async fn fetch_admin(&self) -> Result<AccountAddress> {
        self.client.get_admin(&self.admin.to_string()).await
    }
}
