//! Read-only smoke run against a live node.
//!
//! Usage: `smoke <admin> [grantee] [permission_type]`, configured through the
//! `PERMISSION_EXPIRY_*` environment variables.

use anyhow::Context;
use permission_expiry_sdk::{ClientConfig, PermissionClient, RestConnection};
use permission_expiry_sdk::core::connection::AptosConnection;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let admin = args.next().context("usage: smoke <admin> [grantee] [permission_type]")?;
    let grantee = args.next().unwrap_or_else(|| admin.clone());
    let permission_type = args.next().unwrap_or_else(|| "READ_ACCESS".to_string());

    let config = ClientConfig::from_env().context("loading config from environment")?;
    let connection = RestConnection::new(&config)?;
    tracing::info!(node = connection.base_url(), network = %config.network, "connecting");
    let client = PermissionClient::new(connection, config)?;

    let ledger_time = client.connection().ledger_timestamp().await?;
    println!("ledger timestamp: {}", ledger_time);

    let stored_admin = client.get_admin(&admin).await?;
    println!("get_admin: {}", stored_admin);
    println!("is_admin: {}", client.is_admin(&admin, &admin).await?);

    let valid = client
        .view_is_permission_valid(&admin, &grantee, &permission_type)
        .await?;
    println!("view_is_permission_valid({}, {}): {}", grantee, permission_type, valid);

    match client.view_permission(&admin, &grantee, &permission_type).await? {
        Some(permission) => println!(
            "permission: expires {} ({} s from ledger time), status {}",
            permission.expiry_timestamp,
            permission.expiry_timestamp as i128 - ledger_time as i128,
            permission.status_label()
        ),
        None => println!("permission: none"),
    }

    Ok(())
}
