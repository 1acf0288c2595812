// Example: Checking a permission against a live node
//
// This example demonstrates how to:
// 1. Load the client configuration from the environment
// 2. Connect to the node's REST API
// 3. Look up a registry admin and a permission record
// 4. Run a best-effort validity check suitable for display
//
// Required environment:
//   PERMISSION_EXPIRY_MODULE_ADDRESS  account the module is published under
//   PERMISSION_EXPIRY_NETWORK         devnet (default), testnet, mainnet or local

use permission_expiry_sdk::{ClientConfig, PermissionClient, RestConnection};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configuration
    let config = ClientConfig::from_env()?;
    let connection = RestConnection::new(&config)?;
    let client = PermissionClient::new(connection, config)?;

    // 2. Registry owner and grantee to inspect (replace with real addresses)
    let admin = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("0x{}", "0".repeat(64)));
    let grantee = std::env::args()
        .nth(2)
        .unwrap_or_else(|| format!("0x{}", "0".repeat(64)));

    println!("Checking READ_ACCESS for {} in registry {}", grantee, admin);

    // 3. Admin lookup
    match client.get_admin(&admin).await {
        Ok(stored) => println!("  Registry admin: {}", stored),
        Err(e) => println!("  Registry not available: {}", e),
    }

    // 4. Permission record
    if let Some(permission) = client.get_permission(&admin, &grantee, "READ_ACCESS").await? {
        println!("  Expires at: {}", permission.expiry_timestamp);
        println!("  Status: {}", permission.status_label());
        println!("  Metadata: {}", permission.metadata);
    } else {
        println!("  No permission record");
    }

    // 5. Display-grade check: a failed lookup reads "Unknown", never "No"
    let outcome = client.check_permission(&admin, &grantee, "READ_ACCESS").await;
    println!("  Valid: {}", outcome.label());

    Ok(())
}
