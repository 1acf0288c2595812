// Example: Granting a time-bound permission
//
// This example demonstrates how to:
// 1. Build a grant payload with an expiry measured in hours
// 2. Inspect the payload before handing it to a wallet
// 3. Review the gas estimates for each module function
//
// Signing requires a wallet. Implement `PermissionSigner` for your wallet
// adapter and call `.send(&state, &wallet)` on the builder.

use permission_expiry_sdk::abi;
use permission_expiry_sdk::{ClientConfig, PermissionClient, PermissionType, RestConnection};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let connection = RestConnection::new(&config)?;
    let client = PermissionClient::new(connection, config)?;

    // 1. Grantee (replace with the account receiving the permission)
    let grantee = format!("0x{}", "0".repeat(64));

    // 2. Build the payload the wallet would sign
    let payload = client
        .grant_permission()
        .with_grantee(&grantee)
        .with_type(PermissionType::Read)
        .with_expiry_hours(24)
        .with_metadata("Granted from example")
        .build_payload()?;

    println!("Function: {}", payload.function);
    println!("Payload: {}", serde_json::to_string_pretty(&payload)?);

    // 3. Submit with your wallet
    // let state = ConnectionState::Connected(WalletAccount { address, network: Some("devnet".into()) });
    // let receipt = client
    //     .grant_permission()
    //     .with_grantee(&grantee)
    //     .with_type(PermissionType::Read)
    //     .with_expiry_hours(24)
    //     .send(&state, &wallet)
    //     .await?;
    // println!("Committed: {}", receipt.hash);

    // 4. Gas estimates
    println!("\n{}", abi::gas_report());

    Ok(())
}
