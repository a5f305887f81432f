use datafeed_mocks::config::DeploymentConfig;
use datafeed_mocks::deploy::deploy_mock_feeds;
use datafeed_mocks::rpc::RpcDeploymentClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("\n🚀 Mock ENS Data Feed Deployment\n");

    // Load configuration from environment variables
    let config = match DeploymentConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Configuration Error: {}", e);
            eprintln!("\nPlease ensure the following environment variables are set:");
            eprintln!("  - CHAIN_ID (\"1337\" for the local dev node)");
            eprintln!("  - DEPLOYER_ACCOUNT (0x-prefixed address)");
            eprintln!("\nYou can create a .env file in the project root with these variables.");
            std::process::exit(1);
        }
    };

    config.print();

    let client = RpcDeploymentClient::new(config.rpc_url.clone(), config.chain_id.clone());

    match deploy_mock_feeds(&client, &config).await? {
        Some(deployment) => {
            println!("\n✅ Mock feeds provisioned");
            println!("   Registry: {}", deployment.registry);
            println!("   Resolver: {}", deployment.resolver);
            for feed in &deployment.feeds {
                println!("   {} -> {}", feed.symbol, feed.aggregator);
            }
        }
        None => println!("Nothing to do on chain id {}", config.chain_id),
    }
    Ok(())
}
