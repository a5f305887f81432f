use alloy_primitives::Address;
use anyhow::{Result, anyhow, bail};
use std::env;

/// Chain id of the local hardhat/anvil style dev network. Mock contracts are
/// only ever deployed there.
pub const LOCAL_CHAIN_ID: &str = "1337";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPair {
    pub symbol: String,
    pub seed_price: u64,
}

impl FeedPair {
    pub fn new(symbol: impl Into<String>, seed_price: u64) -> Self {
        FeedPair {
            symbol: symbol.into(),
            seed_price,
        }
    }
}

pub fn default_pairs() -> Vec<FeedPair> {
    vec![
        FeedPair::new("eth-usd", 3500),
        FeedPair::new("btc-usd", 50000),
        FeedPair::new("bnb-usd", 400),
        FeedPair::new("link-usd", 30),
    ]
}

/// Builds the pair set from the legacy parallel symbol/price lists, failing
/// before any chain call when the lists are not index-aligned.
pub fn pairs_from_lists(symbols: &[&str], prices: &[u64]) -> Result<Vec<FeedPair>> {
    if symbols.len() != prices.len() {
        bail!(
            "symbol list has {} entries but price list has {}",
            symbols.len(),
            prices.len()
        );
    }
    Ok(symbols
        .iter()
        .zip(prices)
        .map(|(symbol, &price)| FeedPair::new(*symbol, price))
        .collect())
}

/// Parses a pair spec of the form "eth-usd=3500,btc-usd=50000".
pub fn parse_pairs(spec: &str) -> Result<Vec<FeedPair>> {
    let mut pairs = Vec::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (symbol, price) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid pair entry '{}': expected <symbol>=<price>", entry))?;
        let price = price
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid price for '{}': must be a u64 number", symbol))?;
        pairs.push(FeedPair::new(symbol.trim(), price));
    }
    if pairs.is_empty() {
        bail!("pair spec '{}' contains no pairs", spec);
    }
    Ok(pairs)
}

#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub chain_id: String,
    pub deployer: Address,
    pub rpc_url: String,
    pub pairs: Vec<FeedPair>,
}

impl DeploymentConfig {
    /// Load configuration from environment variables
    ///
    /// Required environment variables:
    /// - CHAIN_ID: chain id of the target network ("1337" for the local dev node)
    /// - DEPLOYER_ACCOUNT: address that signs and pays for all deployments
    ///
    /// Optional:
    /// - RPC_URL: JSON-RPC endpoint, defaults to http://127.0.0.1:8545
    /// - MOCK_PAIRS: comma separated <symbol>=<price> entries, defaults to the
    ///   built-in pair set
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (this won't error if file doesn't exist)
        let _ = dotenvy::dotenv();

        let chain_id =
            env::var("CHAIN_ID").map_err(|_| anyhow!("CHAIN_ID environment variable not set"))?;

        let deployer = env::var("DEPLOYER_ACCOUNT")
            .map_err(|_| anyhow!("DEPLOYER_ACCOUNT environment variable not set"))?;
        let deployer = deployer
            .parse::<Address>()
            .map_err(|e| anyhow!("invalid DEPLOYER_ACCOUNT '{}': {}", deployer, e))?;

        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());

        let pairs = match env::var("MOCK_PAIRS") {
            Ok(spec) => parse_pairs(&spec)?,
            Err(_) => default_pairs(),
        };

        Ok(DeploymentConfig {
            chain_id,
            deployer,
            rpc_url,
            pairs,
        })
    }

    /// Guard for the whole deployment routine; everything is a no-op on any
    /// other network.
    pub fn is_local_network(&self) -> bool {
        self.chain_id == LOCAL_CHAIN_ID
    }

    /// Print configuration details
    pub fn print(&self) {
        println!("📋 Deployment Configuration:");
        println!("   Chain id: {}", self.chain_id);
        println!("   RPC endpoint: {}", self.rpc_url);
        println!("   Deployer: {}", self.deployer);
        println!("   Mock pairs:");
        for pair in &self.pairs {
            println!("     {}: {}", pair.symbol, pair.seed_price);
        }
        println!();
    }
}
