use crate::client::{Arg, DeploymentClient};
use crate::config::{DeploymentConfig, FeedPair};
use crate::namehash::feed_node;
use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result, bail};
use futures::future::join_all;

pub const REGISTRY_CONTRACT: &str = "MockEnsRegistry";
pub const RESOLVER_CONTRACT: &str = "MockPublicResolver";
pub const AGGREGATOR_CONTRACT: &str = "MockV3Aggregator";

/// Decimals the mock aggregators report.
pub const AGGREGATOR_DECIMALS: u8 = 1;

/// Seed answers are scaled by 1e8 even though the aggregators report 1
/// decimal. Consumers of the mock feeds read the 1e8-scaled value, so the
/// mismatch is kept as is.
pub const SEED_PRICE_SCALE: u64 = 100_000_000;

/// Initial aggregator answer for a configured seed price.
pub fn seed_answer(seed_price: u64) -> U256 {
    U256::from(seed_price) * U256::from(SEED_PRICE_SCALE)
}

#[derive(Debug, Clone)]
pub struct ProvisionedFeed {
    pub symbol: String,
    pub node: B256,
    pub aggregator: Address,
}

#[derive(Debug, Clone)]
pub struct MockFeedDeployment {
    pub registry: Address,
    pub resolver: Address,
    pub feeds: Vec<ProvisionedFeed>,
}

/// Provisions the mock name-resolution stack on the local dev network:
/// deploys the ENS registry and resolver once, then wires one aggregator per
/// configured pair to its `<symbol>.data.eth` node.
///
/// Returns `Ok(None)` without touching the chain when the configured network
/// is not the local one. Per-pair work runs concurrently; every pair is
/// awaited and every failure is surfaced before this returns.
pub async fn deploy_mock_feeds<C: DeploymentClient>(
    client: &C,
    config: &DeploymentConfig,
) -> Result<Option<MockFeedDeployment>> {
    if !config.is_local_network() {
        println!(
            "chain id {} is not the local test network, skipping mock feed deployment",
            config.chain_id
        );
        return Ok(None);
    }
    let deployer = config.deployer;

    let registry = client
        .deploy(REGISTRY_CONTRACT, deployer, &[])
        .await
        .context("deploying mock ENS registry")?;
    println!("ENS registry deployed to: {}", registry.address);

    let resolver = client
        .deploy(RESOLVER_CONTRACT, deployer, &[])
        .await
        .context("deploying mock public resolver")?;
    println!("Resolver deployed to: {}", resolver.address);

    let provisioning = config
        .pairs
        .iter()
        .map(|pair| provision_feed(client, deployer, resolver.address, pair));
    let results = join_all(provisioning).await;

    let mut feeds = Vec::with_capacity(config.pairs.len());
    let mut failures = Vec::new();
    for (pair, result) in config.pairs.iter().zip(results) {
        match result {
            Ok(feed) => feeds.push(feed),
            Err(e) => failures.push(format!("{}: {e:#}", pair.symbol)),
        }
    }
    if !failures.is_empty() {
        bail!(
            "provisioning failed for {} of {} pairs: {}",
            failures.len(),
            config.pairs.len(),
            failures.join("; ")
        );
    }

    Ok(Some(MockFeedDeployment {
        registry: registry.address,
        resolver: resolver.address,
        feeds,
    }))
}

/// Full sequence for one pair: register the resolver for the pair's node,
/// deploy its aggregator, then bind the aggregator address to the node. The
/// binding takes the freshly deployed address as input, so it can never run
/// ahead of the aggregator deployment.
async fn provision_feed<C: DeploymentClient>(
    client: &C,
    deployer: Address,
    resolver: Address,
    pair: &FeedPair,
) -> Result<ProvisionedFeed> {
    let node = feed_node(&pair.symbol);
    println!("{} -> {}", pair.symbol, node);

    client
        .execute(
            REGISTRY_CONTRACT,
            deployer,
            "setResolver",
            &[Arg::FixedBytes(node), Arg::Address(resolver)],
        )
        .await
        .with_context(|| format!("registering resolver for {}", pair.symbol))?;

    let aggregator = client
        .deploy(
            AGGREGATOR_CONTRACT,
            deployer,
            &[
                Arg::Uint(U256::from(AGGREGATOR_DECIMALS)),
                Arg::Uint(seed_answer(pair.seed_price)),
            ],
        )
        .await
        .with_context(|| format!("deploying aggregator for {}", pair.symbol))?;
    println!("{} aggregator deployed to: {}", pair.symbol, aggregator.address);

    client
        .execute(
            RESOLVER_CONTRACT,
            deployer,
            "setAddr",
            &[Arg::FixedBytes(node), Arg::Address(aggregator.address)],
        )
        .await
        .with_context(|| format!("binding aggregator address for {}", pair.symbol))?;

    Ok(ProvisionedFeed {
        symbol: pair.symbol.clone(),
        node,
        aggregator: aggregator.address,
    })
}
