#![allow(dead_code)]

use alloy_primitives::{Address, B256};
use anyhow::{Result, bail};
use async_trait::async_trait;
use datafeed_mocks::client::{Arg, Deployed, DeploymentClient, Receipt};
use datafeed_mocks::config::{DeploymentConfig, FeedPair, LOCAL_CHAIN_ID};
use std::sync::Mutex;

/// One observed client call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Deploy {
        contract: String,
        from: Address,
        args: Vec<Arg>,
    },
    Execute {
        contract: String,
        from: Address,
        method: String,
        args: Vec<Arg>,
    },
}

type FailurePredicate = Box<dyn Fn(&ClientCall) -> bool + Send + Sync>;

struct RecorderState {
    calls: Vec<ClientCall>,
    deployed: u64,
    deploys: Vec<(String, Vec<Arg>, Address)>,
}

/// Recording fake of the deployment client. Hands out deterministic
/// addresses and keeps an ordered log of every call; failures can be
/// injected per call, which are still recorded as attempted.
pub struct RecordingClient {
    state: Mutex<RecorderState>,
    fail_when: Option<FailurePredicate>,
}

impl RecordingClient {
    pub fn new() -> Self {
        RecordingClient {
            state: Mutex::new(RecorderState {
                calls: Vec::new(),
                deployed: 0,
                deploys: Vec::new(),
            }),
            fail_when: None,
        }
    }

    pub fn failing_when(predicate: impl Fn(&ClientCall) -> bool + Send + Sync + 'static) -> Self {
        let mut client = RecordingClient::new();
        client.fail_when = Some(Box::new(predicate));
        client
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of deploy calls issued for the contract, attempted ones
    /// included.
    pub fn deploy_count(&self, contract: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ClientCall::Deploy { contract: c, .. } if c == contract))
            .count()
    }

    pub fn execute_count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ClientCall::Execute { method: m, .. } if m == method))
            .count()
    }

    /// Address handed out for the successful deploy matching contract name
    /// and constructor args.
    pub fn deployed_address(&self, contract: &str, args: &[Arg]) -> Option<Address> {
        self.state
            .lock()
            .unwrap()
            .deploys
            .iter()
            .find(|(c, a, _)| c == contract && a == args)
            .map(|(_, _, address)| *address)
    }
}

pub fn test_address(n: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[12..].copy_from_slice(&n.to_be_bytes());
    Address::from_slice(&bytes)
}

/// Deployer used by all test configs.
pub fn test_deployer() -> Address {
    test_address(0xAAAA)
}

pub fn config_for_chain(chain_id: &str, pairs: Vec<FeedPair>) -> DeploymentConfig {
    DeploymentConfig {
        chain_id: chain_id.to_string(),
        deployer: test_deployer(),
        rpc_url: "http://127.0.0.1:8545".to_string(),
        pairs,
    }
}

pub fn local_config(pairs: Vec<FeedPair>) -> DeploymentConfig {
    config_for_chain(LOCAL_CHAIN_ID, pairs)
}

#[async_trait]
impl DeploymentClient for RecordingClient {
    async fn deploy(&self, contract: &str, from: Address, args: &[Arg]) -> Result<Deployed> {
        let call = ClientCall::Deploy {
            contract: contract.to_string(),
            from,
            args: args.to_vec(),
        };
        let should_fail = self.fail_when.as_ref().is_some_and(|p| p(&call));
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if should_fail {
            bail!("injected deploy failure for {contract}");
        }
        state.deployed += 1;
        let address = test_address(state.deployed);
        state
            .deploys
            .push((contract.to_string(), args.to_vec(), address));
        Ok(Deployed {
            address,
            tx_hash: None,
            newly_deployed: true,
        })
    }

    async fn execute(
        &self,
        contract: &str,
        from: Address,
        method: &str,
        args: &[Arg],
    ) -> Result<Receipt> {
        let call = ClientCall::Execute {
            contract: contract.to_string(),
            from,
            method: method.to_string(),
            args: args.to_vec(),
        };
        let should_fail = self.fail_when.as_ref().is_some_and(|p| p(&call));
        self.state.lock().unwrap().calls.push(call);
        if should_fail {
            bail!("injected execute failure for {method} on {contract}");
        }
        Ok(Receipt {
            tx_hash: B256::ZERO,
        })
    }
}
