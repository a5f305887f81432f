use alloy_primitives::{Address, B256, U256, keccak256};
use anyhow::Result;
use async_trait::async_trait;

/// A single ABI-encodable constructor or call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Uint(U256),
    Address(Address),
    FixedBytes(B256),
}

impl Arg {
    pub fn sol_type(&self) -> &'static str {
        match self {
            Arg::Uint(_) => "uint256",
            Arg::Address(_) => "address",
            Arg::FixedBytes(_) => "bytes32",
        }
    }

    /// The argument as one 32 byte ABI word.
    pub fn abi_word(&self) -> [u8; 32] {
        match self {
            Arg::Uint(value) => value.to_be_bytes::<32>(),
            Arg::Address(address) => {
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(address.as_slice());
                word
            }
            Arg::FixedBytes(bytes) => bytes.0,
        }
    }
}

/// Head-only encoding; every argument type used here fits a single word.
pub fn encode_args(args: &[Arg]) -> Vec<u8> {
    args.iter().flat_map(|arg| arg.abi_word()).collect()
}

pub fn method_signature(method: &str, args: &[Arg]) -> String {
    let types: Vec<&str> = args.iter().map(Arg::sol_type).collect();
    format!("{method}({})", types.join(","))
}

/// Four byte selector followed by the encoded arguments.
pub fn calldata(method: &str, args: &[Arg]) -> Vec<u8> {
    let selector = keccak256(method_signature(method, args).as_bytes());
    let mut data = selector[..4].to_vec();
    data.extend(encode_args(args));
    data
}

/// Outcome of a deploy call. The orchestration only reads `address`; the
/// remaining fields mirror what the client records on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployed {
    pub address: Address,
    pub tx_hash: Option<B256>,
    pub newly_deployed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
}

/// Boundary to the chain tooling: deploy a contract by artifact name and
/// execute a state-changing call on a previously deployed contract, both
/// signed by the given account. Implementations own nonce ordering,
/// per-network idempotency and any timeout policy.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    async fn deploy(&self, contract: &str, from: Address, args: &[Arg]) -> Result<Deployed>;

    async fn execute(
        &self,
        contract: &str,
        from: Address,
        method: &str,
        args: &[Arg],
    ) -> Result<Receipt>;
}
