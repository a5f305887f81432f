use crate::client::{Arg, Deployed, DeploymentClient, Receipt, calldata, encode_args};
use alloy_primitives::{Address, B256, hex};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use tokio::time::{Duration, sleep};

mod paths {
    pub const ARTIFACTS_DIR: &str = "./artifacts";
    pub const DEPLOYMENTS_DIR: &str = "./deployments";
}

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(250);
const MAX_RECEIPT_POLLS: u32 = 120;

/// Compiled contract artifact as emitted by the build tooling. Only the
/// creation bytecode matters here.
#[derive(Debug, Deserialize)]
struct Artifact {
    bytecode: String,
}

/// What gets persisted per deployed contract, keyed by artifact name under
/// `deployments/<chain id>/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: Option<B256>,
    pub constructor_args: String,
}

/// Deployment client for a local dev node with unlocked accounts. Talks raw
/// JSON-RPC, no signing; the node serializes transactions per account.
pub struct RpcDeploymentClient {
    http: reqwest::Client,
    url: String,
    chain_id: String,
}

impl RpcDeploymentClient {
    pub fn new(url: impl Into<String>, chain_id: impl Into<String>) -> Self {
        RpcDeploymentClient {
            http: reqwest::Client::new(),
            url: url.into(),
            chain_id: chain_id.into(),
        }
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: Value = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("sending {method} to {}", self.url))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("decoding {method} response"))?;

        // Node-side failures (including reverts reported at submission time)
        // come back as an error object; surface it verbatim.
        if let Some(error) = response.get("error") {
            bail!("{method} failed: {error}");
        }
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Option<Address>,
        data: Vec<u8>,
    ) -> Result<B256> {
        let mut tx = json!({
            "from": from.to_string(),
            "data": format!("0x{}", hex::encode(&data)),
        });
        if let Some(to) = to {
            tx["to"] = json!(to.to_string());
        }
        let result = self.rpc("eth_sendTransaction", json!([tx])).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| anyhow!("eth_sendTransaction returned no hash: {result}"))?;
        hash.parse()
            .with_context(|| format!("parsing transaction hash '{hash}'"))
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<Value> {
        for _ in 0..MAX_RECEIPT_POLLS {
            let receipt = self
                .rpc("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if !receipt.is_null() {
                let status = receipt.get("status").and_then(Value::as_str).unwrap_or("0x0");
                if status != "0x1" {
                    bail!("transaction {tx_hash} reverted");
                }
                return Ok(receipt);
            }
            sleep(RECEIPT_POLL_INTERVAL).await;
        }
        bail!("transaction {tx_hash} not mined after {MAX_RECEIPT_POLLS} polls")
    }

    async fn load_bytecode(&self, contract: &str) -> Result<Vec<u8>> {
        let path = format!("{}/{contract}.json", paths::ARTIFACTS_DIR);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading artifact {path}"))?;
        let artifact: Artifact =
            serde_json::from_str(&raw).with_context(|| format!("parsing artifact {path}"))?;
        hex::decode(artifact.bytecode.trim())
            .with_context(|| format!("decoding bytecode of {contract}"))
    }

    fn record_path(&self, contract: &str) -> PathBuf {
        PathBuf::from(paths::DEPLOYMENTS_DIR)
            .join(&self.chain_id)
            .join(format!("{contract}.json"))
    }

    async fn read_record(&self, contract: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract);
        if tokio::fs::metadata(&path).await.is_err() {
            return Ok(None);
        }
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading deployment record {}", path.display()))?;
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("parsing deployment record {}", path.display()))?;
        Ok(Some(record))
    }

    async fn write_record(&self, record: &DeploymentRecord) -> Result<()> {
        let path = self.record_path(&record.contract_name);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, raw)
            .await
            .with_context(|| format!("writing deployment record {}", path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl DeploymentClient for RpcDeploymentClient {
    async fn deploy(&self, contract: &str, from: Address, args: &[Arg]) -> Result<Deployed> {
        let arg_bytes = encode_args(args);
        let encoded_args = hex::encode(&arg_bytes);

        // Redeploy only when the recorded constructor args changed; records
        // are keyed by artifact name, last write wins.
        if let Some(record) = self.read_record(contract).await? {
            if record.constructor_args == encoded_args {
                println!("reusing {contract} at {}", record.address);
                return Ok(Deployed {
                    address: record.address,
                    tx_hash: record.transaction_hash,
                    newly_deployed: false,
                });
            }
        }

        let mut data = self.load_bytecode(contract).await?;
        data.extend_from_slice(&arg_bytes);
        let tx_hash = self
            .send_transaction(from, None, data)
            .await
            .with_context(|| format!("deploying {contract}"))?;
        let receipt = self.wait_for_receipt(tx_hash).await?;

        let address = receipt
            .get("contractAddress")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("receipt for {contract} carries no contract address"))?;
        let address = address
            .parse::<Address>()
            .with_context(|| format!("parsing contract address '{address}'"))?;

        let record = DeploymentRecord {
            contract_name: contract.to_string(),
            address,
            transaction_hash: Some(tx_hash),
            constructor_args: encoded_args,
        };
        self.write_record(&record).await?;

        Ok(Deployed {
            address,
            tx_hash: Some(tx_hash),
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
        let record = self
            .read_record(contract)
            .await?
            .ok_or_else(|| anyhow!("no deployment record for {contract}, deploy it first"))?;
        let data = calldata(method, args);
        let tx_hash = self
            .send_transaction(from, Some(record.address), data)
            .await
            .with_context(|| format!("calling {method} on {contract}"))?;
        self.wait_for_receipt(tx_hash).await?;
        Ok(Receipt { tx_hash })
    }
}
