use alloy_primitives::{B256, keccak256};

/// Domain under which the mock price feeds are registered.
pub const FEED_DOMAIN: &str = "data.eth";

/// EIP-137 namehash of a dot-separated name. The empty name hashes to zero;
/// the same name always yields the same node.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut input = [0u8; 64];
        input[..32].copy_from_slice(node.as_slice());
        input[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(input);
    }
    node
}

/// Full feed name for a trading pair symbol, e.g. "eth-usd.data.eth".
pub fn feed_name(symbol: &str) -> String {
    format!("{symbol}.{FEED_DOMAIN}")
}

/// Node under which the pair's aggregator address is resolvable.
pub fn feed_node(symbol: &str) -> B256 {
    namehash(&feed_name(symbol))
}
