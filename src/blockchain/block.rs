use std::fmt;

use chrono::Utc;

use super::hashing::Hash;
use super::pow::{BlockHeader, ProofOfWork, Solution};
use crate::config::{MiningStrategy, PowConfig};
use crate::error::Result;

/// A mined, immutable block of the ledger.
///
/// Blocks only exist fully formed: every constructor runs the Proof-of-Work
/// search before the value is built, and no field can be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    timestamp: i64, // Unix timestamp (UTC)
    data: Vec<u8>,
    prev_hash: Vec<u8>, // empty for genesis
    nonce: u64,
    hash: Hash,
}

impl Block {
    /// Mine the genesis block (first block in the chain).
    pub fn genesis(message: &str, config: &PowConfig, strategy: MiningStrategy) -> Result<Self> {
        Self::new(
            format!("Genesis Block: {message}"),
            Vec::<u8>::new(),
            config,
            strategy,
        )
    }

    /// Mine a new block carrying `data` on top of `prev_hash`.
    pub fn new(
        data: impl Into<Vec<u8>>,
        prev_hash: impl Into<Vec<u8>>,
        config: &PowConfig,
        strategy: MiningStrategy,
    ) -> Result<Self> {
        Self::mine_at(
            Utc::now().timestamp(),
            data.into(),
            prev_hash.into(),
            config,
            strategy,
        )
    }

    pub(crate) fn mine_at(
        timestamp: i64,
        data: Vec<u8>,
        prev_hash: Vec<u8>,
        config: &PowConfig,
        strategy: MiningStrategy,
    ) -> Result<Self> {
        let header = BlockHeader {
            prev_hash: &prev_hash,
            data: &data,
            timestamp,
        };
        let Solution { nonce, hash } = ProofOfWork::new(header, config)?.solve(strategy)?;

        Ok(Self {
            timestamp,
            data,
            prev_hash,
            nonce,
            hash,
        })
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }

    pub fn header(&self) -> BlockHeader<'_> {
        BlockHeader {
            prev_hash: &self.prev_hash,
            data: &self.data,
            timestamp: self.timestamp,
        }
    }

    /// Check that the stored hash matches the block's content and satisfies
    /// the Proof-of-Work target. (Does NOT validate chain linkage.)
    pub fn validate(&self, config: &PowConfig) -> bool {
        ProofOfWork::new(self.header(), config)
            .is_ok_and(|pow| pow.validate(self.nonce, &self.hash))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prev. hash: {}", hex::encode(&self.prev_hash))?;
        writeln!(f, "Data: {}", String::from_utf8_lossy(&self.data))?;
        write!(f, "Hash: {}", hex::encode(self.hash))
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::blockchain::hashing::{prepare_data, sha256};
    use crate::config::{MiningStrategy, PowConfig};

    fn easy() -> PowConfig {
        PowConfig::new(8)
    }

    #[test]
    fn genesis_has_valid_hash() {
        let b = Block::genesis("hello", &easy(), MiningStrategy::Sequential).unwrap();
        assert!(b.is_genesis());
        assert!(b.prev_hash().is_empty());
        assert_eq!(b.data(), b"Genesis Block: hello");
        assert!(b.validate(&easy()));
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let prev = [7u8; 32];
        let b = Block::new("Send 1 BTC to Ivan", prev, &easy(), MiningStrategy::Sequential)
            .unwrap();
        assert!(b.hash_hex().starts_with("00"));
        assert_eq!(b.prev_hash(), &prev);
        assert!(b.validate(&easy()));
    }

    #[test]
    fn hash_is_reproducible_from_fields() {
        let b = Block::mine_at(
            42,
            b"test".to_vec(),
            Vec::new(),
            &easy(),
            MiningStrategy::Sequential,
        )
        .unwrap();
        let recomputed = sha256(&prepare_data(b.prev_hash(), b.data(), 42, 8, b.nonce()));
        assert_eq!(&recomputed, b.hash());

        let again = Block::mine_at(
            42,
            b"test".to_vec(),
            Vec::new(),
            &easy(),
            MiningStrategy::Sequential,
        )
        .unwrap();
        assert_eq!(again, b);
    }

    #[test]
    fn parallel_mined_block_validates() {
        let b = Block::new(
            "parallel",
            Vec::<u8>::new(),
            &easy(),
            MiningStrategy::Parallel { workers: 4 },
        )
        .unwrap();
        assert!(b.validate(&easy()));
    }

    #[test]
    fn invalid_when_mutated() {
        let mut b =
            Block::new("test", Vec::<u8>::new(), &easy(), MiningStrategy::Sequential).unwrap();
        assert!(b.validate(&easy()));

        // Tamper with a single payload byte
        b.data[0] ^= 0x01;
        assert!(!b.validate(&easy()));
        assert!(!b.validate(&easy()));
    }

    #[test]
    fn validation_depends_on_difficulty_bits() {
        let b =
            Block::new("bits", Vec::<u8>::new(), &easy(), MiningStrategy::Sequential).unwrap();
        // the difficulty is part of the hashed header
        assert!(!b.validate(&PowConfig::new(4)));
        assert!(!b.validate(&PowConfig::new(0)));
    }

    #[test]
    fn renders_three_lines() {
        let b = Block::genesis("x", &easy(), MiningStrategy::Sequential).unwrap();
        let text = b.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Prev. hash: ");
        assert_eq!(lines[1], "Data: Genesis Block: x");
        assert_eq!(lines[2], format!("Hash: {}", b.hash_hex()));
    }
}
