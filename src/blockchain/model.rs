use std::fmt;

use log::info;

use super::Block;
use crate::config::{MiningStrategy, PowConfig};
use crate::error::Result;

/// Simple in-memory blockchain with Proof-of-Work.
///
/// Blocks are only ever appended; each one is mined against the hash of the
/// block before it.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    config: PowConfig,
    strategy: MiningStrategy,
}

impl Blockchain {
    /// Initialize a new blockchain with a mined genesis block.
    pub fn new(genesis_message: &str, config: PowConfig, strategy: MiningStrategy) -> Result<Self> {
        config.validate()?;
        let genesis = Block::genesis(genesis_message, &config, strategy)?;
        info!(
            "Genesis block sealed (hash={}, nonce={})",
            genesis.hash_hex(),
            genesis.nonce()
        );
        Ok(Self {
            chain: vec![genesis],
            config,
            strategy,
        })
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Mine and append a new block with the provided `data`.
    pub fn add_block(&mut self, data: impl Into<Vec<u8>>) -> Result<&Block> {
        let prev_hash = self.last_block().hash().to_vec();
        let block = Block::new(data, prev_hash, &self.config, self.strategy)?;
        info!(
            "Sealed block #{} (hash={}, nonce={})",
            self.chain.len(),
            block.hash_hex(),
            block.nonce()
        );

        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Validate the entire chain: linkage, hashes and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if !genesis.is_genesis() || !genesis.validate(&self.config) {
            return false;
        }

        self.chain.windows(2).all(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            current.prev_hash() == prev.hash() && current.validate(&self.config)
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false: a chain holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    pub fn strategy(&self) -> MiningStrategy {
        self.strategy
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.chain.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}
