use crate::blockchain::{Block, Blockchain};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state holding the single in-memory chain.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
}

impl AppState {
    pub fn new(blockchain: Blockchain) -> Self {
        Self {
            blockchain: Mutex::new(blockchain),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockResponse {
    pub index: usize,
    pub timestamp: i64,
    pub data: String, // payload as UTF-8 (lossy)
    pub prev_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl BlockResponse {
    pub fn from_block(index: usize, block: &Block) -> Self {
        Self {
            index,
            timestamp: block.timestamp(),
            data: String::from_utf8_lossy(block.data()).into_owned(),
            prev_hash: hex::encode(block.prev_hash()),
            hash: block.hash_hex(),
            nonce: block.nonce(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty_bits: u32,
    pub chain: Vec<BlockResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty_bits: u32,
}

#[derive(Debug, Deserialize)]
pub struct AddBlockRequest {
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty_bits: u32,
    pub target: String,
    pub max_nonce: u64,
    pub workers: usize,
    pub last_interval_secs: Option<i64>,
}
