//! In-memory, append-only ledger secured by SHA-256 Proof-of-Work.
//!
//! Every [`Block`] commits to its predecessor's hash and is admitted only
//! once a nonce is found whose header hash falls below the difficulty
//! target. The search runs either sequentially or on a worker pool
//! (see [`MiningStrategy`]).

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;

pub use blockchain::{Block, Blockchain, ProofOfWork, Solution, Target};
pub use config::{MiningStrategy, NodeConfig, PowConfig};
pub use error::{LedgerError, Result};
