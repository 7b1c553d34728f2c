use std::env;
use std::str::FromStr;

use crate::blockchain::{DEFAULT_DIFFICULTY_BITS, DEFAULT_GENESIS_MESSAGE, DEFAULT_MAX_NONCE};
use crate::error::{LedgerError, Result};

/// Proof-of-Work parameters shared by every block of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowConfig {
    /// Number of leading zero bits a block hash must have.
    pub difficulty_bits: u32,
    /// Exclusive upper bound of the nonce search space.
    pub max_nonce: u64,
}

impl PowConfig {
    pub fn new(difficulty_bits: u32) -> Self {
        Self {
            difficulty_bits,
            ..Self::default()
        }
    }

    pub fn with_max_nonce(mut self, max_nonce: u64) -> Self {
        self.max_nonce = max_nonce;
        self
    }

    /// Reject values the header encoding or the target cannot represent.
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.difficulty_bits) {
            return Err(LedgerError::InvalidConfiguration(format!(
                "difficulty bits must be within 1..=256, got {}",
                self.difficulty_bits
            )));
        }
        // Nonces are serialized as signed 64-bit integers.
        if self.max_nonce > i64::MAX as u64 {
            return Err(LedgerError::InvalidConfiguration(format!(
                "max nonce must not exceed {}, got {}",
                i64::MAX,
                self.max_nonce
            )));
        }
        Ok(())
    }
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            difficulty_bits: DEFAULT_DIFFICULTY_BITS,
            max_nonce: DEFAULT_MAX_NONCE,
        }
    }
}

/// How the nonce space is searched when a block is mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MiningStrategy {
    /// Single-threaded ascending scan; always finds the smallest nonce.
    #[default]
    Sequential,
    /// Producer/worker pool; returns whichever valid nonce wins the race.
    Parallel { workers: usize },
}

impl MiningStrategy {
    pub fn workers(&self) -> usize {
        match self {
            MiningStrategy::Sequential => 1,
            MiningStrategy::Parallel { workers } => *workers,
        }
    }
}

/// Runtime settings of the node binary, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub genesis_message: String,
    pub pow: PowConfig,
    pub strategy: MiningStrategy,
}

impl NodeConfig {
    /// Load settings from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_var(&lookup, "PORT")?.unwrap_or(8080);
        let genesis_message =
            lookup("GENESIS_MESSAGE").unwrap_or_else(|| DEFAULT_GENESIS_MESSAGE.to_string());

        let pow = PowConfig {
            difficulty_bits: parse_var(&lookup, "DIFFICULTY_BITS")?
                .unwrap_or(DEFAULT_DIFFICULTY_BITS),
            max_nonce: parse_var(&lookup, "MAX_NONCE")?.unwrap_or(DEFAULT_MAX_NONCE),
        };
        pow.validate()?;

        let strategy = match parse_var::<usize, _>(&lookup, "MINER_WORKERS")? {
            None => MiningStrategy::Sequential,
            Some(0) => {
                return Err(LedgerError::InvalidConfiguration(
                    "MINER_WORKERS must be a positive integer".to_string(),
                ));
            }
            Some(workers) => MiningStrategy::Parallel { workers },
        };

        Ok(Self {
            host,
            port,
            genesis_message,
            pow,
            strategy,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            LedgerError::InvalidConfiguration(format!("{key} has an invalid value: {raw}"))
        }),
    }
}
