use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use log::{debug, trace};

use super::hashing::{Hash, prepare_data, sha256};
use crate::config::{MiningStrategy, PowConfig};
use crate::error::{LedgerError, Result};

/// How often the nonce producer reports progress.
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Difficulty threshold `2^(256 - difficulty_bits)` as a big-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target(Hash);

impl Target {
    pub fn from_difficulty_bits(bits: u32) -> Result<Self> {
        if !(1..=256).contains(&bits) {
            return Err(LedgerError::InvalidConfiguration(format!(
                "difficulty bits must be within 1..=256, got {bits}"
            )));
        }
        let shift = 256 - bits;
        let mut bytes = [0u8; 32];
        bytes[31 - (shift / 8) as usize] = 1 << (shift % 8);
        Ok(Self(bytes))
    }

    /// True when `hash`, read as a big-endian integer, is strictly below the target.
    pub fn is_met_by(&self, hash: &Hash) -> bool {
        hash < &self.0
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// The hashed fields of a block, minus the nonce.
#[derive(Debug, Clone, Copy)]
pub struct BlockHeader<'a> {
    pub prev_hash: &'a [u8],
    pub data: &'a [u8],
    pub timestamp: i64,
}

/// A nonce together with the digest it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub hash: Hash,
}

/// Proof-of-Work puzzle for a single block header.
///
/// Created per mining or validation call and dropped afterwards.
#[derive(Debug)]
pub struct ProofOfWork<'a> {
    header: BlockHeader<'a>,
    difficulty_bits: u32,
    max_nonce: u64,
    target: Target,
}

impl<'a> ProofOfWork<'a> {
    pub fn new(header: BlockHeader<'a>, config: &PowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            header,
            difficulty_bits: config.difficulty_bits,
            max_nonce: config.max_nonce,
            target: Target::from_difficulty_bits(config.difficulty_bits)?,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn difficulty_bits(&self) -> u32 {
        self.difficulty_bits
    }

    pub fn max_nonce(&self) -> u64 {
        self.max_nonce
    }

    /// Header bytes hashed for `nonce`.
    pub fn prepare_data(&self, nonce: u64) -> Vec<u8> {
        prepare_data(
            self.header.prev_hash,
            self.header.data,
            self.header.timestamp,
            self.difficulty_bits,
            nonce,
        )
    }

    fn hash_nonce(&self, nonce: u64) -> Hash {
        sha256(&self.prepare_data(nonce))
    }

    /// Search with the given strategy.
    pub fn solve(&self, strategy: MiningStrategy) -> Result<Solution> {
        match strategy {
            MiningStrategy::Sequential => self.run(),
            MiningStrategy::Parallel { workers } => self.run_parallel(workers),
        }
    }

    /// Scan nonces upward from 0 and return the first one whose hash meets
    /// the target.
    pub fn run(&self) -> Result<Solution> {
        let started = Instant::now();
        debug!(
            "Mining block with {} byte payload (bits={}, target={})",
            self.header.data.len(),
            self.difficulty_bits,
            self.target
        );

        for nonce in 0..self.max_nonce {
            let hash = self.hash_nonce(nonce);
            if self.target.is_met_by(&hash) {
                debug!(
                    "Found nonce {} after {:.2?}: {}",
                    nonce,
                    started.elapsed(),
                    hex::encode(hash)
                );
                return Ok(Solution { nonce, hash });
            }
        }

        Err(LedgerError::NonceSpaceExhausted {
            max_nonce: self.max_nonce,
        })
    }

    /// Search with `workers` threads fed by a single nonce producer.
    ///
    /// Any valid nonce may be returned; when several workers succeed the
    /// first result received wins. Every spawned thread has exited by the
    /// time this returns.
    pub fn run_parallel(&self, workers: usize) -> Result<Solution> {
        if workers == 0 {
            return Err(LedgerError::InvalidConfiguration(
                "worker count must be positive".to_string(),
            ));
        }

        let started = Instant::now();
        debug!(
            "Mining block with {} byte payload on {} workers (bits={}, target={})",
            self.header.data.len(),
            workers,
            self.difficulty_bits,
            self.target
        );

        let (nonce_tx, nonce_rx) = mpsc::sync_channel::<u64>(workers);
        let nonce_rx = Arc::new(Mutex::new(nonce_rx));
        let (result_tx, result_rx) = mpsc::sync_channel::<Solution>(1);
        let cancel = Arc::new(AtomicBool::new(false));

        thread::scope(|scope| {
            let producer = {
                let cancel = Arc::clone(&cancel);
                scope.spawn(move || self.seed_nonces(nonce_tx, &cancel))
            };

            let handles: Vec<_> = (0..workers)
                .map(|id| {
                    let queue = Arc::clone(&nonce_rx);
                    let results = result_tx.clone();
                    let cancel = Arc::clone(&cancel);
                    scope.spawn(move || self.run_worker(id, queue, results, &cancel))
                })
                .collect();

            // From here on only the workers hold the queue and result senders,
            // so either side hanging up is observable by the other.
            drop(nonce_rx);
            drop(result_tx);

            let outcome = result_rx.recv();
            cancel.store(true, Ordering::Release);

            let mut panicked = producer.join().is_err();
            for handle in handles {
                panicked |= handle.join().is_err();
            }
            if panicked {
                return Err(LedgerError::WorkerPanicked("parallel nonce search"));
            }

            match outcome {
                Ok(solution) => {
                    debug!(
                        "Found nonce {} after {:.2?}: {}",
                        solution.nonce,
                        started.elapsed(),
                        hex::encode(solution.hash)
                    );
                    Ok(solution)
                }
                Err(_) => Err(LedgerError::NonceSpaceExhausted {
                    max_nonce: self.max_nonce,
                }),
            }
        })
    }

    fn seed_nonces(&self, queue: SyncSender<u64>, cancel: &AtomicBool) {
        for nonce in 0..self.max_nonce {
            if cancel.load(Ordering::Acquire) {
                break;
            }
            // Err means every worker is gone.
            if queue.send(nonce).is_err() {
                break;
            }
            if nonce > 0 && nonce % PROGRESS_INTERVAL == 0 {
                trace!("Queued {nonce} nonces");
            }
        }
    }

    fn run_worker(
        &self,
        id: usize,
        queue: Arc<Mutex<Receiver<u64>>>,
        results: SyncSender<Solution>,
        cancel: &AtomicBool,
    ) {
        let mut attempts: u64 = 0;
        while !cancel.load(Ordering::Acquire) {
            let next = queue.lock().unwrap_or_else(PoisonError::into_inner).recv();
            let Ok(nonce) = next else {
                break;
            };
            attempts += 1;

            let hash = self.hash_nonce(nonce);
            if self.target.is_met_by(&hash) {
                match results.try_send(Solution { nonce, hash }) {
                    Ok(()) => trace!("Worker {id} found nonce {nonce}"),
                    Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                        trace!("Worker {id} dropped late nonce {nonce}")
                    }
                }
                break;
            }
        }
        trace!("Worker {id} stopped after {attempts} attempts");
    }

    /// Recompute the hash for `nonce` and check it both matches `hash` and
    /// meets the target.
    pub fn validate(&self, nonce: u64, hash: &Hash) -> bool {
        if nonce >= self.max_nonce {
            return false;
        }
        let computed = self.hash_nonce(nonce);
        &computed == hash && self.target.is_met_by(&computed)
    }
}
