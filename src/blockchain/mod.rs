pub mod block;
pub mod hashing;
pub mod model;
pub mod pow;

pub use block::Block;
pub use hashing::Hash;
pub use model::Blockchain;
pub use pow::{BlockHeader, ProofOfWork, Solution, Target};

/// Default Proof-of-Work difficulty (leading zero bits of a block hash).
pub const DEFAULT_DIFFICULTY_BITS: u32 = 24;

/// Default exclusive upper bound of the nonce search space.
pub const DEFAULT_MAX_NONCE: u64 = i64::MAX as u64;

pub const DEFAULT_GENESIS_MESSAGE: &str =
    "One must still have chaos in oneself to be able to give birth to a dancing star.";
