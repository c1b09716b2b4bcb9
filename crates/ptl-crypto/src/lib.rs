//! Hashing primitives for the PharmaTrace Ledger.
//!
//! Provides domain-separated BLAKE3 hashing, the deterministic
//! pseudo-signature attached to every transaction, and the proof-of-work
//! nonce search used to seal blocks.
//!
//! Note on scope: the "signature" here is a reproducible digest tag, not
//! authentication, and the proof-of-work exists to shape the hash search
//! space of a single-writer simulated chain. Neither primitive defends
//! against an adversary.

pub mod hasher;
pub mod pow;
pub mod signer;

pub use hasher::{ContentHasher, HasherError};
pub use pow::{meets_difficulty, NonceSearch, PowError, Sealed};
pub use signer::{SignatureTag, TagSigner};
