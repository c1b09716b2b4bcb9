//! Simulated append-only ledger for the PharmaTrace system.
//!
//! This crate is the chain core. It provides:
//! - [`Transaction`] and [`Block`] records with hash-linked integrity
//! - Proof-of-work block sealing ([`Block::seal`])
//! - [`InMemoryLedger`] — the single-writer, process-lifetime chain store
//! - [`LedgerWriter`] / [`LedgerReader`] trait boundaries
//! - [`ChainValidator`] — pure recomputation and linkage verification
//!
//! This is a *simulated single-node* chain: one writer, no peers, no
//! consensus. Proof-of-work shapes the hash search space; it does not
//! resist adversarial rewriting, and nothing here should be read as a
//! distributed-systems guarantee.

pub mod config;
pub mod error;
pub mod memory;
pub mod records;
pub mod traits;
pub mod validation;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use records::{Block, Transaction};
pub use traits::{LedgerReader, LedgerStats, LedgerWriter};
pub use validation::{ChainValidator, ValidationReport, Violation, ViolationKind};
