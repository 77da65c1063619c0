//! Deterministic block execution core for the Tessera ledger.
//!
//! Given a block and a mutable world-state handle, [`processor::StateProcessor`]
//! applies every transaction in canonical order, meters gas, produces
//! per-transaction receipts, and runs the consensus finalizer. Any
//! divergence between two conforming implementations forks the chain, so
//! ordering, gas accounting, and fork branching here are bit-for-bit
//! reproducible.

pub mod context;
pub mod crypto;
pub mod engine;
pub mod finalizer;
pub mod gas;
pub mod message;
pub mod processor;
pub mod rules;
pub mod state;
pub mod types;
