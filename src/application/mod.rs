//! Application layer containing the transition engine.
//!
//! This module defines the `TransitionEngine`, the entry point for applying
//! release, callback, rent and return transactions to the ledger through the
//! record store, identity and event bus ports.

pub mod engine;
