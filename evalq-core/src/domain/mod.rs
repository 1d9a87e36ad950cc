//! Core domain types
//!
//! This module contains the domain structures shared across evalq crates.
//! They represent a submitted expression and its evolving evaluation state
//! as observed from the gateway.

pub mod job;
