//! Evalq Core
//!
//! Core types for the evalq expression-evaluation client.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, JobStatus, JobId)
//! - DTOs: Data transfer objects for the gateway wire protocol

pub mod domain;
pub mod dto;
