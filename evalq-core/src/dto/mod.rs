//! Data Transfer Objects for the gateway wire protocol
//!
//! DTOs model the JSON bodies exchanged with the gateway. The gateway is an
//! external collaborator with some inconsistent response shapes across
//! deployments, so the parsing here is deliberately tolerant; see
//! [`job::JobStatusResponse`] for the canonical-versus-legacy shape handling.

pub mod job;
