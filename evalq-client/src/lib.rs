//! Evalq Client
//!
//! Async job-tracking client for the evalq gateway: submit an arithmetic
//! expression, poll for its result, and recover transparently from an
//! expired session.
//!
//! The crate is layered leaf-first:
//! - [`transport`]: the wire seam, including the refresh-and-replay
//!   [`AuthenticatedTransport`]
//! - [`jobs`]: submit / fetch-one / fetch-all over any transport
//! - [`scheduler`]: the poller registry (one repeating poller per key,
//!   idempotent cancellation)
//! - [`session`]: thin orchestration publishing [`SessionEvent`]s to the
//!   presentation layer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use evalq_client::{
//!     AuthenticatedTransport, HttpTransport, JobClient, PollConfig, SessionController,
//! };
//!
//! #[tokio::main]
//! async fn main() -> evalq_client::Result<()> {
//!     let http = Arc::new(HttpTransport::new("http://localhost:8080")?);
//!     let transport = Arc::new(AuthenticatedTransport::new(http));
//!     let jobs = JobClient::new(transport);
//!
//!     let (session, mut events) = SessionController::new(jobs, PollConfig::default());
//!     let id = session.submit("2+2*2").await?;
//!     println!("submitted job {id}");
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod jobs;
pub mod scheduler;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use auth::AuthClient;
pub use error::{ClientError, Result};
pub use jobs::JobClient;
pub use scheduler::{PollKey, PollScheduler, TickOutcome};
pub use session::{PollConfig, SessionController, SessionEvent};
pub use transport::{ApiRequest, ApiResponse, AuthenticatedTransport, HttpTransport, Transport};
