//! Background worker for catalog I/O.
//!
//! The event handler never awaits the network. It posts [`WorkerMessage`]s,
//! the worker runs them as tokio tasks, and results come back as
//! [`WorkerResponse`]s that the session feeds into the handler as events.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol with trace context propagation
//! - `handler`: Task spawning, the once-per-session bulk guard, and delivery

pub mod handler;
pub mod messages;

pub use handler::CatalogWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
