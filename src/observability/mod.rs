//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (subscriber: filter + text/JSON formatter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Each dispatch runs in a span carrying a request ID

pub mod logging;
