//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)  or  TOML file (loader.rs)
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//!     → Balancer construction
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any error is fatal before the listener binds

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BackendConfig, BalancerConfig, ListenerConfig, LogFormat, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
