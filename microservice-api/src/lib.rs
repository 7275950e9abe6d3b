//! Typed definitions for the `Microservice` custom resource.
//!
//! This crate contains the data shapes for the `imran.dev.io` API group
//! ([`v1alpha1::Microservice`] and its list form), along with a [`Scheme`]:
//! a runtime registry mapping group-version-kind identifiers to concrete
//! Rust types, so generic machinery can decode and route documents for
//! these kinds.
//!
//! The scheme is an explicit value rather than process-global state; build
//! one at your composition root and populate it once during startup:
//!
//! ```
//! use microservice_api::{v1alpha1, Scheme};
//!
//! let mut scheme = Scheme::new();
//! v1alpha1::add_to_scheme(&mut scheme)?;
//! # Ok::<(), microservice_api::Error>(())
//! ```

pub mod scheme;
pub use scheme::{Error, Scheme};

pub mod v1alpha1;

/// Convenient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
