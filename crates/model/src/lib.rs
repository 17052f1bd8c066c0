//! Provider-neutral types for talking to chat models.
//!
//! The agent runner only speaks the types in this crate. A provider crate
//! translates them to and from its own wire format, so that the runner can
//! be pointed at any hosted model without touching the run loop.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod opaque;
mod provider;
mod request;
mod response;

pub use error::*;
pub use opaque::*;
pub use provider::*;
pub use request::*;
pub use response::*;
