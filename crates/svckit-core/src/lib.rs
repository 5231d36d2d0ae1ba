//! # Svckit Core
//!
//! Response envelope, error taxonomy and shared utilities for the svckit
//! microservice toolkit. Everything here is transport-agnostic: the envelope
//! is plain data, errors are plain values, and the utility functions are
//! pure and reentrant.

pub mod envelope;
pub mod error;
pub mod result;
pub mod util;

pub use envelope::*;
pub use error::*;
pub use result::*;
