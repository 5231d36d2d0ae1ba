//! Stateless utility functions: dates, strings, JSON, crypto.
//!
//! Everything here is pure and reentrant. Functions either succeed for all
//! inputs, return an explicit sentinel (`false`, unchanged input), or
//! propagate an [`crate::SvcError`] where documented.

pub mod crypto;
pub mod date;
pub mod json;
pub mod string;
