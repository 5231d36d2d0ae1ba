//! # Svckit RPC
//!
//! Inter-service call plumbing: a [`RpcDispatcher`] transport seam, a
//! client that layers per-attempt timeouts, exponential-backoff retry and
//! context propagation on top, and the [`RpcContext`] attachments
//! (trace id, user id, tenant id) carried across service boundaries.

mod client;
mod context;
mod retry;

pub use client::{RpcClient, RpcDispatcher, RpcRequest};
pub use context::{RpcContext, TENANT_ID, TRACE_ID, USER_ID};
pub use retry::RetryPolicy;
