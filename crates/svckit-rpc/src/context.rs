//! Call context propagated as request attachments.

use std::collections::BTreeMap;
use uuid::Uuid;

/// Attachment key for the trace id.
pub const TRACE_ID: &str = "traceId";
/// Attachment key for the calling user id.
pub const USER_ID: &str = "userId";
/// Attachment key for the tenant id.
pub const TENANT_ID: &str = "tenantId";

/// Per-call context carried across service boundaries.
///
/// Attachments are string key/value pairs; blank values are dropped rather
/// than propagated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcContext {
    attachments: BTreeMap<String, String>,
}

impl RpcContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attachment. Blank values are ignored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }
        self.attachments.insert(key.into(), value);
    }

    /// Fetches an attachment.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attachments.get(key).map(String::as_str)
    }

    /// Removes an attachment.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attachments.remove(key)
    }

    /// Drops every attachment.
    pub fn clear(&mut self) {
        self.attachments.clear();
    }

    /// Builder-style attachment setter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets the trace id.
    #[must_use]
    pub fn with_trace_id(self, trace_id: impl Into<String>) -> Self {
        self.with(TRACE_ID, trace_id)
    }

    /// Sets the calling user id.
    #[must_use]
    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        self.with(USER_ID, user_id)
    }

    /// Sets the tenant id.
    #[must_use]
    pub fn with_tenant_id(self, tenant_id: impl Into<String>) -> Self {
        self.with(TENANT_ID, tenant_id)
    }

    /// The trace id, if set.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.get(TRACE_ID)
    }

    /// The calling user id, if set.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID)
    }

    /// The tenant id, if set.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.get(TENANT_ID)
    }

    /// Ensures a trace id is present, generating one when missing, and
    /// returns it.
    pub fn ensure_trace_id(&mut self) -> String {
        if let Some(existing) = self.trace_id() {
            return existing.to_string();
        }
        let generated = Uuid::new_v4().simple().to_string();
        self.set(TRACE_ID, generated.clone());
        generated
    }

    /// All attachments, for copying onto an outgoing request.
    #[must_use]
    pub fn attachments(&self) -> &BTreeMap<String, String> {
        &self.attachments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_dropped() {
        let mut ctx = RpcContext::new();
        ctx.set(USER_ID, "  ");
        ctx.set(TENANT_ID, "");
        ctx.set(TRACE_ID, "abc");
        assert!(ctx.user_id().is_none());
        assert!(ctx.tenant_id().is_none());
        assert_eq!(ctx.trace_id(), Some("abc"));
    }

    #[test]
    fn builder_style_accessors() {
        let ctx = RpcContext::new()
            .with_trace_id("t-1")
            .with_user_id("u-1")
            .with_tenant_id("org-1");
        assert_eq!(ctx.trace_id(), Some("t-1"));
        assert_eq!(ctx.user_id(), Some("u-1"));
        assert_eq!(ctx.tenant_id(), Some("org-1"));
    }

    #[test]
    fn ensure_trace_id_is_stable() {
        let mut ctx = RpcContext::new();
        let first = ctx.ensure_trace_id();
        let second = ctx.ensure_trace_id();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn remove_clears_attachment() {
        let mut ctx = RpcContext::new().with_user_id("u-1");
        assert_eq!(ctx.remove(USER_ID).as_deref(), Some("u-1"));
        assert!(ctx.user_id().is_none());
    }
}
