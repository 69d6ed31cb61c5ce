//! Outbound messaging channels
//!
//! The gateway sends replies through a [`MessageSender`]; the production
//! implementation is the Z-API adapter in [`zapi`].

mod zapi;

pub use zapi::ZapiChannel;

use async_trait::async_trait;

/// Why a dispatch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchErrorKind {
    /// Credentials rejected (401/403)
    Auth,
    /// Network-level failure
    Transport,
    /// Provider throttled us (429)
    RateLimited,
    /// Any other non-success response
    Other,
}

/// Outcome of a dispatch attempt
///
/// Dispatch failures are reported, never raised: the caller logs and moves
/// on, it does not retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub ok: bool,
    pub error_kind: Option<DispatchErrorKind>,
}

impl DispatchResult {
    /// Successful (or trivially skipped) dispatch
    #[must_use]
    pub const fn success() -> Self {
        Self {
            ok: true,
            error_kind: None,
        }
    }

    /// Failed dispatch with a classified cause
    #[must_use]
    pub const fn failure(kind: DispatchErrorKind) -> Self {
        Self {
            ok: false,
            error_kind: Some(kind),
        }
    }
}

/// A channel capable of delivering text messages to a customer
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Channel name for logging
    fn name(&self) -> &'static str;

    /// Send a text message to a phone number
    ///
    /// Empty text is a no-op that reports success without any network call.
    async fn send_text(&self, phone: &str, text: &str) -> DispatchResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_result_constructors() {
        let ok = DispatchResult::success();
        assert!(ok.ok);
        assert!(ok.error_kind.is_none());

        let failed = DispatchResult::failure(DispatchErrorKind::Auth);
        assert!(!failed.ok);
        assert_eq!(failed.error_kind, Some(DispatchErrorKind::Auth));
    }
}
