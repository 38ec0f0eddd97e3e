//! Classified errors for the retrieval pipeline.
//!
//! Remote-service failures are never swallowed: they are classified here and
//! re-signaled to the caller with enough detail to decide whether to retry,
//! bill, or inform the end user. The core itself performs no retries.

/// Classified failure from the ingestion or query pipeline.
#[derive(Debug)]
pub enum RagError {
    /// A required service credential is absent; no remote call was made.
    NotConfigured(String),
    /// Input was rejected before any remote call (empty question, no
    /// sources, bad chunking parameters).
    InvalidInput(String),
    /// The upstream model service rejected the call for quota/billing
    /// reasons. Surfaced distinctly so callers can show a specific
    /// remediation message.
    QuotaExceeded(String),
    /// Any other non-success response from an upstream service.
    Upstream { status: u16, body: String },
    /// Network-level failure reaching an upstream service.
    Transport(String),
}

impl std::fmt::Display for RagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagError::NotConfigured(what) => write!(f, "not configured: {}", what),
            RagError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            RagError::QuotaExceeded(msg) => write!(f, "quota exceeded: {}", msg),
            RagError::Upstream { status, body } => {
                write!(f, "upstream error {}: {}", status, body)
            }
            RagError::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for RagError {}

/// Classify a non-success upstream response by status and body.
///
/// OpenAI reports exhausted credit as HTTP 429 with an
/// `insufficient_quota` error code; older error bodies carry the literal
/// "exceeded your current quota" message. Both map to
/// [`RagError::QuotaExceeded`]; everything else stays a generic
/// [`RagError::Upstream`] with the status and body preserved for
/// diagnostics.
pub fn classify_upstream(status: u16, body: &str) -> RagError {
    if body.contains("insufficient_quota") || body.contains("exceeded your current quota") {
        return RagError::QuotaExceeded(body.to_string());
    }
    RagError::Upstream {
        status,
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_code_classified_distinctly() {
        let err = classify_upstream(
            429,
            r#"{"error":{"code":"insufficient_quota","message":"You exceeded your current quota"}}"#,
        );
        assert!(matches!(err, RagError::QuotaExceeded(_)));
    }

    #[test]
    fn legacy_quota_message_classified() {
        let err = classify_upstream(429, "You exceeded your current quota, please check your plan");
        assert!(matches!(err, RagError::QuotaExceeded(_)));
    }

    #[test]
    fn rate_limit_without_quota_stays_generic() {
        let err = classify_upstream(429, r#"{"error":{"code":"rate_limit_exceeded"}}"#);
        assert!(matches!(err, RagError::Upstream { status: 429, .. }));
    }

    #[test]
    fn server_error_keeps_status_and_body() {
        let err = classify_upstream(503, "service unavailable");
        match err {
            RagError::Upstream { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "service unavailable");
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[test]
    fn auth_failure_stays_generic_upstream() {
        let err = classify_upstream(401, r#"{"error":{"code":"invalid_api_key"}}"#);
        assert!(matches!(err, RagError::Upstream { status: 401, .. }));
    }

    #[test]
    fn display_names_the_classification() {
        let quota = classify_upstream(429, "insufficient_quota");
        assert!(quota.to_string().starts_with("quota exceeded:"));
        let generic = classify_upstream(500, "boom");
        assert_eq!(generic.to_string(), "upstream error 500: boom");
    }
}
