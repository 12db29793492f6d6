//! Classified provider failures.
//!
//! Every failure of the generation call is mapped to one [`ProviderError`]
//! kind so callers can match on it instead of inspecting error strings.
//! `Display` gives the user-facing sentence; [`ProviderError::detail`] keeps
//! the raw provider text for logs.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static INVALID_CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(401|403)\b|unauthori[sz]ed|invalid[ _-]?(x-)?api[ _-]?key|incorrect api key|api key not valid|authentication[ _-]?(error|failed)|permission[ _-]denied",
    )
    .expect("credential regex is valid")
});

static QUOTA_EXCEEDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b429\b|quota|rate[ _-]?limit|too many requests|resource[ _-]?exhausted|insufficient[ _-]?(credits|balance|funds)|billing",
    )
    .expect("quota regex is valid")
});

static CONTENT_FILTERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)safety|content[ _-]?(filter|policy|management)|moderation|blocked")
        .expect("content filter regex is valid")
});

/// Why a generation request could not be completed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No credential configured for a provider that needs one.
    #[error("No API key configured for {provider}. Run `tomo setup` or set {env_var}.")]
    NotConfigured {
        provider: &'static str,
        env_var: String,
    },

    #[error("Invalid API key: the provider rejected your credentials. Run `tomo setup` to update it.")]
    InvalidCredential(String),

    #[error("API quota exceeded: you have hit your usage or rate limit. Wait a moment or check your plan.")]
    QuotaExceeded(String),

    #[error("Content filtered: the provider blocked this request or its response. Try rephrasing.")]
    ContentFiltered(String),

    #[error("Request failed: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Maps raw provider error text to an error kind.
    ///
    /// Checked in order: credential, quota, content filter. Anything else is
    /// a transport error carrying the text verbatim.
    pub fn classify(raw: &str) -> Self {
        let detail = raw.to_string();
        if INVALID_CREDENTIAL.is_match(raw) {
            Self::InvalidCredential(detail)
        } else if QUOTA_EXCEEDED.is_match(raw) {
            Self::QuotaExceeded(detail)
        } else if CONTENT_FILTERED.is_match(raw) {
            Self::ContentFiltered(detail)
        } else {
            Self::Transport(detail)
        }
    }

    /// Raw provider text behind this error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NotConfigured { .. } => None,
            Self::InvalidCredential(d)
            | Self::QuotaExceeded(d)
            | Self::ContentFiltered(d)
            | Self::Transport(d) => Some(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_credentials() {
        let err = ProviderError::classify("CompletionError: HttpError: 401 Unauthorized");
        assert!(matches!(err, ProviderError::InvalidCredential(_)));
        let err = ProviderError::classify("{\"error\":{\"type\":\"authentication_error\"}}");
        assert!(matches!(err, ProviderError::InvalidCredential(_)));
        let err = ProviderError::classify("Incorrect API key provided: sk-...");
        assert!(matches!(err, ProviderError::InvalidCredential(_)));
    }

    #[test]
    fn test_classify_quota() {
        for raw in [
            "ProviderError: 429 Too Many Requests",
            "You exceeded your current quota, please check your plan",
            "rate_limit_error: Number of request tokens has exceeded your per-minute rate limit",
            "RESOURCE_EXHAUSTED",
        ] {
            assert!(
                matches!(ProviderError::classify(raw), ProviderError::QuotaExceeded(_)),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_classify_content_filter() {
        let err = ProviderError::classify("Response was blocked due to SAFETY");
        assert!(matches!(err, ProviderError::ContentFiltered(_)));
        let err = ProviderError::classify("content_policy_violation");
        assert!(matches!(err, ProviderError::ContentFiltered(_)));
    }

    #[test]
    fn test_classify_transport_fallback() {
        let err = ProviderError::classify("error sending request: connection refused");
        assert_eq!(
            err,
            ProviderError::Transport("error sending request: connection refused".into())
        );
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_quota_message_names_quota_not_code() {
        let err = ProviderError::classify("HTTP 429: insufficient_quota");
        let message = err.to_string();
        assert!(message.contains("quota exceeded"));
        assert!(!message.contains("429"));
        assert_eq!(err.detail(), Some("HTTP 429: insufficient_quota"));
    }

    #[test]
    fn test_not_configured_message_names_env_var() {
        let err = ProviderError::NotConfigured {
            provider: "OpenAI",
            env_var: "OPENAI_API_KEY".into(),
        };
        let message = err.to_string();
        assert!(message.contains("OpenAI"));
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(message.contains("tomo setup"));
        assert_eq!(err.detail(), None);
    }
}
