//! Dependency check failures.
//!
//! A `CheckError` is data, not a fault: the status aggregator records it in the
//! report and keeps going. The variant classifies the failure for logging; the
//! `Display` output is only the underlying message.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// Host unreachable, DNS failure, connection refused
    #[error("{0}")]
    Unreachable(String),

    /// Authentication or authorization rejected by the dependency
    #[error("{0}")]
    Rejected(String),

    /// Missing configuration, unknown database, bucket not found
    #[error("{0}")]
    Misconfigured(String),

    /// Client-level timeout
    #[error("{0}")]
    Timeout(String),

    /// Client failure matching none of the classes above
    #[error("{0}")]
    Other(String),
}

impl CheckError {
    /// Short machine-friendly name of the failure class, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Unreachable(_) => "unreachable",
            CheckError::Rejected(_) => "rejected",
            CheckError::Misconfigured(_) => "misconfigured",
            CheckError::Timeout(_) => "timeout",
            CheckError::Other(_) => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = CheckError::Unreachable("Connection refused (os error 111)".to_string());
        assert_eq!(err.to_string(), "Connection refused (os error 111)");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CheckError::Rejected(String::new()).kind(), "rejected");
        assert_eq!(CheckError::Misconfigured(String::new()).kind(), "misconfigured");
        assert_eq!(CheckError::Timeout(String::new()).kind(), "timeout");
        assert_eq!(CheckError::Other(String::new()).kind(), "other");
    }
}
