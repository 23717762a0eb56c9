use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum UrlSafetyError {
    #[error("could not parse URL: {0}")]
    Unparseable(String),
    #[error("protocol '{0}' is not allowed (only http/https)")]
    ProtocolNotAllowed(String),
    #[error("host '{0}' resolves to a loopback address")]
    Loopback(String),
    #[error("host '{0}' resolves to a private network address")]
    PrivateNetwork(String),
    #[error("host '{0}' is not in the configured allow list")]
    NotAllowed(String),
    #[error("host '{0}' is in the configured block list")]
    Blocked(String),
    #[error("DNS resolution failed for '{0}': {1}")]
    DnsFailure(String, String),
}

impl From<UrlSafetyError> for auspex_core_types::UrlValidationError {
    fn from(value: UrlSafetyError) -> Self {
        auspex_core_types::UrlValidationError(value.to_string())
    }
}
