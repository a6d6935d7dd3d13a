use crate::service::ServiceError;

pub const MSG_NO_FILE: &str = "Please select a file first";
pub const MSG_NOT_AUDIO: &str = "Please drop an audio file";
pub const MSG_ANALYSIS_FAILED: &str = "Analysis failed";
pub const MSG_GENERIC: &str = "An error occurred";
pub const MSG_DEMO_FAILED: &str = "Demo failed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Analyze,
    Demo,
}

/// Errors surfaced to the user. `Display` is the banner text, verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Please select a file first")]
    NoFileSelected,
    #[error("Please drop an audio file")]
    InvalidDropType { media_type: String },
    #[error("{0}")]
    ServiceRejected(String),
    #[error("{0}")]
    TransportFailure(String),
}

impl ClientError {
    pub fn from_service(kind: RequestKind, err: ServiceError) -> Self {
        match (kind, err) {
            (RequestKind::Analyze, ServiceError::Rejected { detail, .. }) => {
                ClientError::ServiceRejected(detail.unwrap_or_else(|| MSG_ANALYSIS_FAILED.to_owned()))
            }
            (RequestKind::Demo, ServiceError::Rejected { .. }) => {
                ClientError::ServiceRejected(MSG_DEMO_FAILED.to_owned())
            }
            (kind, other) => {
                let description = other.to_string();
                let message = if description.trim().is_empty() {
                    match kind {
                        RequestKind::Analyze => MSG_GENERIC.to_owned(),
                        RequestKind::Demo => MSG_DEMO_FAILED.to_owned(),
                    }
                } else {
                    description
                };
                ClientError::TransportFailure(message)
            }
        }
    }
}
