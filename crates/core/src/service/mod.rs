mod http;
#[cfg(test)]
pub(crate) mod scripted;

use crate::config::ConfigError;
use crate::report::{AnalysisReport, ErrorBody};
use crate::selection::SelectedFile;
use futures::future::BoxFuture;

pub use http::HttpAnalysisService;

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("service responded with HTTP {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("{0}")]
    Transport(String),
    #[error("invalid service configuration: {0}")]
    Config(#[from] ConfigError),
}

/// The remote analysis service. One call is one request; nothing retries.
pub trait AnalysisService: Send + Sync {
    fn analyze(&self, file: SelectedFile) -> BoxFuture<'_, Result<AnalysisReport, ServiceError>>;

    fn demo(&self) -> BoxFuture<'_, Result<AnalysisReport, ServiceError>>;
}

pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Reads an upload response. Rejections carry the body's `detail` when present.
pub fn interpret_analyze(status: u16, body: &[u8]) -> Result<AnalysisReport, ServiceError> {
    if !is_success(status) {
        let detail = ErrorBody::parse(body).and_then(|b| b.message().map(str::to_owned));
        return Err(ServiceError::Rejected { status, detail });
    }
    parse_report(body)
}

/// Reads a demo response. The body of a rejection is never inspected.
pub fn interpret_demo(status: u16, body: &[u8]) -> Result<AnalysisReport, ServiceError> {
    if !is_success(status) {
        return Err(ServiceError::Rejected {
            status,
            detail: None,
        });
    }
    parse_report(body)
}

fn parse_report(body: &[u8]) -> Result<AnalysisReport, ServiceError> {
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::Transport(format!("invalid analysis report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{happy_json, happy_report};

    #[test]
    fn analyze_success_parses_report() {
        let report = interpret_analyze(200, happy_json().as_bytes()).expect("report");
        assert_eq!(report, happy_report());
    }

    #[test]
    fn analyze_rejection_uses_detail() {
        let err = interpret_analyze(413, br#"{"detail":"file too large"}"#).unwrap_err();
        match err {
            ServiceError::Rejected { status, detail } => {
                assert_eq!(status, 413);
                assert_eq!(detail.as_deref(), Some("file too large"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn analyze_rejection_without_json_has_no_detail() {
        let err = interpret_analyze(500, b"Internal Server Error").unwrap_err();
        assert!(matches!(err, ServiceError::Rejected { status: 500, detail: None }));
    }

    #[test]
    fn demo_rejection_ignores_body() {
        let err = interpret_demo(500, br#"{"detail":"model not loaded"}"#).unwrap_err();
        assert!(matches!(err, ServiceError::Rejected { status: 500, detail: None }));
    }

    #[test]
    fn success_with_garbage_body_is_transport_failure() {
        let err = interpret_demo(200, b"{\"success\":true}").unwrap_err();
        match err {
            ServiceError::Transport(msg) => assert!(msg.starts_with("invalid analysis report")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
