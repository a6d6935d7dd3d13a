//! Request coordination and the single owner of [`AppState`].
//!
//! A request runs in three steps so overlapping completions can be told
//! apart: `begin_*` stamps a fresh [`RequestToken`] and moves to `Loading`,
//! [`PendingRequest::run`] does the I/O without touching state, and
//! [`Controller::settle`] commits the outcome only if its token is still the
//! latest one issued.

mod error;
mod state;

use crate::report::AnalysisReport;
use crate::selection::{SelectOutcome, SelectedFile};
use crate::service::{AnalysisService, ServiceError};
use crate::view::{self, View};

pub use error::{
    ClientError, RequestKind, MSG_ANALYSIS_FAILED, MSG_DEMO_FAILED, MSG_GENERIC, MSG_NOT_AUDIO,
    MSG_NO_FILE,
};
pub use state::{AppState, RequestState};

/// Monotonic identity of an initiated request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
enum Payload {
    Upload(SelectedFile),
    Demo,
}

/// A started request that has not touched the network yet.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    token: RequestToken,
    payload: Payload,
}

impl PendingRequest {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn kind(&self) -> RequestKind {
        match self.payload {
            Payload::Upload(_) => RequestKind::Analyze,
            Payload::Demo => RequestKind::Demo,
        }
    }

    pub async fn run<S: AnalysisService + ?Sized>(self, service: &S) -> Completion {
        let kind = self.kind();
        let outcome = match self.payload {
            Payload::Upload(file) => service.analyze(file).await,
            Payload::Demo => service.demo().await,
        };
        Completion {
            token: self.token,
            kind,
            outcome,
        }
    }
}

/// The result of a request, waiting to be committed.
#[derive(Debug)]
pub struct Completion {
    token: RequestToken,
    kind: RequestKind,
    outcome: Result<AnalysisReport, ServiceError>,
}

impl Completion {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settled {
    Succeeded,
    Failed(ClientError),
    /// A newer request was started first; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct Controller {
    state: AppState,
    latest: RequestToken,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> View {
        view::project(&self.state)
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    pub fn select_from_picker(&mut self, file: SelectedFile) {
        tracing::debug!(name = %file.name, media_type = %file.media_type, "file picked");
        self.state.selection.select_from_picker(file);
        self.after_selection();
    }

    /// On rejection the previous file is kept and the error banner is set.
    pub fn select_from_drop(&mut self, file: SelectedFile) -> Result<(), ClientError> {
        let media_type = file.media_type.clone();
        match self.state.selection.select_from_drop(file) {
            SelectOutcome::Adopted => {
                self.after_selection();
                Ok(())
            }
            SelectOutcome::Rejected => {
                let err = ClientError::InvalidDropType { media_type };
                self.state.set_error(err.to_string());
                Err(err)
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.state.selection.drag_enter();
    }

    pub fn drag_leave(&mut self) {
        self.state.selection.drag_leave();
    }

    fn after_selection(&mut self) {
        self.state.clear_outcome();
        if !self.state.request.is_loading() {
            self.state.request = RequestState::Idle;
        }
    }

    pub fn can_submit(&self) -> bool {
        self.state.selection.file().is_some() && !self.state.request.is_loading()
    }

    pub fn can_request_demo(&self) -> bool {
        !self.state.request.is_loading()
    }

    pub fn begin_analysis(&mut self) -> Result<PendingRequest, ClientError> {
        let Some(file) = self.state.selection.file().cloned() else {
            tracing::debug!("submit without a selected file");
            self.state.set_error(ClientError::NoFileSelected.to_string());
            return Err(ClientError::NoFileSelected);
        };
        let token = self.start();
        tracing::info!(token = token.get(), file = %file.name, "analysis started");
        Ok(PendingRequest {
            token,
            payload: Payload::Upload(file),
        })
    }

    pub fn begin_demo(&mut self) -> PendingRequest {
        self.state.selection.clear();
        let token = self.start();
        tracing::info!(token = token.get(), "demo started");
        PendingRequest {
            token,
            payload: Payload::Demo,
        }
    }

    fn start(&mut self) -> RequestToken {
        self.latest = self.latest.next();
        self.state.clear_error();
        self.state.request = RequestState::Loading;
        self.latest
    }

    pub fn settle(&mut self, completion: Completion) -> Settled {
        if completion.token != self.latest {
            tracing::debug!(
                token = completion.token.get(),
                latest = self.latest.get(),
                kind = ?completion.kind,
                "discarding stale response"
            );
            return Settled::Stale;
        }

        match completion.outcome {
            Ok(report) => {
                tracing::info!(
                    token = completion.token.get(),
                    dominant = %report.dominant_emotion,
                    confidence = report.confidence,
                    "report received"
                );
                self.state.set_report(report);
                self.state.request = RequestState::Succeeded;
                Settled::Succeeded
            }
            Err(e) => {
                let err = ClientError::from_service(completion.kind, e);
                tracing::warn!(token = completion.token.get(), error = %err, "request failed");
                self.state.set_error(err.to_string());
                self.state.request = RequestState::Failed;
                Settled::Failed(err)
            }
        }
    }

    pub async fn submit_analysis<S: AnalysisService + ?Sized>(
        &mut self,
        service: &S,
    ) -> Result<Settled, ClientError> {
        let pending = self.begin_analysis()?;
        let completion = pending.run(service).await;
        Ok(self.settle(completion))
    }

    pub async fn request_demo<S: AnalysisService + ?Sized>(&mut self, service: &S) -> Settled {
        let pending = self.begin_demo();
        let completion = pending.run(service).await;
        self.settle(completion)
    }
}
