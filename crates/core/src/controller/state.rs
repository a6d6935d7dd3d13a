use crate::report::AnalysisReport;
use crate::selection::Selection;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

/// Everything the view reads. Only the controller mutates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub(crate) selection: Selection,
    pub(crate) request: RequestState,
    error: Option<String>,
    report: Option<AnalysisReport>,
}

impl AppState {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn request(&self) -> RequestState {
        self.request
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.report = None;
        self.error = Some(message.into());
    }

    pub(crate) fn set_report(&mut self, report: AnalysisReport) {
        self.error = None;
        self.report = Some(report);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn clear_outcome(&mut self) {
        self.error = None;
        self.report = None;
    }
}
