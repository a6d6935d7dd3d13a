use crate::report::AnalysisReport;
use crate::selection::SelectedFile;
use crate::service::{AnalysisService, ServiceError};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::sync::Mutex;

type Outcome = Result<AnalysisReport, ServiceError>;

/// Replays queued outcomes in order and records what was asked of it.
#[derive(Default)]
pub struct ScriptedService {
    analyze: Mutex<VecDeque<Outcome>>,
    demo: Mutex<VecDeque<Outcome>>,
    uploads: Mutex<Vec<String>>,
    demo_calls: Mutex<usize>,
}

impl ScriptedService {
    pub fn on_analyze(self, outcome: Outcome) -> Self {
        self.analyze.lock().expect("lock").push_back(outcome);
        self
    }

    pub fn on_demo(self, outcome: Outcome) -> Self {
        self.demo.lock().expect("lock").push_back(outcome);
        self
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("lock").clone()
    }

    pub fn demo_calls(&self) -> usize {
        *self.demo_calls.lock().expect("lock")
    }
}

fn unscripted() -> Outcome {
    Err(ServiceError::Transport("no scripted response".to_owned()))
}

impl AnalysisService for ScriptedService {
    fn analyze(&self, file: SelectedFile) -> BoxFuture<'_, Outcome> {
        self.uploads.lock().expect("lock").push(file.name);
        let next = self
            .analyze
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(unscripted);
        async move { next }.boxed()
    }

    fn demo(&self) -> BoxFuture<'_, Outcome> {
        *self.demo_calls.lock().expect("lock") += 1;
        let next = self
            .demo
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(unscripted);
        async move { next }.boxed()
    }
}
