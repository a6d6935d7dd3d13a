use crate::render::Renderer;
use emotion_client_core::controller::{Completion, Controller, PendingRequest, Settled};
use emotion_client_core::selection::SelectedFile;
use emotion_client_core::service::AnalysisService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "commands: pick <path> | drop <path> | drag-enter | drag-leave | analyze | demo | show | help | quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Pick(PathBuf),
    Drop(PathBuf),
    DragEnter,
    DragLeave,
    Analyze,
    Demo,
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let path = || {
            if rest.is_empty() {
                Err(format!("{word} needs a path"))
            } else {
                Ok(PathBuf::from(rest))
            }
        };
        let cmd = match word.to_ascii_lowercase().as_str() {
            "pick" => Command::Pick(path()?),
            "drop" => Command::Drop(path()?),
            "drag-enter" => Command::DragEnter,
            "drag-leave" => Command::DragLeave,
            "analyze" => Command::Analyze,
            "demo" => Command::Demo,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command: {other}")),
        };
        Ok(Some(cmd))
    }
}

/// The controller plus the plumbing that feeds completions back to it.
///
/// Requests run on spawned tasks and report through the channel returned by
/// [`Session::new`]; only [`Session::settle`] commits them.
pub struct Session {
    controller: Controller,
    service: Arc<dyn AnalysisService>,
    done_tx: mpsc::UnboundedSender<Completion>,
}

impl Session {
    pub fn new(service: Arc<dyn AnalysisService>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let session = Self {
            controller: Controller::new(),
            service,
            done_tx,
        };
        (session, done_rx)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Returns whether the view should be redrawn.
    pub async fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Pick(path) => match SelectedFile::from_path(&path).await {
                Ok(file) => self.controller.select_from_picker(file),
                Err(e) => {
                    eprintln!("cannot read {}: {e}", path.display());
                    return false;
                }
            },
            Command::Drop(path) => match SelectedFile::from_path(&path).await {
                Ok(file) => {
                    // the banner carries the rejection
                    let _ = self.controller.select_from_drop(file);
                }
                Err(e) => {
                    eprintln!("cannot read {}: {e}", path.display());
                    return false;
                }
            },
            Command::DragEnter => self.controller.drag_enter(),
            Command::DragLeave => self.controller.drag_leave(),
            Command::Analyze => {
                if self.controller.state().request().is_loading() {
                    eprintln!("a request is already in flight");
                    return false;
                }
                match self.controller.begin_analysis() {
                    Ok(pending) => self.spawn(pending),
                    Err(e) => tracing::debug!(error = %e, "analyze not started"),
                }
            }
            Command::Demo => {
                if !self.controller.can_request_demo() {
                    eprintln!("a request is already in flight");
                    return false;
                }
                let pending = self.controller.begin_demo();
                self.spawn(pending);
            }
            Command::Help => {
                println!("{HELP}");
                return false;
            }
            Command::Show | Command::Quit => {}
        }
        true
    }

    /// Returns whether the view should be redrawn.
    pub fn settle(&mut self, done: Completion) -> bool {
        self.controller.settle(done) != Settled::Stale
    }

    fn spawn(&self, pending: PendingRequest) {
        let service = Arc::clone(&self.service);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let done = pending.run(service.as_ref()).await;
            if done_tx.send(done).is_err() {
                tracing::debug!("session ended before the response arrived");
            }
        });
    }
}

pub async fn run(service: Arc<dyn AnalysisService>, renderer: Renderer) -> anyhow::Result<()> {
    let (mut session, mut done_rx) = Session::new(service);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    print!("{}", renderer.render(&session.controller().view()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let cmd = match Command::parse(&line) {
                    Ok(Some(cmd)) => cmd,
                    Ok(None) => continue,
                    Err(msg) => {
                        eprintln!("{msg}");
                        continue;
                    }
                };
                if cmd == Command::Quit {
                    break;
                }
                if session.apply(cmd).await {
                    print!("{}", renderer.render(&session.controller().view()));
                }
            }
            Some(done) = done_rx.recv() => {
                if session.settle(done) {
                    print!("{}", renderer.render(&session.controller().view()));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotion_client_core::controller::{RequestState, MSG_NO_FILE};
    use emotion_client_core::report::{AnalysisReport, AudioFeatures, EmotionScore};
    use emotion_client_core::service::ServiceError;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn demo_report() -> AnalysisReport {
        AnalysisReport {
            success: true,
            filename: "demo.wav".to_owned(),
            timestamp: "2024-05-01T12:00:00".to_owned(),
            dominant_emotion: "calm".to_owned(),
            confidence: 72.0,
            emotion_scores: vec![EmotionScore {
                emotion: "calm".to_owned(),
                label: "Calm".to_owned(),
                score: 72.0,
                color: "#7ed321".to_owned(),
                emoji: "😌".to_owned(),
            }],
            audio_features: AudioFeatures::default(),
        }
    }

    /// Holds every response until the test opens the gate.
    #[derive(Default)]
    struct GatedService {
        gate: Arc<Notify>,
        calls: AtomicUsize,
    }

    impl AnalysisService for GatedService {
        fn analyze(&self, _file: SelectedFile) -> BoxFuture<'_, Result<AnalysisReport, ServiceError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = Arc::clone(&self.gate);
            async move {
                gate.notified().await;
                Err(ServiceError::Transport("connection reset".to_owned()))
            }
            .boxed()
        }

        fn demo(&self) -> BoxFuture<'_, Result<AnalysisReport, ServiceError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = Arc::clone(&self.gate);
            async move {
                gate.notified().await;
                Ok(demo_report())
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn requests_are_gated_while_loading_and_settled_from_channel() {
        let svc = Arc::new(GatedService::default());
        let (mut session, mut done_rx) = Session::new(svc.clone());

        assert!(session.apply(Command::Demo).await);
        assert_eq!(session.controller().state().request(), RequestState::Loading);

        assert!(!session.apply(Command::Demo).await);
        assert!(!session.apply(Command::Analyze).await);

        svc.gate.notify_one();
        let done = done_rx.recv().await.expect("completion");
        // nothing is committed until the loop settles it
        assert_eq!(session.controller().state().request(), RequestState::Loading);

        assert!(session.settle(done));
        let state = session.controller().state();
        assert_eq!(state.request(), RequestState::Succeeded);
        assert_eq!(state.report().map(|r| r.filename.as_str()), Some("demo.wav"));
        assert_eq!(svc.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn analyze_without_file_spawns_nothing() {
        let svc = Arc::new(GatedService::default());
        let (mut session, mut done_rx) = Session::new(svc.clone());

        assert!(session.apply(Command::Analyze).await);
        assert_eq!(session.controller().state().error(), Some(MSG_NO_FILE));
        assert_eq!(session.controller().state().request(), RequestState::Idle);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 0);
        assert!(done_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn picked_file_upload_failure_settles_failed() {
        let dir = std::env::temp_dir().join(format!("emotion-client-session-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.expect("mkdir");
        let path = dir.join("voice.wav");
        tokio::fs::write(&path, b"RIFF").await.expect("write");

        let svc = Arc::new(GatedService::default());
        let (mut session, mut done_rx) = Session::new(svc.clone());

        assert!(session.apply(Command::Pick(path)).await);
        assert!(session.controller().can_submit());
        assert!(session.apply(Command::Analyze).await);
        assert!(!session.controller().can_submit());

        svc.gate.notify_one();
        let done = done_rx.recv().await.expect("completion");
        assert!(session.settle(done));
        assert_eq!(session.controller().state().request(), RequestState::Failed);
        assert_eq!(session.controller().state().error(), Some("connection reset"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_file_is_not_a_redraw() {
        let svc = Arc::new(GatedService::default());
        let (mut session, _done_rx) = Session::new(svc);
        let missing = std::env::temp_dir().join("emotion-client-does-not-exist.wav");
        assert!(!session.apply(Command::Pick(missing)).await);
        assert!(session.controller().state().selection().file().is_none());
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("pick  ./a b.wav "),
            Ok(Some(Command::Pick(PathBuf::from("./a b.wav"))))
        );
        assert_eq!(Command::parse("DEMO"), Ok(Some(Command::Demo)));
        assert_eq!(Command::parse("drag-enter"), Ok(Some(Command::DragEnter)));
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(Command::parse("drop"), Err("drop needs a path".to_owned()));
        assert_eq!(
            Command::parse("upload x"),
            Err("unknown command: upload".to_owned())
        );
    }
}
