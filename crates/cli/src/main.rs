#![deny(warnings)]

mod interactive;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use emotion_client_core::config::{
    resolve_origin, ClientConfig, Env, StdEnv, DEFAULT_API_ORIGIN, ENV_API_URL,
};
use emotion_client_core::controller::{Controller, Settled};
use emotion_client_core::selection::SelectedFile;
use emotion_client_core::service::{AnalysisService, HttpAnalysisService};
use render::Renderer;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emotion-client")]
#[command(about = "Submit audio to a speech emotion analysis service and show the report")]
struct Args {
    #[command(subcommand)]
    command: Cmd,

    /// Base address of the analysis service
    #[arg(long, global = true, env = ENV_API_URL, default_value = DEFAULT_API_ORIGIN)]
    api_url: String,

    /// Give up on a request after this many seconds (default: never)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Upload an audio file for analysis
    Analyze { path: PathBuf },
    /// Fetch the service's canned demo analysis
    Demo,
    /// Line-driven session: pick, drop, analyze, demo
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let cfg = build_config(&args, &StdEnv)?;
    tracing::info!(origin = %cfg.origin, timeout = ?cfg.request_timeout, "config loaded");

    let service = HttpAnalysisService::new(&cfg).context("failed to build http client")?;
    let renderer = Renderer::new(!args.no_color && std::io::stdout().is_terminal());

    match args.command {
        Cmd::Analyze { path } => {
            let file = SelectedFile::from_path(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let mut controller = Controller::new();
            controller.select_from_picker(file);
            let settled = controller.submit_analysis(&service).await;
            Ok(finish(&controller, &renderer, settled.ok()))
        }
        Cmd::Demo => {
            let mut controller = Controller::new();
            let settled = controller.request_demo(&service).await;
            Ok(finish(&controller, &renderer, Some(settled)))
        }
        Cmd::Interactive => {
            let service: Arc<dyn AnalysisService> = Arc::new(service);
            interactive::run(service, renderer).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn finish(controller: &Controller, renderer: &Renderer, settled: Option<Settled>) -> ExitCode {
    print!("{}", renderer.render(&controller.view()));
    match settled {
        Some(Settled::Succeeded) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: &Args, env: &impl Env) -> anyhow::Result<ClientConfig> {
    let origin = resolve_origin(Some(args.api_url.clone()), env)?;
    let cfg = ClientConfig::new(origin).with_timeout_secs(args.timeout_secs)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotion_client_core::config::MapEnv;
    use std::time::Duration;

    #[test]
    fn parses_analyze_with_global_flags() {
        let args = Args::try_parse_from([
            "emotion-client",
            "analyze",
            "clip.wav",
            "--api-url",
            "http://svc.test:9000",
            "--timeout-secs",
            "20",
        ])
        .expect("valid args");
        assert!(matches!(args.command, Cmd::Analyze { ref path } if path == &PathBuf::from("clip.wav")));

        let cfg = build_config(&args, &MapEnv::default()).expect("config");
        assert_eq!(cfg.origin.as_str(), "http://svc.test:9000");
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn zero_timeout_is_a_config_error() {
        let args = Args::try_parse_from(["emotion-client", "demo", "--timeout-secs", "0"])
            .expect("valid args");
        assert!(build_config(&args, &MapEnv::default()).is_err());
    }

    #[test]
    fn bad_origin_is_a_config_error() {
        let args = Args::try_parse_from(["emotion-client", "demo", "--api-url", "nope"])
            .expect("valid args");
        assert!(build_config(&args, &MapEnv::default()).is_err());
    }
}
