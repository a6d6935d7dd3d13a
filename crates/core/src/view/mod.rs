//! Pure projection of [`AppState`] into what the front end draws.
//!
//! Scores are shown in the order the service sent them. Nothing here sorts,
//! filters, or recomputes.

mod format;

use crate::controller::AppState;
use crate::report::{AnalysisReport, AudioFeatures, EmotionScore};

pub use format::{fixed, plain_number};

pub const ANALYZE_LABEL: &str = "Analyze Emotion";
pub const ANALYZING_LABEL: &str = "Analyzing...";
pub const DEMO_LABEL: &str = "Try Demo";

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub upload: UploadPanel,
    pub banner: Option<String>,
    pub results: Option<ResultsView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPanel {
    pub drag_active: bool,
    pub selected_name: Option<String>,
    pub loading: bool,
    pub analyze_label: &'static str,
    pub analyze_enabled: bool,
    pub demo_enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsView {
    pub headline: Headline,
    pub bars: Vec<Bar>,
    pub tiles: [Tile; 4],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Headline {
    /// `None` when the service sent no scores.
    pub glyph: Option<String>,
    pub label: Option<String>,
    pub confidence_text: String,
    pub analyzed_text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub emotion: String,
    pub caption: String,
    pub score_text: String,
    /// Share of the track to fill, 0..=100.
    pub width_percent: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub title: &'static str,
    pub value: String,
}

pub fn project(state: &AppState) -> View {
    let loading = state.request().is_loading();
    let selected_name = state.selection().file().map(|f| f.name.clone());

    View {
        upload: UploadPanel {
            drag_active: state.selection().drag_active(),
            analyze_enabled: selected_name.is_some() && !loading,
            selected_name,
            loading,
            analyze_label: if loading { ANALYZING_LABEL } else { ANALYZE_LABEL },
            demo_enabled: !loading,
        },
        banner: state.error().map(str::to_owned),
        results: state.report().map(results),
    }
}

fn results(report: &AnalysisReport) -> ResultsView {
    ResultsView {
        headline: headline(report),
        bars: report.emotion_scores.iter().map(bar).collect(),
        tiles: tiles(&report.audio_features),
    }
}

fn headline(report: &AnalysisReport) -> Headline {
    let top = report.headline();
    Headline {
        glyph: top.map(|s| s.emoji.clone()),
        label: top.map(|s| s.label.clone()),
        confidence_text: format!("{}% Confidence", fixed(report.confidence, 1)),
        analyzed_text: format!("Analyzed: {}", report.filename),
    }
}

fn bar(score: &EmotionScore) -> Bar {
    let width_percent = if score.score.is_finite() {
        score.score.clamp(0.0, 100.0)
    } else {
        0.0
    };
    Bar {
        emotion: score.emotion.clone(),
        caption: format!("{} {}", score.emoji, score.label),
        score_text: format!("{}%", fixed(score.score, 1)),
        width_percent,
        color: score.color.clone(),
    }
}

fn tiles(features: &AudioFeatures) -> [Tile; 4] {
    [
        Tile {
            title: "Duration",
            value: format!("{}s", plain_number(features.duration)),
        },
        Tile {
            title: "Tempo",
            value: format!("{} BPM", plain_number(features.tempo)),
        },
        Tile {
            title: "Pitch Mean",
            value: format!("{} Hz", fixed(features.pitch_mean, 0)),
        },
        Tile {
            title: "Energy",
            value: fixed(features.energy_mean, 3),
        },
    ]
}
