use serde::{Deserialize, Serialize};

/// One row of the service's emotion breakdown.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionScore {
    pub emotion: String,
    pub label: String,
    /// 0-100.
    pub score: f64,
    pub color: String,
    pub emoji: String,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioFeatures {
    pub duration: f64,
    pub sample_rate: f64,
    pub pitch_mean: f64,
    pub pitch_std: f64,
    pub energy_mean: f64,
    pub energy_std: f64,
    pub tempo: f64,
    pub spectral_centroid: f64,
}

/// The analysis result for one submitted or demo sample.
///
/// `emotion_scores` keeps the order the service sent. Index 0 is the
/// headline entry even when a later entry scores higher.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    #[serde(default)]
    pub success: bool,
    pub filename: String,
    pub timestamp: String,
    pub dominant_emotion: String,
    pub confidence: f64,
    pub emotion_scores: Vec<EmotionScore>,
    pub audio_features: AudioFeatures,
}

impl AnalysisReport {
    pub fn headline(&self) -> Option<&EmotionScore> {
        self.emotion_scores.first()
    }
}

/// Error payload the service attaches to a rejected upload.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient_detail")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub fn message(&self) -> Option<&str> {
        self.detail.as_deref().filter(|d| !d.trim().is_empty())
    }
}

// FastAPI validation errors put an array in `detail`; only a string is usable.
fn lenient_detail<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}
