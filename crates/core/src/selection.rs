use bytes::Bytes;
use std::path::Path;

pub const AUDIO_PREFIX: &str = "audio/";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A user-provided blob plus the media type and name it was declared with.
///
/// The media type is whatever the picker or drop source claimed; nothing here
/// sniffs the content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with(AUDIO_PREFIX)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, media_type_for(path), bytes))
    }
}

pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("webm") => "audio/webm",
        _ => OCTET_STREAM,
    }
}

/// What a selection attempt did to the current file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Adopted,
    Rejected,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    file: Option<SelectedFile>,
    drag_active: bool,
}

impl Selection {
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Pickers are trusted to filter; no type check.
    pub fn select_from_picker(&mut self, file: SelectedFile) -> SelectOutcome {
        self.file = Some(file);
        SelectOutcome::Adopted
    }

    /// Leaves the previous file in place when the drop is not audio.
    pub fn select_from_drop(&mut self, file: SelectedFile) -> SelectOutcome {
        self.drag_active = false;
        if !file.is_audio() {
            tracing::debug!(name = %file.name, media_type = %file.media_type, "drop rejected");
            return SelectOutcome::Rejected;
        }
        self.file = Some(file);
        SelectOutcome::Adopted
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    pub fn clear(&mut self) -> Option<SelectedFile> {
        self.file.take()
    }
}
