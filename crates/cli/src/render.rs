use emotion_client_core::view::{Bar, ResultsView, UploadPanel, View, DEMO_LABEL};
use std::fmt::Write;

const TRACK_WIDTH: usize = 30;
const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    pub color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn render(&self, view: &View) -> String {
        let mut out = String::new();
        self.upload(&mut out, &view.upload);
        if let Some(banner) = &view.banner {
            let _ = writeln!(out, "\n⚠️ {banner}");
        }
        if let Some(results) = &view.results {
            self.results(&mut out, results);
        }
        out
    }

    fn upload(&self, out: &mut String, panel: &UploadPanel) {
        let surface = if panel.drag_active {
            "[ drop the audio file here ]"
        } else {
            "🎵 Choose an audio file or drag and drop"
        };
        let _ = writeln!(out, "{surface}");
        if let Some(name) = &panel.selected_name {
            let _ = writeln!(out, "📁 {name}");
        }
        let _ = writeln!(
            out,
            "{}  {}",
            button(panel.analyze_label, panel.analyze_enabled),
            button(DEMO_LABEL, panel.demo_enabled)
        );
    }

    fn results(&self, out: &mut String, results: &ResultsView) {
        let head = &results.headline;
        let _ = writeln!(out);
        match (&head.glyph, &head.label) {
            (Some(glyph), Some(label)) => {
                let _ = writeln!(out, "{glyph} {label}");
            }
            _ => {
                let _ = writeln!(out, "(no emotion scores)");
            }
        }
        let _ = writeln!(out, "{}", head.confidence_text);
        let _ = writeln!(out, "{}", head.analyzed_text);

        let _ = writeln!(out, "\nEmotion Breakdown");
        let caption_width = results
            .bars
            .iter()
            .map(|b| b.caption.chars().count())
            .max()
            .unwrap_or(0);
        for bar in &results.bars {
            let pad = caption_width - bar.caption.chars().count();
            let _ = writeln!(
                out,
                "{}{} {} {}",
                bar.caption,
                " ".repeat(pad),
                self.track(bar),
                bar.score_text
            );
        }

        let _ = writeln!(out, "\nAudio Features");
        for tile in &results.tiles {
            let _ = writeln!(out, "  {:<11}{}", tile.title, tile.value);
        }
    }

    fn track(&self, bar: &Bar) -> String {
        let filled = filled_cells(bar.width_percent, TRACK_WIDTH);
        let fill = "█".repeat(filled);
        let rest = "░".repeat(TRACK_WIDTH - filled);
        match parse_hex_color(&bar.color).filter(|_| self.color) {
            Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{fill}{RESET}{rest}"),
            None => format!("{fill}{rest}"),
        }
    }
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}

pub fn filled_cells(width_percent: f64, track: usize) -> usize {
    let cells = (width_percent.clamp(0.0, 100.0) / 100.0 * track as f64).round() as usize;
    cells.min(track)
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}
