//! Persisted UI preferences.
//!
//! Preferences are loaded once at startup and written back on every change.
//! Persistence is strictly best-effort: a missing or corrupt file falls back
//! to defaults and a failed write is logged and swallowed, so preferences can
//! never block the console.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// UI languages the console can display.
pub const VALID_LANGUAGES: [&str; 2] = ["en", "bo"];

/// Editor font families offered by the settings panel.
pub const FONT_FAMILIES: [FontFamily; 8] = [
    FontFamily { value: "monlam-3", label: "Monlam Web" },
    FontFamily { value: "monlam-2", label: "Monlam TBslim" },
    FontFamily { value: "nato-black", label: "Nato Black" },
    FontFamily { value: "nato-bold", label: "Nato Bold" },
    FontFamily { value: "nato-medium", label: "Nato Medium" },
    FontFamily { value: "nato-regular", label: "Nato Regular" },
    FontFamily { value: "nato-semibold", label: "Nato SemiBold" },
    FontFamily { value: "monlam", label: "Monlam OuChan" },
];

/// Editor font sizes (px) offered by the settings panel.
pub const FONT_SIZES: [u8; 7] = [14, 16, 18, 20, 24, 28, 32];

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_FONT_FAMILY: &str = "monlam-3";
pub const DEFAULT_FONT_SIZE: u8 = 16;

/// A selectable editor font, as shown in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFamily {
    /// Stable identifier stored in preferences.
    pub value: &'static str,
    /// Human-readable name.
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Console color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Follow the host environment.
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UiPrefs
// ---------------------------------------------------------------------------

/// The persisted preference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPrefs {
    pub theme: Theme,
    pub language: String,
    pub editor_font_family: String,
    pub editor_font_size: u8,
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            editor_font_family: DEFAULT_FONT_FAMILY.to_string(),
            editor_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl UiPrefs {
    /// Replace any value outside the offered tables with its default.
    ///
    /// Applied after loading, so a preferences file written by a newer or
    /// older build degrades field by field instead of wholesale.
    pub fn normalized(mut self) -> Self {
        if !VALID_LANGUAGES.contains(&self.language.as_str()) {
            tracing::warn!(language = %self.language, "Unknown UI language, falling back to default");
            self.language = DEFAULT_LANGUAGE.to_string();
        }
        if !FONT_FAMILIES.iter().any(|f| f.value == self.editor_font_family) {
            tracing::warn!(
                font_family = %self.editor_font_family,
                "Unknown editor font family, falling back to default"
            );
            self.editor_font_family = DEFAULT_FONT_FAMILY.to_string();
        }
        if !FONT_SIZES.contains(&self.editor_font_size) {
            tracing::warn!(
                font_size = self.editor_font_size,
                "Unknown editor font size, falling back to default"
            );
            self.editor_font_size = DEFAULT_FONT_SIZE;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// PrefsStore
// ---------------------------------------------------------------------------

/// Preference persistence backed by a single JSON file.
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load preferences, falling back to defaults if the file is missing,
    /// unreadable, or corrupt.
    pub async fn load(&self) -> UiPrefs {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return UiPrefs::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read preferences file");
                return UiPrefs::default();
            }
        };
        match serde_json::from_slice::<UiPrefs>(&bytes) {
            Ok(prefs) => prefs.normalized(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt preferences file");
                UiPrefs::default()
            }
        }
    }

    /// Persist preferences, logging and swallowing any failure.
    pub async fn save(&self, prefs: &UiPrefs) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    tracing::warn!(error = %e, "Failed to create preferences directory");
                    return;
                }
            }
        }
        let json = match serde_json::to_vec_pretty(prefs) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode preferences");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&self.path, &json).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write preferences file");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
