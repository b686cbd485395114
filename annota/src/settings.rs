//! # Settings
//!
//! User preferences, saved as TOML in the platform preference directory. Anything missing from the
//! file takes its default, and a file that can't be read at all falls back to defaults entirely.

use annota_core::color::Color;

const DOCUMENTATION: &str = r##"# Annota settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Anything left out takes its default value.

# Colors are written "#rrggbb" or "#rrggbbaa".
# Sizes are in document units, except `tools.hit_tolerance` which is in screen pixels.
# Durations are in milliseconds.

"##;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("no preference directory on this platform")]
    NoPreferenceDir,
    #[error("settings failed to load, refusing to overwrite them")]
    WouldClobber,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

/// (De)serialize a [`Color`] as its hex string.
mod hex_color {
    use annota_core::color::Color;
    use serde::Deserialize;

    pub fn serialize<S: serde::Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(color)
    }
    pub fn deserialize<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct DrawSettings {
    #[serde(with = "hex_color")]
    pub color: Color,
    #[serde(with = "hex_color")]
    pub background: Color,
    pub background_opacity: u8,
    pub fill: bool,
    pub line_size: f32,
    pub text_size: f32,
}
impl Default for DrawSettings {
    fn default() -> Self {
        let draw = annota_core::state::DrawContext::default();
        Self {
            color: draw.color,
            background: draw.background,
            background_opacity: draw.background_opacity,
            fill: draw.fill,
            line_size: draw.line_size,
            text_size: draw.text_size,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct ToolSettings {
    /// Samples averaged by the smooth draw tool.
    pub smoothing: usize,
    /// Eraser radius, relative to the line size.
    pub eraser_multiplier: f32,
    /// Slop allowed when clicking on shapes and handles, in screen pixels.
    pub hit_tolerance: f32,
    /// Box given to text placed with a click instead of a drag.
    pub text_box: [f32; 2],
}
impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            smoothing: 20,
            eraser_multiplier: 1.0,
            hit_tolerance: 6.0,
            text_box: [200.0, 50.0],
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct ViewSettings {
    pub min_zoom: f32,
    /// Zoom change per wheel notch, as a fraction.
    pub wheel_step: f32,
    /// Base of the exponential scrub zoom, per pixel dragged.
    pub scrub_speed: f32,
}
impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_zoom: annota_core::viewport::MIN_ZOOM,
            wheel_step: 0.1,
            scrub_speed: 1.01,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct HistorySettings {
    pub undo_limit: usize,
}
impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            undo_limit: annota_core::state::history::DEFAULT_LIMIT,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct ClockSettings {
    pub idle_ms: u64,
    pub tablet_ms: u64,
}
impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            idle_ms: 300,
            tablet_ms: 15,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(default)]
pub struct Settings {
    pub draw: DrawSettings,
    pub tools: ToolSettings,
    pub view: ViewSettings,
    pub history: HistorySettings,
    pub clock: ClockSettings,
    /// The file existed but couldn't be used.
    #[serde(skip)]
    failed_to_load: bool,
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";

    /// Load from the preference directory, or default.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            Some(mut path) => {
                path.push(Self::FILENAME);
                Self::load_or_default(&path)
            }
            None => {
                log::warn!("No preference directory, using default settings.");
                Self::default()
            }
        }
    }
    /// Load from `path`. A missing file quietly defaults, a broken one defaults with a warning.
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let loaded: Result<Self, SettingsError> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings: Self = toml::from_str(&string)?;
            Ok(settings.sanitized())
        };
        match loaded {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults.", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Failed to load settings from {}: {err}", path.display());
                Self {
                    failed_to_load: true,
                    ..Self::default()
                }
            }
        }
    }
    /// Clamp values that would make tools misbehave.
    #[must_use]
    fn sanitized(mut self) -> Self {
        self.tools.smoothing = self.tools.smoothing.max(1);
        self.tools.hit_tolerance = self.tools.hit_tolerance.max(0.0);
        self.tools.eraser_multiplier = self.tools.eraser_multiplier.max(0.0);
        self.draw.line_size = self.draw.line_size.max(0.0);
        self.view.min_zoom = self.view.min_zoom.max(f32::EPSILON);
        self.view.wheel_step = self.view.wheel_step.max(0.0);
        self
    }
    /// Return true if the user's settings existed but couldn't be read.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Save to the preference directory. See [`Self::save_to`].
    pub fn save(&self, force: bool) -> Result<(), SettingsError> {
        let mut path = preferences_dir().ok_or(SettingsError::NoPreferenceDir)?;
        // Only the last component is created. Already existing is fine, real failures surface on write.
        let _ = std::fs::DirBuilder::new().create(&path);
        path.push(Self::FILENAME);
        self.save_to(&path, force)
    }
    /// Write to `path`. If these settings came from a file that failed to load, this refuses
    /// to overwrite it unless `force`d.
    pub fn save_to(&self, path: &std::path::Path, force: bool) -> Result<(), SettingsError> {
        if self.failed_to_load && !force {
            return Err(SettingsError::WouldClobber);
        }
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(path, string)?;
        Ok(())
    }
    #[must_use]
    pub fn draw_context(&self) -> annota_core::state::DrawContext {
        let DrawSettings {
            color,
            background,
            background_opacity,
            fill,
            line_size,
            text_size,
        } = self.draw.clone();
        annota_core::state::DrawContext {
            color,
            background,
            background_opacity,
            fill,
            line_size,
            text_size,
        }
    }
    /// A fresh document configured by these settings.
    #[must_use]
    pub fn new_document(&self) -> annota_core::state::Document {
        let mut document = annota_core::state::Document::new(self.history.undo_limit);
        document.draw = self.draw_context();
        let size = document.viewport.size;
        document.viewport = annota_core::viewport::ViewportMapper::with_min_zoom(self.view.min_zoom);
        document.viewport.size = size;
        document
    }
}
