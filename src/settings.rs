use image::Rgba;
use std::path::{Path, PathBuf};

use crate::surface::Pen;

/// Fixed surface height in logical units.
pub const DEFAULT_HEIGHT: u32 = 200;
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
pub const DEFAULT_STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// `#f8fafc`, the card background the pad sits on.
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([0xf8, 0xfa, 0xfc, 255]);

/// What a container resize does to the capture state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Blank the surface, drop has-content and emit `None` if a capture was out.
    ResetCapture,
    /// Blank the surface only; has-content and the last capture are left alone.
    KeepCapture,
}

impl ResizePolicy {
    fn as_str(self) -> &'static str {
        match self {
            ResizePolicy::ResetCapture => "reset",
            ResizePolicy::KeepCapture => "keep",
        }
    }
}

/// Pad settings that persist across sessions
#[derive(Clone, Debug, PartialEq)]
pub struct PadSettings {
    /// Surface height (width always follows the container)
    pub height: u32,
    pub line_width: f32,
    pub stroke_color: Rgba<u8>,
    pub background: Rgba<u8>,
    pub resize_policy: ResizePolicy,
    /// `auto` or a language code from [`crate::i18n::LANGUAGES`]
    pub language: String,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            line_width: DEFAULT_LINE_WIDTH,
            stroke_color: DEFAULT_STROKE_COLOR,
            background: DEFAULT_BACKGROUND,
            resize_policy: ResizePolicy::ResetCapture,
            language: "auto".to_string(),
        }
    }
}

impl PadSettings {
    pub fn pen(&self) -> Pen {
        Pen {
            width: self.line_width,
            color: self.stroke_color,
        }
    }

    pub(crate) fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").ok()?;
            let config_dir = PathBuf::from(appdata).join("SignPad");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("signpad_settings.cfg"));
        }
        #[cfg(not(target_os = "windows"))]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
                .ok()?
                .join("signpad");
            let _ = std::fs::create_dir_all(&config_dir);
            Some(config_dir.join("signpad_settings.cfg"))
        }
    }

    /// Load from the platform config file; defaults when it is missing.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path).unwrap_or_default(),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("could not read settings '{}': {}", path.display(), e))?;
        Ok(Self::parse(&content))
    }

    /// Parse `key=value` lines. Unknown keys and unparsable values keep their defaults.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "height" => {
                    if let Ok(v) = val.parse::<u32>()
                        && v > 0
                    {
                        s.height = v;
                    }
                }
                "line_width" => {
                    if let Ok(v) = val.parse::<f32>()
                        && v.is_finite()
                        && v > 0.0
                    {
                        s.line_width = v;
                    }
                }
                "stroke_color" => {
                    if let Some(c) = parse_hex_color(val) {
                        s.stroke_color = c;
                    }
                }
                "background" => {
                    if let Some(c) = parse_hex_color(val) {
                        s.background = c;
                    }
                }
                "resize_policy" => {
                    s.resize_policy = match val {
                        "keep" => ResizePolicy::KeepCapture,
                        _ => ResizePolicy::ResetCapture,
                    };
                }
                "language" => {
                    if !val.is_empty() {
                        s.language = val.to_string();
                    }
                }
                _ => {}
            }
        }
        s
    }

    pub fn to_cfg_string(&self) -> String {
        format!(
            "height={}\nline_width={}\nstroke_color={}\nbackground={}\nresize_policy={}\nlanguage={}\n",
            self.height,
            self.line_width,
            format_hex_color(self.stroke_color),
            format_hex_color(self.background),
            self.resize_policy.as_str(),
            self.language,
        )
    }

    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Err(e) = self.save_to(&path) {
            log_warn!("{}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        std::fs::write(path, self.to_cfg_string())
            .map_err(|e| format!("could not save settings '{}': {}", path.display(), e))
    }
}

/// `#rrggbb` or `#rgb` (leading `#` optional). Always opaque.
pub fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        6 => Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255])),
        3 => {
            let r = channel(0..1)?;
            let g = channel(1..2)?;
            let b = channel(2..3)?;
            Some(Rgba([r * 17, g * 17, b * 17, 255]))
        }
        _ => None,
    }
}

pub fn format_hex_color(c: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}
