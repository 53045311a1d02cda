//! Theme palettes and HTML escaping shared by every renderer.
//!
//! Two palettes: `pixel` (warm parchment, the default) and `neon` (dark, saturated).
//! Renderers only reference CSS variables; the palette fills them in once per page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Pixel,
    Neon,
}

/// Concrete colors for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: &'static str,
    pub panel: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub green: &'static str,
    pub purple: &'static str,
    pub orange: &'static str,
    pub grid: &'static str,
}

const PIXEL: Palette = Palette {
    background: "#2b2118",
    panel: "#3a2d22",
    text: "#f5e6c8",
    muted: "#6b5344",
    green: "#3cb489",
    purple: "#c9a227",
    orange: "#d4764c",
    grid: "rgba(60, 180, 137, 0.2)",
};

const NEON: Palette = Palette {
    background: "#0f1020",
    panel: "#1a1b2e",
    text: "#ffffff",
    muted: "#8b8b9a",
    green: "#00ff88",
    purple: "#bf7fff",
    orange: "#ff9500",
    grid: "rgba(255, 255, 255, 0.1)",
};

impl Theme {
    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Pixel => &PIXEL,
            Theme::Neon => &NEON,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Pixel => "pixel",
            Theme::Neon => "neon",
        }
    }
}

impl Palette {
    /// `:root` block mapping the palette onto the CSS variables renderers use.
    pub fn css_vars(&self) -> String {
        format!(
            ":root{{--bg:{};--panel:{};--text:{};--muted:{};--green:{};--purple:{};--orange:{};--grid:{};}}",
            self.background, self.panel, self.text, self.muted, self.green, self.purple, self.orange, self.grid
        )
    }
}

/// Converts `#rrggbb` into an `rgba()` string; other inputs are returned unchanged.
pub fn with_alpha(hex: &str, alpha: f32) -> String {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 {
        return hex.to_string();
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
        _ => hex.to_string(),
    }
}

/// Escapes HTML so data strings never inject markup.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
