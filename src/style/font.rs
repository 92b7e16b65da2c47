//! Fonts and text alignment

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            "oblique" => Some(FontStyle::Oblique),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }
}

pub const FONT_WEIGHT_NORMAL: u16 = 400;
pub const FONT_WEIGHT_BOLD: u16 = 700;

/// Parse a CSS font weight keyword or number
pub fn parse_font_weight(value: &str) -> Option<u16> {
    match value.trim() {
        "normal" => Some(FONT_WEIGHT_NORMAL),
        "bold" | "bolder" => Some(FONT_WEIGHT_BOLD),
        "lighter" => Some(300),
        other => other.parse::<u16>().ok().filter(|w| (1..=1000).contains(w)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
    /// CSS weight, 400 is normal and 700 is bold
    pub weight: u16,
    pub style: FontStyle,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 16.0,
            weight: FONT_WEIGHT_NORMAL,
            style: FontStyle::Normal,
        }
    }
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= FONT_WEIGHT_BOLD
    }
}

/// Per-span font settings that replace the element font where present
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontOverride {
    pub family: Option<String>,
    pub size: Option<f64>,
    pub weight: Option<u16>,
    pub style: Option<FontStyle>,
}

impl FontOverride {
    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.size.is_none() && self.weight.is_none() && self.style.is_none()
    }

    pub fn apply(&self, base: &Font) -> Font {
        Font {
            family: self.family.clone().unwrap_or_else(|| base.family.clone()),
            size: self.size.unwrap_or(base.size),
            weight: self.weight.unwrap_or(base.weight),
            style: self.style.unwrap_or(base.style),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    /// Map an SVG `text-anchor` value
    pub fn from_text_anchor(value: &str) -> Option<Self> {
        match value.trim() {
            "start" => Some(TextAlignment::Left),
            "middle" => Some(TextAlignment::Center),
            "end" => Some(TextAlignment::Right),
            _ => None,
        }
    }

    pub fn text_anchor(&self) -> &'static str {
        match self {
            TextAlignment::Left => "start",
            TextAlignment::Center => "middle",
            TextAlignment::Right => "end",
        }
    }
}
