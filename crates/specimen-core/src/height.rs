use crate::geometry::ViewBox;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Caller-supplied display height cap.
///
/// Deserializes from either a JSON number (pixels) or a string (a CSS length used verbatim).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxHeight {
    Pixels(f64),
    Css(String),
}

impl MaxHeight {
    /// CSS value for the `height` declaration, or `None` when the value is unset-like
    /// (`0`, NaN, blank string).
    pub fn to_css(&self) -> Option<String> {
        match self {
            MaxHeight::Pixels(px) if *px != 0.0 && !px.is_nan() => Some(format!("{px}px")),
            MaxHeight::Pixels(_) => None,
            MaxHeight::Css(css) => {
                let css = css.trim();
                (!css.is_empty()).then(|| css.to_string())
            }
        }
    }
}

impl From<f64> for MaxHeight {
    fn from(value: f64) -> Self {
        Self::Pixels(value)
    }
}

impl From<u32> for MaxHeight {
    fn from(value: u32) -> Self {
        Self::Pixels(f64::from(value))
    }
}

impl From<&str> for MaxHeight {
    fn from(value: &str) -> Self {
        Self::Css(value.to_string())
    }
}

impl From<String> for MaxHeight {
    fn from(value: String) -> Self {
        Self::Css(value)
    }
}

impl FromStr for MaxHeight {
    type Err = std::convert::Infallible;

    /// Bare numbers become pixels; anything else is kept as a CSS length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<f64>() {
            Ok(px) if px.is_finite() => Self::Pixels(px),
            _ => Self::Css(s.to_string()),
        })
    }
}

/// Height to force onto the rendered root.
///
/// Forcing only happens when the document has usable geometry; without a `viewBox` there is no
/// intrinsic aspect ratio to preserve and the SVG keeps its own sizing.
pub fn forced_height(max_height: Option<&MaxHeight>, view_box: Option<&ViewBox>) -> Option<String> {
    view_box?;
    max_height?.to_css()
}
