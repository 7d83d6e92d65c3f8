use serde::{Deserialize, Serialize};

/// Root `viewBox` of an SVG document: `(minX, minY, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parses a `viewBox` attribute value.
    ///
    /// Tokens are separated by whitespace and/or commas. Returns `None` unless there are exactly
    /// four finite numbers and neither width nor height is zero.
    pub fn parse(value: &str) -> Option<Self> {
        let tokens: Vec<&str> = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        let &[min_x, min_y, width, height] = tokens.as_slice() else {
            return None;
        };

        let parse = |t: &str| t.parse::<f64>().ok().filter(|n| n.is_finite());
        let vb = Self {
            min_x: parse(min_x)?,
            min_y: parse(min_y)?,
            width: parse(width)?,
            height: parse(height)?,
        };
        (vb.width != 0.0 && vb.height != 0.0).then_some(vb)
    }

    /// Reads the geometry from the root element of an SVG document.
    pub fn from_svg(markup: &str) -> Option<Self> {
        let attrs = crate::render::root_attributes(markup);
        let (_, value) = attrs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("viewBox"))?;
        Self::parse(value)
    }
}
