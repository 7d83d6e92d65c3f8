use crate::config::SpecimenConfig;
use crate::geometry::ViewBox;
use crate::height::{MaxHeight, forced_height};
use crate::render::render_svg;
use crate::sanitize::{SanitizePolicy, looks_like_svg, sanitize_svg};
use crate::{Error, Result};
use url::Url;

pub const DEFAULT_PLACEHOLDER_TEXT: &str = "Error loading SVG";

/// Settings shared by every render a [`crate::SvgRenderer`] performs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub policy: SanitizePolicy,
    pub placeholder_text: String,
    /// Base for relative source URLs (the page the SVG is embedded into).
    pub base_url: Option<Url>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            policy: SanitizePolicy::default(),
            placeholder_text: DEFAULT_PLACEHOLDER_TEXT.to_string(),
            base_url: None,
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &SpecimenConfig) -> Self {
        let base_url = config
            .get_str("fetch.baseUrl")
            .and_then(|raw| match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(err) => {
                    tracing::warn!(base_url = raw, error = %err, "ignoring invalid fetch.baseUrl");
                    None
                }
            });

        Self {
            policy: SanitizePolicy::from_config(config),
            placeholder_text: config
                .get_str("placeholder.text")
                .unwrap_or(DEFAULT_PLACEHOLDER_TEXT)
                .to_string(),
            base_url,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }
}

/// Validated + sanitized markup with its parsed geometry.
///
/// This is the part of a render that depends only on the source; class and height are applied
/// per view so they can change without re-sanitizing.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSvg {
    sanitized: String,
    view_box: Option<ViewBox>,
}

impl PreparedSvg {
    /// The sanitized document (always starts with `<svg`).
    pub fn markup(&self) -> &str {
        &self.sanitized
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.view_box
    }

    pub fn forced_height(&self, max_height: Option<&MaxHeight>) -> Option<String> {
        forced_height(max_height, self.view_box.as_ref())
    }

    /// Final embeddable markup for the given class/height props.
    pub fn render(&self, merge_class: Option<&str>, max_height: Option<&MaxHeight>) -> String {
        let height = self.forced_height(max_height);
        render_svg(&self.sanitized, merge_class, height.as_deref())
    }
}

/// Validate shape, sanitize and parse geometry.
pub fn prepare(raw: &str, policy: &SanitizePolicy) -> Result<PreparedSvg> {
    if !looks_like_svg(raw) {
        return Err(Error::NotSvg);
    }
    let sanitized = sanitize_svg(raw, policy);
    let view_box = ViewBox::from_svg(&sanitized);
    Ok(PreparedSvg {
        sanitized,
        view_box,
    })
}
