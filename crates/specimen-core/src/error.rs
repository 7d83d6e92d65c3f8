use crate::fetch::FetchError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the sanitize/render pipeline.
///
/// All variants are recovered by [`crate::SvgRenderer`] into the same placeholder view; they are
/// kept distinct so callers (and logs) can tell a transport problem from bad content.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid content-type ({content_type}) and not an inline SVG")]
    InvalidContent { content_type: String },

    #[error("Not an SVG")]
    NotSvg,
}

impl Error {
    /// Short, stable identifier used in logs and CLI JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Fetch(_) => "fetch",
            Error::InvalidContent { .. } => "invalid-content",
            Error::NotSvg => "not-svg",
        }
    }
}
