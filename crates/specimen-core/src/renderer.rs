//! Stateful wrapper around the pure pipeline.
//!
//! A [`SvgRenderer`] owns the current props, the last applied result and a generation counter.
//! Every source change bumps the generation; a fetch started for an older generation can still
//! complete, but its outcome is dropped in [`SvgRenderer::apply`]. The last requested source
//! always wins, whatever order responses arrive in.

use crate::fetch::{SvgFetcher, acquire, resolve_source_url};
use crate::height::MaxHeight;
use crate::pipeline::{PreparedSvg, RenderOptions, prepare};
use crate::{Error, Result};
use std::fmt;

/// Where the markup comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    Inline(String),
    Url(String),
}

/// Input props of one render request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgProps {
    pub inline_svg: Option<String>,
    pub source_url: Option<String>,
    pub merge_class: Option<String>,
    pub max_height: Option<MaxHeight>,
}

impl SvgProps {
    pub fn inline(svg: impl Into<String>) -> Self {
        Self {
            inline_svg: Some(svg.into()),
            ..Self::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            source_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.merge_class = Some(class.into());
        self
    }

    pub fn with_max_height(mut self, max_height: impl Into<MaxHeight>) -> Self {
        self.max_height = Some(max_height.into());
        self
    }

    /// Active source. Inline markup wins; the URL is then ignored entirely.
    pub fn source(&self) -> Option<SvgSource> {
        let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.is_empty()).map(str::to_string);
        non_empty(&self.inline_svg)
            .map(SvgSource::Inline)
            .or_else(|| non_empty(&self.source_url).map(SvgSource::Url))
    }
}

/// Coarse lifecycle phase, mostly for logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Fetching,
    Sanitizing,
    Ready,
    Failed,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenderPhase::Idle => "idle",
            RenderPhase::Fetching => "fetching",
            RenderPhase::Sanitizing => "sanitizing",
            RenderPhase::Ready => "ready",
            RenderPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    Idle,
    Fetching { url: String },
    Ready(PreparedSvg),
    Failed(Error),
}

impl RenderState {
    pub fn phase(&self) -> RenderPhase {
        match self {
            RenderState::Idle => RenderPhase::Idle,
            RenderState::Fetching { .. } => RenderPhase::Fetching,
            RenderState::Ready(_) => RenderPhase::Ready,
            RenderState::Failed(_) => RenderPhase::Failed,
        }
    }
}

/// What the host page should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgView {
    /// Nothing to show yet (no source, or a fetch in flight).
    Nothing,
    Svg(String),
    /// Failure fallback; carries the caller's class so layout does not shift.
    Placeholder { class: Option<String>, text: String },
}

impl SvgView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, SvgView::Placeholder { .. })
    }

    /// HTML serialization of the view (empty for [`SvgView::Nothing`]).
    pub fn to_markup(&self) -> String {
        match self {
            SvgView::Nothing => String::new(),
            SvgView::Svg(svg) => svg.clone(),
            SvgView::Placeholder { class, text } => match class {
                Some(class) => format!(
                    r#"<div class="{}">{}</div>"#,
                    escape_xml(class),
                    escape_xml(text)
                ),
                None => format!("<div>{}</div>", escape_xml(text)),
            },
        }
    }
}

impl fmt::Display for SvgView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A pending fetch, tagged with the generation that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    url: String,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolved URL to fetch.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs the fetch. Does not touch the renderer; hand the outcome to
    /// [`SvgRenderer::apply`].
    pub async fn run<F: SvgFetcher + ?Sized>(&self, fetcher: &F) -> Result<String> {
        acquire(fetcher, &self.url).await
    }
}

/// Per-instance renderer state machine: `Idle -> Fetching -> (Sanitizing -> Ready) | Failed`.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    options: RenderOptions,
    props: SvgProps,
    generation: u64,
    state: RenderState,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl SvgRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            props: SvgProps::default(),
            generation: 0,
            state: RenderState::Idle,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn props(&self) -> &SvgProps {
        &self.props
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Installs new props.
    ///
    /// When only the class or height changed, the current result is kept and re-rendered by
    /// [`SvgRenderer::view`]. A source change restarts the state machine: inline markup is
    /// processed immediately, a URL moves to `Fetching` and returns the ticket to run.
    pub fn set_props(&mut self, props: SvgProps) -> Option<FetchTicket> {
        let source = props.source();
        let source_changed = source != self.props.source();
        self.props = props;
        if !source_changed {
            return None;
        }

        self.generation += 1;
        let generation = self.generation;

        match source {
            None => {
                tracing::debug!(generation, "SVG source cleared");
                self.state = RenderState::Idle;
                None
            }
            Some(SvgSource::Inline(markup)) => {
                tracing::debug!(generation, bytes = markup.len(), "inline SVG source");
                self.state = self.process(Ok(markup));
                None
            }
            Some(SvgSource::Url(raw_url)) => {
                match resolve_source_url(&raw_url, self.options.base_url.as_ref()) {
                    Ok(url) => {
                        let url = String::from(url);
                        tracing::debug!(generation, url = %url, "SVG source URL");
                        self.state = RenderState::Fetching { url: url.clone() };
                        Some(FetchTicket { generation, url })
                    }
                    Err(err) => {
                        self.state = self.process(Err(err.into()));
                        None
                    }
                }
            }
        }
    }

    /// Applies a fetch outcome. Returns `false` (and changes nothing) when the ticket is stale.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: Result<String>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                url = %ticket.url,
                "discarding stale SVG fetch result"
            );
            return false;
        }
        self.state = self.process(outcome);
        true
    }

    /// Convenience for callers that do not interleave source changes: set the props, run the
    /// fetch if one is needed, apply it.
    pub async fn load<F: SvgFetcher + ?Sized>(&mut self, fetcher: &F, props: SvgProps) -> &RenderState {
        if let Some(ticket) = self.set_props(props) {
            let outcome = ticket.run(fetcher).await;
            self.apply(&ticket, outcome);
        }
        &self.state
    }

    fn process(&self, markup: Result<String>) -> RenderState {
        let prepared = markup.and_then(|raw| {
            tracing::debug!(generation = self.generation, phase = %RenderPhase::Sanitizing, "SVG state");
            prepare(&raw, &self.options.policy)
        });
        match prepared {
            Ok(prepared) => {
                tracing::debug!(
                    generation = self.generation,
                    phase = %RenderPhase::Ready,
                    has_view_box = prepared.view_box().is_some(),
                    "SVG state"
                );
                RenderState::Ready(prepared)
            }
            Err(err) => {
                tracing::warn!(generation = self.generation, kind = err.kind(), error = %err, "SvgRenderer error");
                RenderState::Failed(err)
            }
        }
    }

    /// Current output for the current props. Pure: calling it twice yields the same view.
    pub fn view(&self) -> SvgView {
        match &self.state {
            RenderState::Idle | RenderState::Fetching { .. } => SvgView::Nothing,
            RenderState::Ready(prepared) => SvgView::Svg(prepared.render(
                self.props.merge_class.as_deref(),
                self.props.max_height.as_ref(),
            )),
            RenderState::Failed(_) => SvgView::Placeholder {
                class: self
                    .props
                    .merge_class
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
                text: self.options.placeholder_text.clone(),
            },
        }
    }
}

/// One-shot render without a fetcher. URL-only props yield [`SvgView::Nothing`].
pub fn render_inline(props: SvgProps, options: RenderOptions) -> SvgView {
    let mut renderer = SvgRenderer::new(options);
    if let Some(ticket) = renderer.set_props(props) {
        tracing::debug!(url = ticket.url(), "render_inline cannot fetch; leaving view empty");
    }
    renderer.view()
}
