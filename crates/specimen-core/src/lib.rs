#![forbid(unsafe_code)]

//! Headless SVG sanitize + render pipeline for font specimen catalogs.
//!
//! Design goals:
//! - untrusted SVG markup is never emitted without passing the allow-list sanitizer
//! - pure, deterministic transforms (`prepare` + `render`) behind a small stateful renderer
//! - runtime-agnostic async APIs (no specific executor required)

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod height;
pub mod pipeline;
pub mod render;
pub mod renderer;
pub mod sanitize;
mod svg_profile;

pub use catalog::{
    FamiliesResponse, FontDetails, FontFamily, Foundry, Image, Images, Price, SampleView,
    UnknownSampleView, render_sample,
};
pub use config::SpecimenConfig;
pub use error::{Error, Result};
pub use fetch::{FetchError, HttpResponse, SvgFetcher, acquire, resolve_source_url};
pub use geometry::ViewBox;
pub use height::MaxHeight;
pub use pipeline::{DEFAULT_PLACEHOLDER_TEXT, PreparedSvg, RenderOptions, prepare};
pub use renderer::{
    FetchTicket, RenderPhase, RenderState, SvgProps, SvgRenderer, SvgSource, SvgView,
    render_inline,
};
pub use sanitize::{SanitizePolicy, looks_like_svg, sanitize_svg};
