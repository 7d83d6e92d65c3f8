//! Font catalog data model.
//!
//! Mirrors the JSON documents the catalog serves (camelCase keys). Sample images carry inline SVG
//! markup which is rendered through the same pipeline as any other source.

use crate::height::MaxHeight;
use crate::pipeline::RenderOptions;
use crate::renderer::{SvgProps, SvgView, render_inline};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Foundry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_families: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Display string as provided by the catalog (the key is spelled this way upstream).
    pub formated_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub svg: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Images {
    pub alphabet: Image,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pangram: Option<Image>,
}

impl Images {
    /// Image for `view`; a missing pangram falls back to the alphabet.
    pub fn sample(&self, view: SampleView) -> &Image {
        match view {
            SampleView::Pangram => self.pangram.as_ref().unwrap_or(&self.alphabet),
            SampleView::Alphabet => &self.alphabet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFamily {
    pub id_font: u64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_regular_font: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    pub id_family: String,
    pub name: String,
    pub total_fonts: u32,
    pub foundry: Foundry,
    pub images: Images,
}

impl FontFamily {
    /// `"1 style"` / `"N styles"`; `None` when the family reports no fonts.
    pub fn styles_label(&self) -> Option<String> {
        match self.total_fonts {
            0 => None,
            1 => Some("1 style".to_string()),
            n => Some(format!("{n} styles")),
        }
    }

    pub fn price_label(&self) -> Option<String> {
        self.price
            .as_ref()
            .map(|p| format!("From {}", p.formated_price))
    }
}

/// Detail document for one font. Same shape as a [`FontFamily`] listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDetails {
    #[serde(flatten)]
    pub family: FontFamily,
}

impl FontDetails {
    pub fn document_title(&self) -> String {
        format!("{} {}", self.family.foundry.name, self.family.name)
    }

    pub fn images(&self) -> &Images {
        &self.family.images
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamiliesResponse {
    pub families: Vec<FontFamily>,
    pub total_families: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleView {
    #[default]
    Pangram,
    Alphabet,
}

impl fmt::Display for SampleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleView::Pangram => "pangram",
            SampleView::Alphabet => "alphabet",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sample view `{0}` (expected `pangram` or `alphabet`)")]
pub struct UnknownSampleView(pub String);

impl FromStr for SampleView {
    type Err = UnknownSampleView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pangram" => Ok(SampleView::Pangram),
            "alphabet" => Ok(SampleView::Alphabet),
            _ => Err(UnknownSampleView(s.to_string())),
        }
    }
}

/// Renders the sample image for `view` with the caller's class and height cap.
pub fn render_sample(
    images: &Images,
    view: SampleView,
    merge_class: Option<&str>,
    max_height: Option<MaxHeight>,
    options: RenderOptions,
) -> SvgView {
    let image = images.sample(view);
    tracing::debug!(%view, width = image.width, height = image.height, "rendering font sample");
    let props = SvgProps {
        inline_svg: Some(image.svg.clone()),
        source_url: None,
        merge_class: merge_class.map(str::to_string),
        max_height,
    };
    render_inline(props, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn family_json() -> serde_json::Value {
        json!({
            "idFont": 1,
            "idFamily": "1",
            "name": "Roboto",
            "url": "/font/roboto",
            "foundry": { "name": "Google Fonts", "id": "google", "totalFamilies": 12 },
            "price": { "formatedPrice": "$29.99", "amount": 29.99, "currency": "USD" },
            "totalFonts": 12,
            "images": {
                "alphabet": { "svg": "<svg viewBox='0 0 300 100'><path d='M0 0' /></svg>", "width": 300, "height": 100 }
            }
        })
    }

    #[test]
    fn family_labels() {
        let mut family: FontFamily = serde_json::from_value(family_json()).expect("family");
        assert_eq!(family.styles_label().as_deref(), Some("12 styles"));
        assert_eq!(family.price_label().as_deref(), Some("From $29.99"));

        family.total_fonts = 1;
        family.price = None;
        assert_eq!(family.styles_label().as_deref(), Some("1 style"));
        assert_eq!(family.price_label(), None);

        family.total_fonts = 0;
        assert_eq!(family.styles_label(), None);
    }

    #[test]
    fn null_price_and_missing_optionals_deserialize() {
        let mut value = family_json();
        value["price"] = serde_json::Value::Null;
        let family: FontFamily = serde_json::from_value(value).expect("family");
        assert_eq!(family.price, None);
        assert_eq!(family.vendor_id, None);
        assert_eq!(family.images.pangram, None);
    }

    #[test]
    fn details_title_and_sample_fallback() {
        let details: FontDetails = serde_json::from_value(family_json()).expect("details");
        assert_eq!(details.document_title(), "Google Fonts Roboto");
        let images = details.images();
        assert_eq!(images.sample(SampleView::Pangram), &images.alphabet);
        assert_eq!(images.sample(SampleView::Alphabet), &images.alphabet);
    }

    #[test]
    fn sample_view_parses_case_insensitively() {
        assert_eq!("Alphabet".parse::<SampleView>(), Ok(SampleView::Alphabet));
        assert_eq!(" pangram ".parse::<SampleView>(), Ok(SampleView::Pangram));
        assert!("waterfall".parse::<SampleView>().is_err());
        assert_eq!(SampleView::default().to_string(), "pangram");
    }

    #[test]
    fn render_sample_runs_the_pipeline() {
        let details: FontDetails = serde_json::from_value(family_json()).expect("details");
        let view = render_sample(
            details.images(),
            SampleView::Alphabet,
            Some("w-full"),
            Some(MaxHeight::from(418u32)),
            RenderOptions::default(),
        );
        assert_eq!(
            view,
            SvgView::Svg(
                r#"<svg class="w-full" viewBox="0 0 300 100" style="height: 418px"><path d='M0 0' /></svg>"#
                    .to_string()
            )
        );
    }

    #[test]
    fn families_response_roundtrips_camel_case() {
        let resp: FamiliesResponse = serde_json::from_value(json!({
            "families": [family_json()],
            "totalFamilies": 1
        }))
        .expect("response");
        assert_eq!(resp.total_families, 1);
        let back = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(back["families"][0]["idFamily"], "1");
        assert_eq!(back["families"][0]["price"]["formatedPrice"], "$29.99");
    }
}
