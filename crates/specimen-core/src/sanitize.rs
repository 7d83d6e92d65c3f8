//! Allow-list sanitizer scoped to SVG documents.
//!
//! The policy follows DOMPurify's `svg` + `svgFilters` profiles, tightened for markup that is
//! embedded into pages verbatim: every reference attribute must stay inside the document and
//! animation elements are dropped entirely.

use crate::config::SpecimenConfig;
use crate::svg_profile;
use lol_html::html_content::{ContentType, TextType};
use lol_html::{RewriteStrSettings, doc_comments, doc_text, element, end_tag, rewrite_str};
use regex::Regex;
use std::borrow::Cow;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::OnceLock;

/// Returned when the rewriter cannot make sense of the input at all.
pub const EMPTY_SVG: &str = "<svg></svg>";

fn svg_root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<svg[\s>]").expect("valid regex"))
}

fn data_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^data-[\-\w.\u{00B7}-\u{FFFF}]+$").expect("valid regex"))
}

fn aria_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^aria-[\-\w]+$").expect("valid regex"))
}

fn attr_whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\u{0000}-\u{0020}\u{00A0}\u{1680}\u{180E}\u{2000}-\u{2029}\u{205F}\u{3000}]")
            .expect("valid regex")
    })
}

fn script_or_data_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:\w+script|data):").expect("valid regex"))
}

fn css_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)url\(\s*['"]?\s*([^'")\s]*)"#).expect("valid regex"))
}

fn inline_image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^data:image/(?:png|jpe?g|gif|webp)[;,]").expect("valid regex")
    })
}

/// Cheap structural guard: the markup must open with an `<svg` root tag.
pub fn looks_like_svg(markup: &str) -> bool {
    svg_root_regex().is_match(markup)
}

/// Effective allow-list used by one sanitizer pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizePolicy {
    allowed_tags: HashSet<String>,
    allowed_attr: HashSet<String>,
    forbid_contents: HashSet<String>,
    forbid_tags: HashSet<String>,
    forbid_attr: HashSet<String>,
    allow_aria_attr: bool,
    allow_data_attr: bool,
    keep_content: bool,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self::from_config(&SpecimenConfig::default())
    }
}

impl SanitizePolicy {
    /// Builds the policy from the `sanitizer` section of `config`.
    ///
    /// `ADD_TAGS` cannot re-enable elements that are removed together with their content, and
    /// `FORBID_TAGS` cannot remove the `svg` root.
    pub fn from_config(config: &SpecimenConfig) -> Self {
        let forbid_contents: HashSet<String> = svg_profile::FORBID_CONTENTS
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut allowed_tags: HashSet<String> = svg_profile::SVG_ALLOWED_TAGS
            .iter()
            .map(|s| s.to_string())
            .collect();
        for t in config.get_lowercase_list("sanitizer.ADD_TAGS") {
            if !forbid_contents.contains(&t) {
                allowed_tags.insert(t);
            }
        }

        let mut allowed_attr: HashSet<String> = svg_profile::SVG_ALLOWED_ATTR
            .iter()
            .map(|s| s.to_string())
            .collect();
        for a in config.get_lowercase_list("sanitizer.ADD_ATTR") {
            allowed_attr.insert(a);
        }

        let forbid_tags: HashSet<String> = config
            .get_lowercase_list("sanitizer.FORBID_TAGS")
            .into_iter()
            .filter(|t| t != "svg")
            .collect();

        let forbid_attr: HashSet<String> = config
            .get_lowercase_list("sanitizer.FORBID_ATTR")
            .into_iter()
            .collect();

        Self {
            allowed_tags,
            allowed_attr,
            forbid_contents,
            forbid_tags,
            forbid_attr,
            allow_aria_attr: config
                .get_bool("sanitizer.ALLOW_ARIA_ATTR")
                .unwrap_or(true),
            allow_data_attr: config
                .get_bool("sanitizer.ALLOW_DATA_ATTR")
                .unwrap_or(true),
            keep_content: config.get_bool("sanitizer.KEEP_CONTENT").unwrap_or(true),
        }
    }

    fn is_valid_attribute(&self, lc_tag: &str, lc_name: &str, value: &str) -> bool {
        // Event handlers are never negotiable, not even through `ADD_ATTR`.
        if lc_name.starts_with("on") || self.forbid_attr.contains(lc_name) {
            return false;
        }

        let allowed = (self.allow_data_attr && data_attr_regex().is_match(lc_name))
            || (self.allow_aria_attr && aria_attr_regex().is_match(lc_name))
            || self.allowed_attr.contains(lc_name);
        if !allowed {
            return false;
        }

        let decoded = decode_attr_entities(value);
        let value_no_ws = attr_whitespace_regex().replace_all(&decoded, "");

        if svg_profile::REFERENCE_ATTR.contains(&lc_name) {
            if value_no_ws.is_empty() || value_no_ws.starts_with('#') {
                return true;
            }
            return svg_profile::DATA_URI_TAGS.contains(&lc_tag)
                && inline_image_regex().is_match(&value_no_ws);
        }

        if script_or_data_regex().is_match(&value_no_ws) {
            return false;
        }

        !references_external_resource(&decoded)
    }
}

fn css_fetching_function_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)@import|\b(?:image-set|image|cross-fade|element|src)\s*\(")
            .expect("valid regex")
    })
}

/// True when a value can make the browser load something outside the document.
///
/// `url(...)` must target a fragment. CSS escapes are not resolved here, so a value that
/// carries both an escape and a function call is treated as external.
fn references_external_resource(decoded: &str) -> bool {
    if decoded.contains('\\') && decoded.contains('(') {
        return true;
    }
    if css_fetching_function_regex().is_match(decoded) {
        return true;
    }
    css_url_regex()
        .captures_iter(decoded)
        .any(|caps| caps.get(1).is_none_or(|m| !m.as_str().starts_with('#')))
}

fn decode_attr_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    fn numeric_ref_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));?").expect("valid regex"))
    }

    fn colon_entity_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?i)&colon;").expect("valid regex"))
    }

    fn lparen_entity_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?i)&lpar;").expect("valid regex"))
    }

    fn whitespace_entity_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?i)&(?:newline|tab);").expect("valid regex"))
    }

    let out = numeric_ref_regex().replace_all(input, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string()
    });
    let out = colon_entity_regex().replace_all(&out, ":");
    let out = lparen_entity_regex().replace_all(&out, "(");
    let out = whitespace_entity_regex().replace_all(&out, " ");
    Cow::Owned(out.into_owned())
}

/// The rewriter rejects a `<` that does not open a tag; browsers treat it as text.
fn escape_stray_lt(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let is_tag_start = |i: usize| {
        let next = bytes.get(i + 1).copied().unwrap_or(b' ');
        next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?')
    };

    if !bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'<' && !is_tag_start(i))
    {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    let mut last = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'<' && !is_tag_start(i) {
            out.push_str(&input[last..i]);
            out.push_str("&lt;");
            last = i + 1;
        }
    }
    out.push_str(&input[last..]);
    Cow::Owned(out)
}

/// Sanitizes an SVG document with `policy`.
///
/// Never fails: input the rewriter cannot handle collapses to [`EMPTY_SVG`]. Callers are expected
/// to check [`looks_like_svg`] first; the result always starts with `<svg`. Everything after the
/// root element closes is dropped, and text the tokenizer reads as raw text is re-escaped so it
/// cannot turn into markup once embedded.
pub fn sanitize_svg(markup: &str, policy: &SanitizePolicy) -> String {
    let text = escape_stray_lt(markup.trim_start());

    let root_closed = Rc::new(Cell::new(false));
    let seen_root = Cell::new(false);

    let handlers = vec![element!("*", |el| {
        if root_closed.get() {
            tracing::trace!(tag = %el.tag_name(), "sanitizer removed content after root");
            el.remove();
            return Ok(());
        }
        if !seen_root.replace(true) {
            let closed = Rc::clone(&root_closed);
            if let Some(handlers) = el.end_tag_handlers() {
                handlers.push(end_tag!(move |_end| {
                    closed.set(true);
                    Ok(())
                }));
            }
        }

        let lc_tag = el.tag_name().to_ascii_lowercase();

        if policy.forbid_contents.contains(&lc_tag) {
            tracing::trace!(tag = %lc_tag, "sanitizer removed element with content");
            el.remove();
            return Ok(());
        }

        if !policy.allowed_tags.contains(&lc_tag) || policy.forbid_tags.contains(&lc_tag) {
            tracing::trace!(tag = %lc_tag, "sanitizer removed element");
            if policy.keep_content {
                el.remove_and_keep_content();
            } else {
                el.remove();
            }
            return Ok(());
        }

        let attrs: Vec<(String, String)> = el
            .attributes()
            .iter()
            .map(|a| (a.name(), a.value()))
            .collect();

        for (name, value) in attrs {
            let lc_name = name.to_ascii_lowercase();
            if !policy.is_valid_attribute(&lc_tag, &lc_name, &value) {
                tracing::trace!(tag = %lc_tag, attr = %lc_name, "sanitizer removed attribute");
                el.remove_attribute(&name);
            }
        }

        Ok(())
    })];

    let text_after_root = Rc::clone(&root_closed);
    let rewritten = rewrite_str(
        text.as_ref(),
        RewriteStrSettings {
            element_content_handlers: handlers,
            document_content_handlers: vec![
                doc_comments!(|c| {
                    c.remove();
                    Ok(())
                }),
                doc_text!(move |t| {
                    if text_after_root.get() {
                        t.remove();
                    } else if !matches!(t.text_type(), TextType::Data | TextType::CDataSection) {
                        let raw = t.as_str().to_string();
                        t.replace(&raw, ContentType::Text);
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    );

    match rewritten {
        Ok(out) if looks_like_svg(&out) => out.trim_start().to_string(),
        Ok(_) => EMPTY_SVG.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "SVG rewriter rejected input; emitting empty root");
            EMPTY_SVG.to_string()
        }
    }
}
