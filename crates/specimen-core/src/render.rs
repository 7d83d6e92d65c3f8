//! Root-tag rewriting for sanitized SVG documents.
//!
//! Only the first `<svg>` start tag is touched; nested `<svg>` elements and every descendant are
//! emitted exactly as they came in.

use lol_html::{RewriteStrSettings, element, rewrite_str};
use regex::Regex;
use std::sync::OnceLock;

/// Attributes of the root `<svg>` element, in source order, names case-preserved.
pub fn root_attributes(markup: &str) -> Vec<(String, String)> {
    let mut attrs: Option<Vec<(String, String)>> = None;
    let result = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("svg", |el| {
                if attrs.is_none() {
                    attrs = Some(
                        el.attributes()
                            .iter()
                            .map(|a| (a.name_preserve_case(), a.value()))
                            .collect(),
                    );
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );
    if let Err(err) = result {
        tracing::debug!(error = %err, "could not read root attributes");
    }
    attrs.unwrap_or_default()
}

/// Joins the root's own classes with the caller's class, whitespace-normalized.
pub fn merge_class(existing: Option<&str>, extra: Option<&str>) -> String {
    existing
        .unwrap_or_default()
        .split_whitespace()
        .chain(extra.unwrap_or_default().split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces every `height` declaration of an inline style with `height: <value>`.
pub fn merge_style_height(existing: Option<&str>, height: &str) -> String {
    let mut decls: Vec<String> = existing
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            let property = d.split(':').next().unwrap_or_default();
            !property.trim().eq_ignore_ascii_case("height")
        })
        .map(str::to_string)
        .collect();
    decls.push(format!("height: {height}"));
    decls.join("; ")
}

fn root_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<svg").expect("valid regex"))
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&value.replace('"', "&quot;"));
    out.push('"');
}

/// Rewrites the root `<svg>` start tag of an already sanitized document.
///
/// - the original `class` is dropped and re-emitted first as `original + merge_class`
///   (omitted when both are empty);
/// - with `forced_height`, the `style` attribute gets its `height` added or overridden;
/// - all other attributes keep their order, name case and values.
///
/// When neither the class nor the style changes, or the markup does not open with the root
/// `<svg>` tag, the markup is returned untouched.
pub fn render_svg(markup: &str, merge_class_name: Option<&str>, forced_height: Option<&str>) -> String {
    if root_open_regex().find(markup).is_none() {
        return markup.to_string();
    }

    let attrs = root_attributes(markup);
    let existing_class = attrs
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("class"))
        .map(|(_, v)| v.as_str());
    let class = merge_class(existing_class, merge_class_name);

    let class_unchanged = match existing_class {
        Some(existing) => existing == class,
        None => class.is_empty(),
    };
    if forced_height.is_none() && class_unchanged {
        return markup.to_string();
    }

    let mut rendered_attrs = String::new();
    if !class.is_empty() {
        push_attribute(&mut rendered_attrs, "class", &class);
    }
    let mut wrote_style = false;
    for (name, value) in &attrs {
        if name.eq_ignore_ascii_case("class") {
            continue;
        }
        match forced_height {
            Some(height) if name.eq_ignore_ascii_case("style") => {
                push_attribute(&mut rendered_attrs, name, &merge_style_height(Some(value), height));
                wrote_style = true;
            }
            _ => push_attribute(&mut rendered_attrs, name, value),
        }
    }
    if let (Some(height), false) = (forced_height, wrote_style) {
        push_attribute(&mut rendered_attrs, "style", &merge_style_height(None, height));
    }

    // Strip the root's attributes with the rewriter, then splice the rebuilt list back in
    // right after `<svg` so names keep their case.
    let mut seen_root = false;
    let result = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("svg", |el| {
                if seen_root {
                    return Ok(());
                }
                seen_root = true;
                for (name, _) in &attrs {
                    el.remove_attribute(name);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    let stripped = match result {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(error = %err, "root rewrite failed; emitting markup unchanged");
            return markup.to_string();
        }
    };
    let Some(open) = root_open_regex().find(&stripped) else {
        return markup.to_string();
    };
    let mut out = String::with_capacity(stripped.len() + rendered_attrs.len());
    out.push_str(&stripped[..open.end()]);
    out.push_str(&rendered_attrs);
    out.push_str(&stripped[open.end()..]);
    out
}
