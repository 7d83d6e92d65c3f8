use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("specimen-cli"))
}

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path.to_string_lossy().into_owned()
}

fn file_url(path: &str) -> String {
    url::Url::from_file_path(path)
        .expect("absolute path")
        .to_string()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run specimen-cli");
    assert!(
        output.status.success(),
        "specimen-cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

#[test]
fn render_merges_class_into_inline_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write(
        tmp.path(),
        "logo.svg",
        "<svg viewBox='0 0 100 50'><path d='M0 0'/></svg>",
    );

    let out = stdout_of(cli().args(["render", "--class", "w-full", &input]));
    assert_eq!(
        out,
        r#"<svg class="w-full" viewBox="0 0 100 50"><path d='M0 0'/></svg>"#
    );
}

#[test]
fn render_fetches_file_urls_and_forces_height() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write(
        tmp.path(),
        "logo.svg",
        r#"<svg viewBox="0 0 200 100" onload="alert(1)"><script>x()</script></svg>"#,
    );
    let out_path = tmp.path().join("out.svg");

    cli()
        .args([
            "render",
            "--url",
            &file_url(&input),
            "--max-height",
            "230",
            "--out",
            out_path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let out = fs::read_to_string(&out_path).expect("read output");
    assert_eq!(
        out,
        r#"<svg viewBox="0 0 200 100" style="height: 230px"></svg>"#
    );
}

#[test]
fn missing_file_url_renders_placeholder_and_fails_when_strict() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("missing.svg");
    let url = file_url(missing.to_string_lossy().as_ref());

    let out = stdout_of(cli().args(["render", "--class", "h-8", "--url", &url]));
    assert_eq!(out, r#"<div class="h-8">Error loading SVG</div>"#);

    cli()
        .args(["render", "--strict", "--url", &url])
        .assert()
        .code(3);
}

#[test]
fn render_rejects_non_svg_with_placeholder_from_config() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write(tmp.path(), "page.html", "<div>not svg</div>");
    let config = write(
        tmp.path(),
        "config.json",
        r#"{ "placeholder": { "text": "No preview" } }"#,
    );

    let out = stdout_of(cli().args(["render", "--config", &config, &input]));
    assert_eq!(out, "<div>No preview</div>");
}

#[test]
fn sanitize_and_geometry_commands() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write(
        tmp.path(),
        "logo.svg",
        r#"<svg viewBox="0, 0, 40, 20"><g onclick="x()"/></svg>"#,
    );

    let out = stdout_of(cli().args(["sanitize", &input]));
    assert!(out.starts_with("<svg"));
    assert!(!out.contains("onclick"));

    let out = stdout_of(cli().args(["geometry", &input]));
    let value: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "minX": 0.0, "minY": 0.0, "width": 40.0, "height": 20.0 })
    );

    let bare = write(tmp.path(), "bare.svg", "<svg></svg>");
    let out = stdout_of(cli().args(["geometry", &bare]));
    assert_eq!(out.trim(), "null");

    let not_svg = write(tmp.path(), "x.txt", "hello");
    cli().args(["sanitize", &not_svg]).assert().code(3);
}

#[test]
fn sample_renders_font_details_image() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let details = write(
        tmp.path(),
        "font.json",
        r#"{
          "idFont": 7,
          "idFamily": "7",
          "name": "Inter",
          "url": "/font/7",
          "price": null,
          "totalFonts": 18,
          "foundry": { "name": "Rasmus" },
          "images": {
            "alphabet": { "svg": "<svg viewBox='0 0 10 10' id='alpha'></svg>", "width": 10, "height": 10 },
            "pangram": { "svg": "<svg viewBox='0 0 30 10' id='pan'></svg>", "width": 30, "height": 10 }
          }
        }"#,
    );

    let out = stdout_of(cli().args(["sample", "--class", "w-full", &details]));
    assert!(out.contains("id='pan'") || out.contains(r#"id="pan""#), "{out}");
    assert!(out.starts_with(r#"<svg class="w-full""#), "{out}");

    let out = stdout_of(cli().args(["sample", "--view", "alphabet", &details]));
    assert!(out.contains("alpha"), "{out}");
}

#[test]
fn unknown_flag_prints_usage() {
    cli().arg("--bogus").assert().code(2);
}

#[test]
fn set_overrides_layer_on_top_of_config_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write(tmp.path(), "page.html", "<div>not svg</div>");
    let config = write(
        tmp.path(),
        "config.json",
        r#"{ "placeholder": { "text": "No preview" } }"#,
    );

    let out = stdout_of(cli().args([
        "render",
        "--config",
        &config,
        "--set",
        "placeholder.text=Sample unavailable",
        &input,
    ]));
    assert_eq!(out, "<div>Sample unavailable</div>");
}
