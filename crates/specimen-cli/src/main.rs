use futures::executor::block_on;
use futures::future::{BoxFuture, FutureExt};
use specimen_core::{
    FetchError, FontDetails, HttpResponse, MaxHeight, RenderOptions, SampleView, SpecimenConfig,
    SvgFetcher, SvgProps, SvgRenderer, SvgView, prepare, render_sample,
};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Specimen(specimen_core::Error),
    /// `--strict` and the view fell back to the placeholder.
    Placeholder(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Specimen(err) => write!(f, "{err}"),
            CliError::Placeholder(reason) => write!(f, "SVG could not be rendered: {reason}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<specimen_core::Error> for CliError {
    fn from(value: specimen_core::Error) -> Self {
        Self::Specimen(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Sanitize,
    Geometry,
    Sample,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    class: Option<String>,
    max_height: Option<MaxHeight>,
    url: Option<String>,
    configs: Vec<String>,
    overrides: Vec<(String, String)>,
    view: SampleView,
    strict: bool,
    pretty: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "specimen-cli\n\
\n\
USAGE:\n\
  specimen-cli [render] [--class <class>] [--max-height <px|css>] [--url <url>] [--config <path>]... [--set <key>=<value>]... [--strict] [--out <path>] [<path>|-]\n\
  specimen-cli sanitize [--config <path>]... [--set <key>=<value>]... [--out <path>] [<path>|-]\n\
  specimen-cli geometry [--pretty] [<path>|-]\n\
  specimen-cli sample [--view pangram|alphabet] [--class <class>] [--max-height <px|css>] [--config <path>]... [--set <key>=<value>]... [--strict] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin (except for `render --url`).\n\
  - render prints the embeddable SVG, or the placeholder when the source cannot be used.\n\
  - --url accepts http(s):// and file:// URLs; relative URLs resolve against fetch.baseUrl\n\
    or the current directory.\n\
  - inline input wins over --url; the URL is then not fetched.\n\
  - sample reads a font details JSON document and renders its sample image.\n\
  - --config files are merged in order; --set overrides one dotted key (e.g. placeholder.text=Oops).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "sanitize" => args.command = Command::Sanitize,
            "geometry" => args.command = Command::Geometry,
            "sample" => args.command = Command::Sample,
            "--strict" => args.strict = true,
            "--pretty" => args.pretty = true,
            "--class" => {
                let Some(class) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.class = Some(class.clone());
            }
            "--max-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.max_height = Some(MaxHeight::from_str(h).unwrap_or_else(|never| match never {}));
            }
            "--url" => {
                let Some(url) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.url = Some(url.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.configs.push(path.clone());
            }
            "--set" => {
                let Some((key, value)) = it.next().and_then(|kv| kv.split_once('=')) else {
                    return Err(CliError::Usage(usage()));
                };
                args.overrides.push((key.to_string(), value.to_string()));
            }
            "--view" => {
                let Some(view) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.view = view.parse().map_err(|_| CliError::Usage(usage()))?;
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(path.clone());
            }
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            other => args.input = Some(other.to_string()),
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

/// Layers every `--config` file in order, then applies `--set key=value` overrides.
///
/// Override values are parsed as JSON when possible (`true`, `12`, `["use"]`) and kept as plain
/// strings otherwise.
fn load_config(paths: &[String], overrides: &[(String, String)]) -> Result<SpecimenConfig, CliError> {
    let mut config = SpecimenConfig::default();
    for path in paths {
        let layer = SpecimenConfig::from_json_str(&std::fs::read_to_string(path)?)?;
        config.deep_merge(layer.as_value());
    }
    for (key, raw) in overrides {
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        config.set_value(key, value);
    }
    Ok(config)
}

fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "svg" => Some("image/svg+xml"),
        "xml" => Some("application/xml"),
        "html" | "htm" => Some("text/html"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// `http(s)://` through a blocking client, `file://` straight from disk.
struct CliFetcher {
    agent: ureq::Agent,
}

impl CliFetcher {
    fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }

    fn fetch_file(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let path = Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| FetchError::InvalidUrl {
                url: url.to_string(),
                message: "not a local file URL".to_string(),
            })?;
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(HttpResponse::new(200, content_type_for_path(&path), body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(HttpResponse::new(404, None, ""))
            }
            Err(err) => Err(FetchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn fetch_http(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let transport = |message: String| FetchError::Transport {
            url: url.to_string(),
            message,
        };
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

impl SvgFetcher for CliFetcher {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, FetchError>> {
        async move {
            tracing::debug!(url, "cli fetch");
            if url.starts_with("file:") {
                self.fetch_file(url)
            } else {
                self.fetch_http(url)
            }
        }
        .boxed()
    }
}

fn render_options(config: &SpecimenConfig) -> Result<RenderOptions, CliError> {
    let options = RenderOptions::from_config(config);
    if options.base_url.is_some() {
        return Ok(options);
    }
    let cwd = std::env::current_dir()?;
    Ok(options.with_base_url(Url::from_directory_path(cwd).ok()))
}

fn finish_view(view: SvgView, strict: bool, out: Option<&str>, reason: impl FnOnce() -> String) -> Result<(), CliError> {
    write_text(&view.to_markup(), out)?;
    if strict && view.is_placeholder() {
        return Err(CliError::Placeholder(reason()));
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args.configs, &args.overrides)?;
    let options = render_options(&config)?;

    match args.command {
        Command::Render => {
            let timeout = config
                .get_f64("fetch.timeoutSecs")
                .filter(|s| s.is_finite() && *s > 0.0)
                .and_then(|s| Duration::try_from_secs_f64(s).ok())
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
            let fetcher = CliFetcher::new(timeout);

            let inline_svg = if args.url.is_none() || args.input.is_some() {
                Some(read_input(args.input.as_deref())?)
            } else {
                None
            };
            let props = SvgProps {
                inline_svg,
                source_url: args.url.clone(),
                merge_class: args.class.clone(),
                max_height: args.max_height.clone(),
            };

            let mut renderer = SvgRenderer::new(options);
            block_on(renderer.load(&fetcher, props));
            let reason = match renderer.state() {
                specimen_core::RenderState::Failed(err) => err.to_string(),
                other => other.phase().to_string(),
            };
            finish_view(renderer.view(), args.strict, args.out.as_deref(), || reason)
        }
        Command::Sanitize => {
            let text = read_input(args.input.as_deref())?;
            let prepared = prepare(&text, &options.policy)?;
            write_text(prepared.markup(), args.out.as_deref())
        }
        Command::Geometry => {
            let text = read_input(args.input.as_deref())?;
            let view_box = prepare(&text, &options.policy)?.view_box();
            let json = if args.pretty {
                serde_json::to_string_pretty(&view_box)?
            } else {
                serde_json::to_string(&view_box)?
            };
            println!("{json}");
            Ok(())
        }
        Command::Sample => {
            let text = read_input(args.input.as_deref())?;
            let details: FontDetails = serde_json::from_str(&text)?;
            let view = render_sample(
                details.images(),
                args.view,
                args.class.as_deref(),
                args.max_height.clone(),
                options,
            );
            finish_view(view, args.strict, args.out.as_deref(), || {
                format!("{} {} sample is not a usable SVG", details.document_title(), args.view)
            })
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ (CliError::Placeholder(_) | CliError::Specimen(_))) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("specimen-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_render_flags() {
        let args = parse_args(&argv(&[
            "render",
            "--class",
            "w-full",
            "--max-height",
            "230",
            "--strict",
            "logo.svg",
        ]))
        .expect("args");
        assert!(matches!(args.command, Command::Render));
        assert_eq!(args.class.as_deref(), Some("w-full"));
        assert_eq!(args.max_height, Some(MaxHeight::Pixels(230.0)));
        assert!(args.strict);
        assert_eq!(args.input.as_deref(), Some("logo.svg"));
    }

    #[test]
    fn rejects_unknown_flags_and_views() {
        assert!(matches!(parse_args(&argv(&["--nope"])), Err(CliError::Usage(_))));
        assert!(matches!(
            parse_args(&argv(&["sample", "--view", "waterfall"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(parse_args(&argv(&["--class"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn content_types_follow_extensions() {
        assert_eq!(content_type_for_path(Path::new("a/logo.SVG")), Some("image/svg+xml"));
        assert_eq!(content_type_for_path(Path::new("a/page.html")), Some("text/html"));
        assert_eq!(content_type_for_path(Path::new("a/noext")), None);
    }

    #[test]
    fn parses_repeated_configs_and_overrides() {
        let args = parse_args(&argv(&[
            "--config",
            "base.json",
            "--config",
            "site.json",
            "--set",
            "placeholder.text=No preview",
            "--set",
            "sanitizer.KEEP_CONTENT=false",
        ]))
        .expect("args");
        assert_eq!(args.configs, vec!["base.json", "site.json"]);
        assert_eq!(
            args.overrides,
            vec![
                ("placeholder.text".to_string(), "No preview".to_string()),
                ("sanitizer.KEEP_CONTENT".to_string(), "false".to_string()),
            ]
        );
        assert!(matches!(parse_args(&argv(&["--set", "novalue"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn config_layers_merge_then_overrides_apply() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("base.json");
        let site = tmp.path().join("site.json");
        std::fs::write(
            &base,
            r#"{ "sanitizer": { "KEEP_CONTENT": true, "FORBID_TAGS": ["use"] }, "fetch": { "timeoutSecs": 5 } }"#,
        )
        .expect("write base");
        std::fs::write(&site, r#"{ "sanitizer": { "KEEP_CONTENT": false } }"#).expect("write site");

        let config = load_config(
            &[
                base.to_string_lossy().into_owned(),
                site.to_string_lossy().into_owned(),
            ],
            &[
                ("fetch.timeoutSecs".to_string(), "12".to_string()),
                ("placeholder.text".to_string(), "No preview".to_string()),
            ],
        )
        .expect("config");

        assert_eq!(config.get_bool("sanitizer.KEEP_CONTENT"), Some(false));
        assert_eq!(config.get_lowercase_list("sanitizer.FORBID_TAGS"), vec!["use".to_string()]);
        assert_eq!(config.get_f64("fetch.timeoutSecs"), Some(12.0));
        assert_eq!(config.get_str("placeholder.text"), Some("No preview"));
    }
}
