use std::str::FromStr;
use std::sync::OnceLock;

use lim_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "lim-tests",
            log_dir: Some(std::env::temp_dir().join("lim-tests")),
            emit_stderr: true,
            format: std::env::var("LIM_LOG_FORMAT")
                .ok()
                .and_then(|raw| LogFormat::from_str(&raw).ok())
                .unwrap_or_default(),
            default_filter: "debug".to_string(),
        };

        lim_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Wrap paragraphs in a page shaped like a rendered article.
#[allow(dead_code)]
pub fn article(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Article - Wikipedia</title></head>
<body>
<div id="content"><h1 id="firstHeading">Article</h1>
<div id="bodyContent">
<div id="mw-content-text" class="mw-body-content"><div class="mw-parser-output">{body}</div></div>
</div></div>
</body></html>"#
    )
}
