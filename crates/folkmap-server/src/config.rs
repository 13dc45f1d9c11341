//! Server configuration loaded from environment variables.
//!
//! Every setting has a default; an absent or unparseable variable falls back
//! to it. No config file required.
//!
//! | Variable                   | Default   | Description                               |
//! |----------------------------|-----------|-------------------------------------------|
//! | `FOLKMAP_DATA_DIR`         | `../data` | directory holding the dataset JSON files  |
//! | `FOLKMAP_PORT`             | `8080`    | HTTP listen port                          |
//! | `FOLKMAP_LOG_LEVEL`        | `info`    | tracing filter (trace/debug/info/warn/error) |
//! | `FOLKMAP_MOTIF_METRIC`     | `geo`     | motif ranking metric: `geo` or `manhattan` |
//! | `FOLKMAP_TRADITION_METRIC` | `idf`     | tradition ranking metric: `idf` or `manhattan` |

use folkmap_knn::MetricKind;

/// Runtime configuration for the folkmap server process.
#[derive(Debug)]
pub struct Config {
    /// Directory holding `traditions.json`, `coords.json`, etc.
    pub data_dir: String,

    /// HTTP listen port.
    pub port: u16,

    /// Tracing filter string, e.g. `"folkmap_knn=debug,info"`.
    pub log_level: String,

    pub motif_metric: MetricKind,

    pub tradition_metric: MetricKind,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_dir:         env_str("FOLKMAP_DATA_DIR", "../data"),
            port:             env_parse("FOLKMAP_PORT", 8080),
            log_level:        env_str("FOLKMAP_LOG_LEVEL", "info"),
            motif_metric:     env_parse("FOLKMAP_MOTIF_METRIC", MetricKind::Geo),
            tradition_metric: env_parse("FOLKMAP_TRADITION_METRIC", MetricKind::Idf),
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
