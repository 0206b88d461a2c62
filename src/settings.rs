//! Process settings read from the environment (optionally seeded from `.env`).

use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://paralympics.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DOCS_PATH: &str = "/openapi.json";
pub const DEFAULT_DOCS_UI_PATH: &str = "/docs";

/// Local development origins of the dashboard front-ends.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://127.0.0.1",
    "http://localhost:8050",
    "http://localhost:5000",
    "http://localhost:8501",
];

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    /// Where the generated OpenAPI document is served; `None` disables it.
    pub docs_path: Option<String>,
    /// Where the interactive (Redoc) page is served; `None` disables it.
    pub docs_ui_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            docs_path: Some(DEFAULT_DOCS_PATH.into()),
            docs_ui_path: Some(DEFAULT_DOCS_UI_PATH.into()),
        }
    }
}

impl Settings {
    /// `DATABASE_URL`, `BIND_ADDR`, `CORS_ORIGINS` (comma-separated), `DOCS_PATH` and `DOCS_UI_PATH`
    /// (an empty docs path disables that endpoint).
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, std::net::AddrParseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()?;
        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.cors_origins,
        };
        let docs_path = match lookup("DOCS_PATH") {
            Some(p) => route_path(p),
            None => defaults.docs_path,
        };
        let docs_ui_path = match lookup("DOCS_UI_PATH") {
            Some(p) => route_path(p),
            None => defaults.docs_ui_path,
        };
        Ok(Settings {
            database_url,
            bind_addr,
            cors_origins,
            docs_path,
            docs_ui_path,
        })
    }
}

/// Empty means disabled; a missing leading slash is added.
fn route_path(p: String) -> Option<String> {
    let p = p.trim();
    if p.is_empty() {
        None
    } else if p.starts_with('/') {
        Some(p.to_string())
    } else {
        Some(format!("/{}", p))
    }
}
