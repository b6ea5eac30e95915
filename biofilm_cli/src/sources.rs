//! Telemetry sources: the cloud channel over HTTP, or a JSON file on disk.

use biofilm_config::FeedCfg;
use biofilm_traits::TelemetrySource;
use std::path::PathBuf;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// GETs `url?results=N[&api_key=K]` and returns the body unparsed.
pub struct HttpFeed {
    agent: ureq::Agent,
    url: String,
    api_key: Option<String>,
}

impl HttpFeed {
    pub fn new(cfg: &FeedCfg) -> Self {
        let mut builder =
            ureq::AgentBuilder::new().user_agent(concat!("biofilm/", env!("CARGO_PKG_VERSION")));
        if let Some(ms) = cfg.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        Self {
            agent: builder.build(),
            url: cfg.url.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}

impl TelemetrySource for HttpFeed {
    fn fetch(&mut self, results: usize) -> Result<String, BoxError> {
        let mut req = self
            .agent
            .get(&self.url)
            .query("results", &results.to_string())
            .set("Accept", "application/json");
        if let Some(key) = &self.api_key {
            req = req.query("api_key", key);
        }
        let resp = match req.call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return Err(format!("telemetry store answered HTTP {code}").into());
            }
            Err(ureq::Error::Transport(t)) => return Err(t.to_string().into()),
        };
        let body = resp.into_string()?;
        tracing::debug!(bytes = body.len(), url = %self.url, "feed fetched");
        Ok(body)
    }
}

/// Re-reads the file on every fetch so an external writer can replay a feed.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TelemetrySource for FileFeed {
    fn fetch(&mut self, _results: usize) -> Result<String, BoxError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| format!("read feed file {}: {e}", self.path.display()).into())
    }
}
