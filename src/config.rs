//! Configuration module - upload target and pipeline settings

use anyhow::{anyhow, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Directory uploaded when none is given on the command line
pub const DEFAULT_ROOT_DIR: &str = "./out";

/// Graph store collection endpoint
pub const DEFAULT_ENDPOINT: &str =
    "http://localhost:8890/sparql-graph-crud-auth/?graph-uri=https://synbiohub.org/public";

/// Digest auth credentials for the graph store
pub const DEFAULT_USERNAME: &str = "dba";
pub const DEFAULT_PASSWORD: &str = "dba";

/// Content type sent with every file body
pub const RDF_XML_CONTENT_TYPE: &str = "application/rdf+xml";

/// Maximum number of uploads in flight at once
pub const MAX_CONCURRENT_UPLOADS: usize = 15;

/// Interval between progress reports
pub const REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Delay before resending a request answered with 201
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Optional configuration parameters for Config::new()
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Override the graph store endpoint (library use only, not exposed on the CLI)
    pub endpoint: Option<String>,
    pub dry_run: bool,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub root_dir: PathBuf,
    pub endpoint: Url,
    pub username: String,
    pub password: String,
    pub content_type: &'static str,
    pub max_concurrent: usize,
    pub report_interval: Duration,
    pub retry_delay: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Create a new Config for uploading everything under `root_dir`
    pub fn new(root_dir: impl Into<PathBuf>, options: ConfigOptions) -> Result<Arc<Self>> {
        let root_dir = root_dir.into();
        if root_dir.as_os_str().is_empty() {
            return Err(anyhow!("root directory cannot be empty"));
        }

        let endpoint = options.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = parse_endpoint(endpoint)?;

        Ok(Arc::new(Self {
            root_dir,
            endpoint,
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            content_type: RDF_XML_CONTENT_TYPE,
            max_concurrent: MAX_CONCURRENT_UPLOADS,
            report_interval: REPORT_INTERVAL,
            retry_delay: RETRY_DELAY,
            dry_run: options.dry_run,
        }))
    }
}

/// Parse and validate an endpoint URL (http or https only)
fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| anyhow!("invalid endpoint '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("unsupported endpoint scheme '{}'", other)),
    }
}
