use serde::{Deserialize, Serialize};

use crate::scoring::Category;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Whether a thermal sensor is connected. Selects the weight policy and
    /// whether the thermal source is contacted at all.
    #[serde(default)]
    pub thermal_enabled: bool,

    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Where the inference services live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Scheme and host shared by every source, e.g. "http://192.168.1.20"
    #[serde(default = "default_host")]
    pub host: String,

    /// Per-source timeout, humantime format ("10s", "1500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Timeout for each /health probe
    #[serde(default = "default_health_timeout")]
    pub health_timeout: String,

    /// Extra attempts after a connection failure (0 = no retry)
    #[serde(default)]
    pub retries: u32,

    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            timeout: default_timeout(),
            health_timeout: default_health_timeout(),
            retries: 0,
            sources: SourcesConfig::default(),
        }
    }
}

/// Resolved endpoint of every source.
///
/// Each entry in the file may set any subset of `port`, `path` and `method`;
/// the rest comes from that category's own default, so overriding thermal's
/// port keeps it on `GET /read`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "SourcesFile")]
pub struct SourcesConfig {
    pub skin: SourceEndpoint,
    pub posture: SourceEndpoint,
    pub eyes: SourceEndpoint,
    pub thermal: SourceEndpoint,
}

impl SourcesConfig {
    pub fn get(&self, category: Category) -> &SourceEndpoint {
        match category {
            Category::Skin => &self.skin,
            Category::Posture => &self.posture,
            Category::Eyes => &self.eyes,
            Category::Thermal => &self.thermal,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            skin: default_skin(),
            posture: default_posture(),
            eyes: default_eyes(),
            thermal: default_thermal(),
        }
    }
}

/// `sources:` section as written in the file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourcesFile {
    #[serde(default)]
    skin: PartialEndpoint,
    #[serde(default)]
    posture: PartialEndpoint,
    #[serde(default)]
    eyes: PartialEndpoint,
    #[serde(default)]
    thermal: PartialEndpoint,
}

impl From<SourcesFile> for SourcesConfig {
    fn from(file: SourcesFile) -> Self {
        Self {
            skin: file.skin.resolve(default_skin()),
            posture: file.posture.resolve(default_posture()),
            eyes: file.eyes.resolve(default_eyes()),
            thermal: file.thermal.resolve(default_thermal()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialEndpoint {
    port: Option<u16>,
    path: Option<String>,
    method: Option<HttpMethod>,
}

impl PartialEndpoint {
    fn resolve(self, default: SourceEndpoint) -> SourceEndpoint {
        SourceEndpoint {
            port: self.port.unwrap_or(default.port),
            path: self.path.unwrap_or(default.path),
            method: self.method.unwrap_or(default.method),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEndpoint {
    pub port: u16,
    pub path: String,
    pub method: HttpMethod,
}

impl SourceEndpoint {
    fn new(port: u16, path: &str, method: HttpMethod) -> Self {
        Self {
            port,
            path: path.to_string(),
            method,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

fn default_host() -> String {
    "http://127.0.0.1".to_string()
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_health_timeout() -> String {
    "2s".to_string()
}

fn default_skin() -> SourceEndpoint {
    SourceEndpoint::new(8003, "/analyze-live", HttpMethod::Post)
}

fn default_posture() -> SourceEndpoint {
    SourceEndpoint::new(8004, "/analyze-live", HttpMethod::Post)
}

fn default_eyes() -> SourceEndpoint {
    SourceEndpoint::new(8005, "/analyze-live", HttpMethod::Post)
}

fn default_thermal() -> SourceEndpoint {
    SourceEndpoint::new(8006, "/read", HttpMethod::Get)
}
