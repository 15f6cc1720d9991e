use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audit: AuditConfig,
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub scenarios: ScenariosConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AuditConfig {
    /// Text-generation endpoint accepting `POST {"prompt": ...}`
    pub endpoint_url: String,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    pub nats_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory of the best-effort transcript mirror
    pub transcript_cache_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct ScenariosConfig {
    /// Scenario catalog JSON
    pub path: String,
}

impl Config {
    /// Load `path` (any format the `config` crate detects from the extension),
    /// overridden by `PRACTICE_AUDIT__SECTION__KEY` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("PRACTICE_AUDIT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
