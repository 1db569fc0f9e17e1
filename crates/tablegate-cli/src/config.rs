use serde::Deserialize;
use std::path::Path;
use tablegate::EngineConfig;

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load `config_path`; a missing file yields the defaults.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Self {
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {e}", config_path.display())
        })?;
        let file = Self::parse(&raw).map_err(|e| {
            anyhow::anyhow!("failed to parse config file {}: {e}", config_path.display())
        })?;

        Ok(Self { file })
    }

    fn parse(raw: &str) -> anyhow::Result<ConfigFile> {
        let file: ConfigFile = toml::from_str(raw)?;
        if file.engine.max_page_size == Some(0) {
            anyhow::bail!("engine.max_page_size must be greater than 0");
        }
        Ok(file)
    }

    pub fn engine(&self) -> EngineConfig {
        self.file.engine.clone()
    }

    pub fn format(&self) -> OutputFormat {
        self.file.output.format
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
