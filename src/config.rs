use std::fs;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSource;
use crate::domain::{AssayMode, Caller};
use crate::error::ManifestError;

pub const DEFAULT_CONFIG_FILE: &str = "wes-manifest.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub tumor_only: Option<bool>,
    #[serde(default)]
    pub caller: Option<Caller>,
    #[serde(default)]
    pub catalog: Option<Utf8PathBuf>,
    #[serde(default)]
    pub output_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub tumor_only: Option<bool>,
    pub caller: Option<Caller>,
    pub catalog: Option<Utf8PathBuf>,
    pub output_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub mode: AssayMode,
    pub caller: Caller,
    pub catalog: CatalogSource,
    pub output_dir: Utf8PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            mode: AssayMode::Matched,
            caller: Caller::default(),
            catalog: CatalogSource::Builtin,
            output_dir: Utf8PathBuf::from("."),
        }
    }
}

impl Config {
    // Paths inside a config file are relative to the file, not the working directory.
    pub fn relative_to(self, base_dir: &Utf8Path) -> Self {
        Self {
            catalog: self.catalog.map(|path| base_dir.join(path)),
            output_dir: self.output_dir.map(|path| base_dir.join(path)),
            ..self
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    // A missing default file means defaults; a missing explicit file is an error.
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ManifestError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Self::resolve_config(Config::default(), overrides));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ManifestError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| ManifestError::ConfigParse(err.to_string()))?;
        let base_dir = config_path
            .parent()
            .map(|parent| {
                Utf8PathBuf::from_path_buf(parent.to_path_buf())
                    .map_err(|_| ManifestError::ConfigRead(config_path.clone()))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self::resolve_config(
            config.relative_to(&base_dir),
            overrides,
        ))
    }

    pub fn resolve_config(config: Config, overrides: ConfigOverrides) -> ResolvedConfig {
        let defaults = ResolvedConfig::default();
        let tumor_only = overrides
            .tumor_only
            .or(config.tumor_only)
            .unwrap_or(false);

        ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(defaults.schema_version),
            mode: AssayMode::from_tumor_only(tumor_only),
            caller: overrides.caller.or(config.caller).unwrap_or(defaults.caller),
            catalog: overrides
                .catalog
                .or(config.catalog)
                .map(CatalogSource::File)
                .unwrap_or(defaults.catalog),
            output_dir: overrides
                .output_dir
                .or(config.output_dir)
                .unwrap_or(defaults.output_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default(), ConfigOverrides::default());
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn overrides_win() {
        let config = Config {
            schema_version: None,
            tumor_only: Some(false),
            caller: Some(Caller::Tnsnv),
            catalog: Some(Utf8PathBuf::from("catalog.json")),
            output_dir: Some(Utf8PathBuf::from("out")),
        };
        let overrides = ConfigOverrides {
            tumor_only: Some(true),
            caller: Some(Caller::Tnhaplotyper2),
            catalog: None,
            output_dir: Some(Utf8PathBuf::from("elsewhere")),
        };

        let resolved = ConfigLoader::resolve_config(config, overrides);
        assert_eq!(resolved.mode, AssayMode::TumorOnly);
        assert_eq!(resolved.caller, Caller::Tnhaplotyper2);
        assert_eq!(
            resolved.catalog,
            CatalogSource::File(Utf8PathBuf::from("catalog.json"))
        );
        assert_eq!(resolved.output_dir, Utf8PathBuf::from("elsewhere"));
    }

    #[test]
    fn matched_override_beats_tumor_only_config() {
        let config = Config {
            tumor_only: Some(true),
            ..Config::default()
        };
        let overrides = ConfigOverrides {
            tumor_only: Some(false),
            ..ConfigOverrides::default()
        };

        let resolved = ConfigLoader::resolve_config(config, overrides);
        assert_eq!(resolved.mode, AssayMode::Matched);
    }

    #[test]
    fn relative_paths_follow_config_dir() {
        let config = Config {
            catalog: Some(Utf8PathBuf::from("catalog.json")),
            output_dir: Some(Utf8PathBuf::from("/abs/out")),
            ..Config::default()
        }
        .relative_to(Utf8Path::new("runs/wes"));

        assert_eq!(config.catalog, Some(Utf8PathBuf::from("runs/wes/catalog.json")));
        assert_eq!(config.output_dir, Some(Utf8PathBuf::from("/abs/out")));
    }
}
