use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

const BUILTIN_CATALOG: &str = include_str!("../data/wes_catalog.json");

// Every field is optional here; ManifestEntry::try_from decides what is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileTemplate {
    #[serde(
        rename = "file_path",
        alias = "file_path_template",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub path_template: Option<String>,
    #[serde(
        rename = "short_descr",
        alias = "short_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,
    #[serde(
        rename = "long_descr",
        alias = "long_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(
        rename = "tumor_only_assay",
        alias = "tumor_only_assay_applicable",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tumor_only_assay: Option<bool>,
}

impl FileTemplate {
    pub fn new(
        path_template: impl Into<String>,
        short_description: impl Into<String>,
        long_description: impl Into<String>,
        filter_group: impl Into<String>,
    ) -> Self {
        Self {
            path_template: Some(path_template.into()),
            short_description: Some(short_description.into()),
            long_description: Some(long_description.into()),
            filter_group: Some(filter_group.into()),
            ..Self::default()
        }
    }

    pub fn with_file_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.file_purpose = Some(purpose.into());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    pub fn with_tumor_only_assay(mut self, applicable: bool) -> Self {
        self.tumor_only_assay = Some(applicable);
        self
    }

    pub fn expand(&self, placeholder: &str, replacement: &str) -> FileTemplate {
        let mut expanded = self.clone();
        expanded.path_template = self
            .path_template
            .as_ref()
            .map(|path| path.replace(placeholder, replacement));
        expanded
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub sample: Vec<FileTemplate>,
    #[serde(default)]
    pub run: Vec<FileTemplate>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|err| ManifestError::CatalogParse(err.to_string()))
    }

    pub fn from_path(path: &Utf8Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| ManifestError::CatalogRead(path.as_std_path().to_path_buf()))?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.sample.len() + self.run.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample.is_empty() && self.run.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    #[default]
    Builtin,
    File(Utf8PathBuf),
}

impl CatalogSource {
    pub fn load(&self) -> Result<Catalog, ManifestError> {
        match self {
            CatalogSource::Builtin => Catalog::builtin(),
            CatalogSource::File(path) => Catalog::from_path(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Builtin => "builtin".to_string(),
            CatalogSource::File(path) => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_does_not_touch_source_or_descriptions() {
        let template = FileTemplate::new(
            "analysis/{sample}/{sample}.txt",
            "about {sample}",
            "long",
            "",
        );
        let expanded = template.expand("{sample}", "{tumor cimac id}");

        assert_eq!(
            template.path_template.as_deref(),
            Some("analysis/{sample}/{sample}.txt")
        );
        assert_eq!(
            expanded.path_template.as_deref(),
            Some("analysis/{tumor cimac id}/{tumor cimac id}.txt")
        );
        assert_eq!(expanded.short_description.as_deref(), Some("about {sample}"));
    }

    #[test]
    fn expand_missing_placeholder_is_noop() {
        let template = FileTemplate::new("analysis/report.tar.gz", "s", "l", "report");
        assert_eq!(template.expand("{run}", "{run id}"), template);
    }

    #[test]
    fn expand_without_path_keeps_none() {
        let template = FileTemplate::default();
        assert_eq!(template.expand("{run}", "{run id}").path_template, None);
    }

    #[test]
    fn parse_legacy_and_long_keys() {
        let catalog = Catalog::from_json(
            r#"{
                "sample": [{"file_path": "a/{sample}", "short_descr": "s", "long_descr": "l", "filter_group": "g"}],
                "run": [{"file_path_template": "b/{run}", "short_description": "s", "long_description": "l",
                         "filter_group": "", "tumor_only_assay_applicable": false}]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.sample[0].path_template.as_deref(), Some("a/{sample}"));
        assert_eq!(catalog.run[0].short_description.as_deref(), Some("s"));
        assert_eq!(catalog.run[0].tumor_only_assay, Some(false));
        assert_eq!(catalog.run[0].optional, None);
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.sample.len(), 9);
        assert_eq!(catalog.run.len(), 37);
    }
}
