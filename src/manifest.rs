use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, FileTemplate};
use crate::domain::{ANALYSIS_VIEW, AssayMode, CALLER_PLACEHOLDER, Caller, Role};
use crate::error::ManifestError;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("placeholder pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file_path_template: String,
    pub short_description: String,
    pub long_description: String,
    pub filter_group: String,
    pub file_purpose: String,
    pub optional: bool,
    pub tumor_only_assay: bool,
}

impl ManifestEntry {
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER_RE
            .find_iter(&self.file_path_template)
            .map(|found| found.as_str())
            .collect()
    }
}

impl TryFrom<FileTemplate> for ManifestEntry {
    type Error = ManifestError;

    fn try_from(template: FileTemplate) -> Result<Self, Self::Error> {
        let FileTemplate {
            path_template,
            short_description,
            long_description,
            filter_group,
            file_purpose,
            optional,
            tumor_only_assay,
        } = template;

        Ok(Self {
            file_path_template: path_template.ok_or(ManifestError::MissingField {
                field: "path_template",
            })?,
            short_description: short_description.ok_or(ManifestError::MissingField {
                field: "short_description",
            })?,
            long_description: long_description.ok_or(ManifestError::MissingField {
                field: "long_description",
            })?,
            filter_group: filter_group.ok_or(ManifestError::MissingField {
                field: "filter_group",
            })?,
            file_purpose: file_purpose.unwrap_or_else(|| ANALYSIS_VIEW.to_string()),
            optional: optional.unwrap_or(false),
            tumor_only_assay: tumor_only_assay.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "run id")]
    pub run: Vec<ManifestEntry>,
    #[serde(
        rename = "normal cimac id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub normal: Option<Vec<ManifestEntry>>,
    #[serde(rename = "tumor cimac id")]
    pub tumor: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn group(&self, role: Role) -> Option<&[ManifestEntry]> {
        match role {
            Role::Run => Some(&self.run),
            Role::Normal => self.normal.as_deref(),
            Role::Tumor => Some(&self.tumor),
        }
    }

    pub fn groups(&self) -> Vec<(Role, &[ManifestEntry])> {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.group(role).map(|entries| (role, entries)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups().iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn for_assay(self, mode: AssayMode) -> Manifest {
        match mode {
            AssayMode::Matched => self,
            AssayMode::TumorOnly => Manifest {
                run: retain_tumor_only(self.run),
                normal: None,
                tumor: retain_tumor_only(self.tumor),
            },
        }
    }

    // Fails on the first path carrying a placeholder other than its group's token.
    pub fn check_placeholders(&self) -> Result<(), ManifestError> {
        for (role, entries) in self.groups() {
            for entry in entries {
                if let Some(placeholder) = entry
                    .placeholders()
                    .into_iter()
                    .find(|placeholder| *placeholder != role.token())
                {
                    return Err(ManifestError::UnresolvedPlaceholder {
                        path: entry.file_path_template.clone(),
                        placeholder: placeholder.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn retain_tumor_only(entries: Vec<ManifestEntry>) -> Vec<ManifestEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.tumor_only_assay)
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestBuilder {
    caller: Caller,
}

impl ManifestBuilder {
    pub fn new(caller: Caller) -> Self {
        Self { caller }
    }

    pub fn partition(&self, catalog: &Catalog) -> Result<Manifest, ManifestError> {
        let run = catalog
            .run
            .iter()
            .map(|template| {
                let expanded = template
                    .expand(Role::Run.placeholder(), Role::Run.token())
                    .expand(CALLER_PLACEHOLDER, self.caller.as_str());
                ManifestEntry::try_from(expanded)
            })
            .collect::<Result<Vec<_>, ManifestError>>()?;

        let normal = build_sample_group(&catalog.sample, Role::Normal)?;
        let tumor = build_sample_group(&catalog.sample, Role::Tumor)?;

        Ok(Manifest {
            run,
            normal: Some(normal),
            tumor,
        })
    }

    pub fn build(&self, catalog: &Catalog, mode: AssayMode) -> Result<Manifest, ManifestError> {
        Ok(self.partition(catalog)?.for_assay(mode))
    }
}

fn build_sample_group(
    templates: &[FileTemplate],
    role: Role,
) -> Result<Vec<ManifestEntry>, ManifestError> {
    templates
        .iter()
        .map(|template| ManifestEntry::try_from(template.expand(role.placeholder(), role.token())))
        .collect()
}
