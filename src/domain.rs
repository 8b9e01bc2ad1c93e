use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const SAMPLE_PLACEHOLDER: &str = "{sample}";
pub const RUN_PLACEHOLDER: &str = "{run}";
pub const CALLER_PLACEHOLDER: &str = "{caller}";
pub const INTERNAL_PLACEHOLDERS: [&str; 3] =
    [SAMPLE_PLACEHOLDER, RUN_PLACEHOLDER, CALLER_PLACEHOLDER];

pub const SOURCE_VIEW: &str = "Source view";
pub const ANALYSIS_VIEW: &str = "Analysis view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Run,
    Tumor,
    Normal,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Run, Role::Normal, Role::Tumor];

    pub fn group_key(&self) -> &'static str {
        match self {
            Role::Run => "run id",
            Role::Tumor => "tumor cimac id",
            Role::Normal => "normal cimac id",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Role::Run => RUN_PLACEHOLDER,
            Role::Tumor | Role::Normal => SAMPLE_PLACEHOLDER,
        }
    }

    // left in the manifest for downstream consumers to fill in
    pub fn token(&self) -> &'static str {
        match self {
            Role::Run => "{run id}",
            Role::Tumor => "{tumor cimac id}",
            Role::Normal => "{normal cimac id}",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Caller {
    #[default]
    Tnscope,
    Tnhaplotyper2,
    Tnsnv,
}

impl Caller {
    pub fn as_str(&self) -> &'static str {
        match self {
            Caller::Tnscope => "tnscope",
            Caller::Tnhaplotyper2 => "tnhaplotyper2",
            Caller::Tnsnv => "tnsnv",
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssayMode {
    #[default]
    Matched,
    TumorOnly,
}

impl AssayMode {
    pub fn from_tumor_only(tumor_only: bool) -> Self {
        if tumor_only {
            AssayMode::TumorOnly
        } else {
            AssayMode::Matched
        }
    }

    pub fn is_tumor_only(&self) -> bool {
        matches!(self, AssayMode::TumorOnly)
    }

    pub fn output_file_name(&self) -> &'static str {
        match self {
            AssayMode::Matched => "wes_output_API.json",
            AssayMode::TumorOnly => "wes_tumor_only_output_API.json",
        }
    }
}

impl fmt::Display for AssayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssayMode::Matched => write!(f, "matched"),
            AssayMode::TumorOnly => write!(f, "tumor-only"),
        }
    }
}
