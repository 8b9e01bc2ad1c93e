use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogSource};
use crate::config::ResolvedConfig;
use crate::domain::{AssayMode, Caller, Role, SOURCE_VIEW};
use crate::error::ManifestError;
use crate::manifest::{Manifest, ManifestBuilder};
use crate::output::{Destination, JsonOutput, ManifestWriter};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub mode: AssayMode,
    pub caller: Caller,
    pub destination: Destination,
}

impl BuildOptions {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            mode: config.mode,
            caller: config.caller,
            destination: Destination::Directory(config.output_dir.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub mode: AssayMode,
    pub caller: Caller,
    pub catalog: String,
    pub output_path: Option<String>,
    pub groups: Vec<GroupSummary>,
}

impl BuildResult {
    pub fn group(&self, role: Role) -> Option<&GroupSummary> {
        self.groups.iter().find(|group| group.key == role.group_key())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub entries: usize,
    pub optional: usize,
    pub source_view: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message),
            None => info!("{}", event.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct App {
    catalog: CatalogSource,
}

impl App {
    pub fn new(catalog: CatalogSource) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self, sink: &dyn ProgressSink) -> Result<Catalog, ManifestError> {
        sink.event(ProgressEvent {
            message: format!("phase=Catalog; loading {}", self.catalog.describe()),
            elapsed: None,
        });
        let catalog = self.catalog.load()?;
        debug!(
            sample = catalog.sample.len(),
            run = catalog.run.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn build(
        &self,
        options: &BuildOptions,
        sink: &dyn ProgressSink,
    ) -> Result<BuildResult, ManifestError> {
        let started = Instant::now();
        let catalog = self.catalog(sink)?;

        sink.event(ProgressEvent {
            message: format!("phase=Partition; caller={}", options.caller),
            elapsed: None,
        });
        let matched = ManifestBuilder::new(options.caller).partition(&catalog)?;
        let unfiltered = group_sizes(&matched);

        sink.event(ProgressEvent {
            message: format!("phase=Filter; mode={}", options.mode),
            elapsed: None,
        });
        let manifest = matched.for_assay(options.mode);
        manifest.check_placeholders()?;

        let output_path = match &options.destination {
            Destination::Stdout => {
                JsonOutput::print_manifest(&manifest)
                    .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
                None
            }
            Destination::Directory(dir) => {
                let path = ManifestWriter::write(&manifest, dir, options.mode)?;
                info!(path = %path, "manifest written");
                Some(path.to_string())
            }
            Destination::Discard => None,
        };

        let groups = manifest
            .groups()
            .into_iter()
            .map(|(role, entries)| {
                let before = unfiltered
                    .iter()
                    .find(|(unfiltered_role, _)| *unfiltered_role == role)
                    .map(|(_, count)| *count)
                    .unwrap_or(entries.len());
                GroupSummary {
                    key: role.group_key().to_string(),
                    entries: entries.len(),
                    optional: entries.iter().filter(|entry| entry.optional).count(),
                    source_view: entries
                        .iter()
                        .filter(|entry| entry.file_purpose == SOURCE_VIEW)
                        .count(),
                    dropped: before - entries.len(),
                }
            })
            .collect();

        sink.event(ProgressEvent {
            message: format!("phase=Done; {} entries", manifest.len()),
            elapsed: Some(started.elapsed()),
        });

        Ok(BuildResult {
            mode: options.mode,
            caller: options.caller,
            catalog: self.catalog.describe(),
            output_path,
            groups,
        })
    }
}

fn group_sizes(manifest: &Manifest) -> Vec<(Role, usize)> {
    manifest
        .groups()
        .into_iter()
        .map(|(role, entries)| (role, entries.len()))
        .collect()
}
