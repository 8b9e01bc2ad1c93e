use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::app::{BuildResult, ProgressEvent, ProgressSink};
use crate::catalog::Catalog;
use crate::domain::AssayMode;
use crate::error::ManifestError;
use crate::manifest::Manifest;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Directory(Utf8PathBuf),
    Discard,
}

pub struct ManifestWriter;

impl ManifestWriter {
    pub fn to_json<T: Serialize>(value: &T) -> Result<String, ManifestError> {
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value
            .serialize(&mut serializer)
            .map_err(|err| ManifestError::Serialize(err.to_string()))?;
        buf.push(b'\n');
        String::from_utf8(buf).map_err(|err| ManifestError::Serialize(err.to_string()))
    }

    pub fn write(
        manifest: &Manifest,
        dir: &Utf8Path,
        mode: AssayMode,
    ) -> Result<Utf8PathBuf, ManifestError> {
        let json = Self::to_json(manifest)?;
        fs::create_dir_all(dir.as_std_path())
            .map_err(|err| ManifestError::Filesystem(format!("create {dir}: {err}")))?;

        let path = dir.join(mode.output_file_name());
        let mut temp = tempfile::Builder::new()
            .prefix("wes-manifest")
            .tempfile_in(dir.as_std_path())
            .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        temp.write_all(json.as_bytes())
            .map_err(|err| ManifestError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| ManifestError::Filesystem(format!("persist {path}: {err}")))?;
        Ok(path)
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_manifest(manifest: &Manifest) -> io::Result<()> {
        Self::print_json(manifest)
    }

    pub fn print_build(result: &BuildResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_catalog(catalog: &Catalog) -> io::Result<()> {
        Self::print_json(catalog)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = ManifestWriter::to_json(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.flush()
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}
