use std::fs;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use wes_manifest::app::{App, BuildOptions, ProgressEvent, ProgressSink};
use wes_manifest::catalog::CatalogSource;
use wes_manifest::domain::{AssayMode, Caller, Role};
use wes_manifest::error::ManifestError;
use wes_manifest::manifest::Manifest;
use wes_manifest::output::{Destination, JsonOutput};

#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.messages.lock().unwrap().push(event.message);
    }
}

fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

#[test]
fn build_writes_matched_manifest() {
    let (_guard, dir) = temp_dir();
    let options = BuildOptions {
        mode: AssayMode::Matched,
        caller: Caller::Tnscope,
        destination: Destination::Directory(dir.clone()),
    };
    let sink = RecordingSink::default();

    let result = App::default().build(&options, &sink).unwrap();

    let expected = dir.join("wes_output_API.json");
    assert_eq!(result.output_path.as_deref(), Some(expected.as_str()));
    let content = fs::read_to_string(&expected).unwrap();
    assert!(content.starts_with("{\n    \"run id\": ["));
    let manifest: Manifest = serde_json::from_str(&content).unwrap();
    assert!(manifest.normal.is_some());

    assert_eq!(result.groups.len(), 3);
    assert_eq!(result.group(Role::Run).unwrap().entries, manifest.run.len());
    assert_eq!(result.group(Role::Tumor).unwrap().dropped, 0);

    let messages = sink.messages.lock().unwrap();
    assert!(messages.iter().any(|message| message.starts_with("phase=Filter")));
}

#[test]
fn build_writes_tumor_only_manifest_under_its_own_name() {
    let (_guard, dir) = temp_dir();
    let options = BuildOptions {
        mode: AssayMode::TumorOnly,
        caller: Caller::default(),
        destination: Destination::Directory(dir.join("nested")),
    };

    let result = App::default().build(&options, &JsonOutput).unwrap();

    let expected = dir.join("nested").join("wes_tumor_only_output_API.json");
    assert!(expected.as_std_path().exists());
    assert!(!dir.join("nested").join("wes_output_API.json").as_std_path().exists());

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&expected).unwrap()).unwrap();
    assert!(value.get("normal cimac id").is_none());
    assert_eq!(result.groups.len(), 2);
    assert!(result.group(Role::Normal).is_none());
    assert_eq!(result.group(Role::Run).unwrap().dropped, 21);
    assert_eq!(result.group(Role::Tumor).unwrap().dropped, 2);
}

#[test]
fn dry_run_writes_nothing() {
    let (_guard, dir) = temp_dir();
    let options = BuildOptions {
        mode: AssayMode::Matched,
        caller: Caller::default(),
        destination: Destination::Discard,
    };

    let result = App::default().build(&options, &JsonOutput).unwrap();
    assert!(result.output_path.is_none());
    assert_eq!(fs::read_dir(dir.as_std_path()).unwrap().count(), 0);
}

#[test]
fn invalid_catalog_aborts_before_writing() {
    let (_guard, dir) = temp_dir();
    let catalog = dir.join("catalog.json");
    fs::write(
        &catalog,
        r#"{"sample": [{"file_path": "a/{sample}", "short_descr": "s", "long_descr": "l"}]}"#,
    )
    .unwrap();
    let out = dir.join("out");
    let options = BuildOptions {
        mode: AssayMode::Matched,
        caller: Caller::default(),
        destination: Destination::Directory(out.clone()),
    };

    let err = App::new(CatalogSource::File(catalog))
        .build(&options, &JsonOutput)
        .unwrap_err();
    assert_matches!(err, ManifestError::MissingField { field: "filter_group" });
    assert!(!out.as_std_path().exists());
}
