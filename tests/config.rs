use std::fs;
use std::path::Path;

use sprite_patch::config::*;
use sprite_patch::{FillColor, PatchError, Rect};

fn write_job(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("job.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn full_job_file_overrides_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(
        dir.path(),
        r#"{
            "input": "in/button.png",
            "output": "out/button.png",
            "rect": [0, 0, 15, 7],
            "fill": [10, 20, 30]
        }"#,
    );
    let job = PatchJob::from_json_file(&path).unwrap();
    assert_eq!(job.input, Path::new("in/button.png"));
    assert_eq!(job.output, Path::new("out/button.png"));
    assert_eq!(job.rect, Rect::new(0, 0, 15, 7).unwrap());
    assert_eq!(job.fill, FillColor::new(10, 20, 30));
}

#[test]
fn partial_job_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(dir.path(), r#"{ "fill": [0, 0, 0] }"#);
    let job = PatchJob::from_json_file(&path).unwrap();
    assert_eq!(job.input, Path::new(DEFAULT_INPUT));
    assert_eq!(job.output, Path::new(DEFAULT_OUTPUT));
    assert_eq!(job.rect, DEFAULT_RECT);
    assert_eq!(job.fill, FillColor::new(0, 0, 0));
}

#[test]
fn empty_object_is_the_default_job() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(dir.path(), "{}");
    assert_eq!(PatchJob::from_json_file(&path).unwrap(), PatchJob::default());
}

#[test]
fn unknown_field_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(dir.path(), r#"{ "colour": [1, 2, 3] }"#);
    assert!(matches!(
        PatchJob::from_json_file(&path),
        Err(PatchError::ConfigParse { .. })
    ));
}

#[test]
fn inverted_rect_in_job_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(dir.path(), r#"{ "rect": [390, 150, 110, 90] }"#);
    assert!(matches!(
        PatchJob::from_json_file(&path),
        Err(PatchError::ConfigParse { .. })
    ));
}

#[test]
fn missing_job_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PatchJob::from_json_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, PatchError::ConfigIo { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn default_job_round_trips_through_json() {
    let job = PatchJob::default();
    let json = serde_json::to_string(&job).unwrap();
    assert!(json.contains("[110,90,390,150]"));
    assert!(json.contains("[182,202,212]"));
    let back: PatchJob = serde_json::from_str(&json).unwrap();
    assert_eq!(back, job);
}

#[test]
fn differently_spelled_path_to_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("a.png");
    fs::write(&input, b"sprite").unwrap();
    let job = PatchJob {
        input: input.clone(),
        output: dir.path().join(".").join("a.png"),
        ..PatchJob::default()
    };
    assert_ne!(job.input, job.output);
    assert!(matches!(job.validate(), Err(PatchError::SamePath(_))));
}

#[test]
fn distinct_existing_files_validate() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.png"), b"sprite").unwrap();
    fs::write(dir.path().join("b.png"), b"stale").unwrap();
    let job = PatchJob {
        input: dir.path().join("a.png"),
        output: dir.path().join("b.png"),
        ..PatchJob::default()
    };
    assert!(job.validate().is_ok());
}
