//! Loader integration: real directories on disk, candidate probing, and the failure page.
//!
//! Run with: `cargo test -p tianqi_core --test loader_test`

use std::path::Path;
use tianqi_core::model::{CHARACTER_FILE, PROJECTS_FILE, REPORTS_FILE};
use tianqi_core::page::placeholder_count;
use tianqi_core::{
    failure_message, load_from_candidates, load_snapshot, render_failure_page, DirSource,
    DocumentSource, Layout, LoadError, Theme,
};

const CHARACTER: &str = r#"{"generatedAt": "2026-10-12T21:30:00+08:00", "character": {"level": 3}}"#;
const REPORTS: &str = r#"{"reports": [{"date": "2026-10-12", "dayOfWeek": "Monday"}]}"#;
const PROJECTS: &str = r#"{"summary": {"total": 0}, "projects": []}"#;

fn write_docs(dir: &Path, character: Option<&str>) {
    if let Some(body) = character {
        std::fs::write(dir.join(CHARACTER_FILE), body).expect("write character");
    }
    std::fs::write(dir.join(REPORTS_FILE), REPORTS).expect("write reports");
    std::fs::write(dir.join(PROJECTS_FILE), PROJECTS).expect("write projects");
}

#[tokio::test]
async fn loads_snapshot_from_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_docs(dir.path(), Some(CHARACTER));

    let snap = load_snapshot(&DirSource::new(dir.path()))
        .await
        .expect("load snapshot");
    assert_eq!(snap.character.character.level, 3);
    assert_eq!(snap.reports.reports[0].day_of_week, "Monday");
}

#[tokio::test]
async fn missing_character_document_is_a_404() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_docs(dir.path(), None);

    let err = load_snapshot(&DirSource::new(dir.path()))
        .await
        .expect_err("load must fail");
    match &err {
        LoadError::Status { document, status } => {
            assert_eq!(document, CHARACTER_FILE);
            assert_eq!(*status, 404);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The failure page carries the message in every placeholder and nothing rendered.
    let layout = Layout::default();
    let msg = failure_message(&err.to_string());
    let html = render_failure_page("TIANQI", Theme::Pixel, &layout, &msg);
    assert_eq!(
        html.matches("❌ Failed to load data: failed to load character-data.json")
            .count(),
        placeholder_count(&layout)
    );
    assert!(!html.contains("LV."));
}

#[tokio::test]
async fn first_complete_candidate_wins() {
    let broken = tempfile::tempdir().expect("create temp dir");
    write_docs(broken.path(), None);
    let good = tempfile::tempdir().expect("create temp dir");
    write_docs(good.path(), Some(CHARACTER));

    let sources: Vec<Box<dyn DocumentSource>> = vec![
        Box::new(DirSource::new(broken.path())),
        Box::new(DirSource::new(good.path())),
    ];
    let snap = load_from_candidates(&sources).await.expect("second base loads");
    assert_eq!(snap.character.character.level, 3);
}

#[tokio::test]
async fn all_candidates_failing_reports_the_last_error() {
    let bad_json = tempfile::tempdir().expect("create temp dir");
    write_docs(bad_json.path(), Some("{\"character\": "));
    let missing = tempfile::tempdir().expect("create temp dir");

    let sources: Vec<Box<dyn DocumentSource>> = vec![
        Box::new(DirSource::new(bad_json.path())),
        Box::new(DirSource::new(missing.path())),
    ];
    let err = load_from_candidates(&sources).await.expect_err("all fail");
    assert!(matches!(err, LoadError::Status { status: 404, .. }), "got {err}");

    let none: Vec<Box<dyn DocumentSource>> = Vec::new();
    let err = load_from_candidates(&none).await.expect_err("no candidates");
    assert!(matches!(err, LoadError::NoCandidates));
}

#[tokio::test]
async fn bundled_sample_data_loads() {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
    let snap = load_snapshot(&DirSource::new(data)).await.expect("sample data");
    let names: Vec<&str> = snap.character.skills.categories.iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["Engineering", "Data", "Writing"]);
    assert_eq!(snap.reports.reports.len(), 2);
    assert_eq!(snap.projects.projects.len(), 4);
}
