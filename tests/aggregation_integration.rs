//! End-to-end aggregation tests over a photo storage tree.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use perchwatch::config::AggregationConfig;
use perchwatch::report::{daily_summary_text, scan_photos, summarize, write_summary_json};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn write_labels(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("labels.txt");
    fs::write(
        &path,
        "11 american-robin (Turdus migratorius)\n12 house-finch (Haemorhous mexicanus)\n",
    )
    .unwrap();
    path
}

/// A modern capture tree: sidecar-described photos under date/visitation
/// directories.
fn write_modern_tree(root: &Path) {
    let dir = root.join("2024-01-15").join("v-aaa");
    fs::create_dir_all(&dir).unwrap();

    fs::write(dir.join("p1.png"), b"png").unwrap();
    fs::write(
        dir.join("p1.json"),
        r#"{
  "photo_id": "p1",
  "visitation_id": "v-aaa",
  "photo_type": "boxed",
  "resolution": {"width": 320, "height": 240},
  "datetime": "2024-01-15T10:00:00",
  "detection": {"score": 0.85},
  "classifications": [{"species": "american-robin", "score": 0.92, "confidence": "high"}],
  "clarity_score": 120.0
}"#,
    )
    .unwrap();

    fs::write(dir.join("p2.png"), b"png").unwrap();
    fs::write(
        dir.join("p2.json"),
        r#"{
  "photo_id": "p2",
  "visitation_id": "v-aaa",
  "photo_type": "boxed",
  "resolution": {"width": 320, "height": 240},
  "datetime": "2024-01-15T10:02:00",
  "detection": {"score": 0.80},
  "classifications": [{"species": "american-robin", "score": 0.88, "confidence": "high"}],
  "clarity_score": 80.0
}"#,
    )
    .unwrap();

    fs::write(dir.join("f1_full.png"), b"png").unwrap();
    fs::write(
        dir.join("f1_full.json"),
        r#"{
  "photo_id": "f1",
  "visitation_id": "v-aaa",
  "photo_type": "full",
  "resolution": {"width": 640, "height": 480},
  "datetime": "2024-01-15T10:00:00",
  "detection": {"score": 0.85}
}"#,
    )
    .unwrap();
}

/// Pre-sidecar storage: metadata encoded in the filenames, no directories
/// per visitation.
fn write_legacy_tree(root: &Path) {
    let dir = root.join("2024-01-15");
    fs::create_dir_all(&dir).unwrap();
    for name in [
        "boxed_2024-01-15_08-00-00_70_house-finch_65.png",
        "boxed_2024-01-15_08-02-00_72_house-finch_60.png",
        "boxed_2024-01-15_08-30-00_75_house-finch_80.png",
        "boxed_2024-01-15_09-00-00_75_american-robin_90.png",
    ] {
        fs::write(dir.join(name), b"png").unwrap();
    }
}

#[test]
fn test_modern_tree_aggregates_into_one_visitation() {
    let root = tempfile::tempdir().unwrap();
    write_modern_tree(root.path());
    let labels = write_labels(root.path());

    let records = scan_photos(root.path(), None, now()).unwrap();
    assert_eq!(records.len(), 3);

    let summaries = summarize(records, Some(&labels), &AggregationConfig::default());
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    assert_eq!(summary.visitation_id, "v-aaa");
    assert_eq!(summary.duration_seconds, 120);
    assert_eq!(summary.species, "american robin");
    assert_eq!(summary.species_count, 1);
    // 85+92+120 beats 80+88+80.
    assert!(summary.best_photo.contains("p1"));
    assert!(summary.full_image.contains("f1_full"));

    let observation = &summary.species_observations[0];
    assert_eq!(observation.count, 2);
    assert_eq!(observation.scientific_name, "Turdus migratorius");
    assert!((observation.avg_confidence - 0.90).abs() < 1e-9);
}

#[test]
fn test_legacy_tree_groups_by_species_and_gap() {
    let root = tempfile::tempdir().unwrap();
    write_legacy_tree(root.path());

    let records = scan_photos(root.path(), None, now()).unwrap();
    assert_eq!(records.len(), 4);

    let summaries = summarize(records, None, &AggregationConfig::default());

    // Two finch photos 2 minutes apart share a visitation; the finch half an
    // hour later and the robin each stand alone.
    assert_eq!(summaries.len(), 3);
    assert!(summaries.iter().all(|s| s.visitation_id.is_empty()));
    assert!(summaries.iter().all(|s| s.full_image.is_empty()));

    // Newest first.
    assert_eq!(summaries[0].species, "american robin");
    assert_eq!(summaries[1].species, "house finch");
    assert_eq!(summaries[2].species, "house finch");
    assert_eq!(summaries[2].duration_seconds, 120);

    // Without a labels file every species resolves to Unknown.
    assert!(
        summaries
            .iter()
            .flat_map(|s| &s.species_observations)
            .all(|o| o.scientific_name == "Unknown")
    );

    let text = daily_summary_text(&summaries);
    assert_eq!(
        text,
        "Today I was visited 3 times. 2 visits from house finch. 1 visit from american robin."
    );
}

#[test]
fn test_date_filter_selects_one_day() {
    let root = tempfile::tempdir().unwrap();
    write_legacy_tree(root.path());
    let other = root.path().join("2024-01-16");
    fs::create_dir_all(&other).unwrap();
    fs::write(
        other.join("boxed_2024-01-16_10-00-00_80_american-robin_85.png"),
        b"png",
    )
    .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
    let records = scan_photos(root.path(), Some(date), now()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].species, "american robin");
}

#[test]
fn test_high_res_duplicate_replaces_base_photo() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("2024-01-15").join("v-bbb");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("abc.png"), b"png").unwrap();
    fs::write(dir.join("abc_hires.png"), b"png").unwrap();
    fs::write(
        dir.join("abc.json"),
        r#"{
  "photo_id": "abc",
  "visitation_id": "v-bbb",
  "photo_type": "boxed",
  "resolution": {"width": 320, "height": 240},
  "datetime": "2024-01-15T11:00:00",
  "detection": {"score": 0.9}
}"#,
    )
    .unwrap();

    let records = scan_photos(root.path(), None, now()).unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].high_res);
    assert!(records[0].path.to_string_lossy().contains("abc_hires"));
    assert_eq!(records[0].visitation_id, "v-bbb");
}

#[test]
fn test_summary_file_round_trips_through_json() {
    let root = tempfile::tempdir().unwrap();
    write_modern_tree(root.path());

    let records = scan_photos(root.path(), None, now()).unwrap();
    let summaries = summarize(records, None, &AggregationConfig::default());

    let output = root.path().join("visitations.json");
    write_summary_json(&output, &summaries).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["visitation_id"], "v-aaa");
    assert_eq!(list[0]["start_datetime"], "2024-01-15T10:00:00");
    assert_eq!(list[0]["species_observations"][0]["count"], 2);
}
