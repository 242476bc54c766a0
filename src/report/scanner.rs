//! Photo storage tree scanning.
//!
//! Walks a storage root laid out as `<root>/<date>/<visitation_id>/<file>`
//! (with legacy flat trees tolerated), reconstructs a record per photo, and
//! applies the calendar-date filter. When a photo exists in both standard
//! and high-resolution form, only the high-resolution duplicate is kept.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::constants::storage::{DATE_FORMAT, HIGH_RES_SUFFIX, PHOTO_EXTENSION};
use crate::error::{Error, Result};

use super::{PhotoRecord, parse_photo};

/// Scan a photo storage tree into records.
///
/// Records with no embedded visitation id adopt their parent directory name
/// as the id, following the storage layout convention. `date` restricts the
/// scan to one calendar day. `now` is the timestamp fallback for files whose
/// name carries no parseable datetime. Unreadable subdirectories are logged
/// and skipped, so one bad directory never sinks the rest of the tree.
///
/// # Errors
///
/// Returns an error if the storage root itself cannot be read.
pub fn scan_photos(
    root: &Path,
    date: Option<NaiveDate>,
    now: NaiveDateTime,
) -> Result<Vec<PhotoRecord>> {
    let mut files = Vec::new();
    collect_photo_files(root, &mut files)?;
    let files = prefer_high_res(files);

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let mut record = parse_photo(&path, now);
        if record.visitation_id.is_empty()
            && let Some(id) = directory_visitation_id(root, &path)
        {
            record.visitation_id = id;
        }
        if matches_date_filter(root, &record, date) {
            records.push(record);
        }
    }

    debug!(
        "Scanned {} photo records under {}",
        records.len(),
        root.display()
    );
    Ok(records)
}

/// Collect photo files from the scan root.
///
/// Only the root read is fatal; everything below it is best-effort.
fn collect_photo_files(root: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(root).map_err(|e| Error::StorageScan {
        path: root.to_path_buf(),
        source: e,
    })?;
    walk_entries(root, entries, files);
    Ok(())
}

/// Recursively walk directory entries, warning and skipping on read errors.
fn walk_entries(dir: &Path, entries: std::fs::ReadDir, files: &mut Vec<PathBuf>) {
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };

        if path.is_dir() {
            match std::fs::read_dir(&path) {
                Ok(nested) => walk_entries(&path, nested, files),
                Err(e) => warn!("Skipping unreadable photo directory {}: {e}", path.display()),
            }
        } else if is_photo_file(&path) {
            files.push(path);
        }
    }
}

/// Check if a file is a photo.
fn is_photo_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new(PHOTO_EXTENSION)))
}

/// Collapse standard/high-res duplicates, keeping the high-res file.
///
/// Two files share a logical identity when they sit in the same directory
/// and their stems differ only by the high-res suffix. The result is sorted
/// so downstream output does not depend on filesystem iteration order.
fn prefer_high_res(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut chosen: HashMap<(PathBuf, String), PathBuf> = HashMap::new();

    for path in files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let high_res = stem.ends_with(HIGH_RES_SUFFIX);
        let base = stem.strip_suffix(HIGH_RES_SUFFIX).unwrap_or(&stem);
        let key = (
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
            base.to_string(),
        );

        match chosen.entry(key) {
            Entry::Occupied(mut existing) => {
                if high_res {
                    existing.insert(path);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
        }
    }

    let mut kept: Vec<PathBuf> = chosen.into_values().collect();
    kept.sort();
    kept
}

/// Visitation id implied by the photo's parent directory, if any.
///
/// The scan root itself and date directories never count as ids.
fn directory_visitation_id(root: &Path, path: &Path) -> Option<String> {
    let parent = path.parent()?;
    if parent == root {
        return None;
    }
    let name = parent.file_name()?.to_str()?;
    if NaiveDate::parse_from_str(name, DATE_FORMAT).is_ok() {
        return None;
    }
    Some(name.to_string())
}

fn matches_date_filter(root: &Path, record: &PhotoRecord, date: Option<NaiveDate>) -> bool {
    let Some(filter) = date else {
        return true;
    };
    // Files under a date directory filter by that directory; flat legacy
    // trees fall back to the record timestamp.
    match date_directory(root, &record.path) {
        Some(dir_date) => dir_date == filter,
        None => record.timestamp.date() == filter,
    }
}

/// Date encoded in the first path component under the scan root, if any.
fn date_directory(root: &Path, path: &Path) -> Option<NaiveDate> {
    let rel = path.strip_prefix(root).ok()?;
    let first = rel.components().next()?;
    let name = first.as_os_str().to_str()?;
    NaiveDate::parse_from_str(name, DATE_FORMAT).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::photo::PhotoType;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"png").unwrap();
    }

    #[test]
    fn test_scan_walks_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            &dir.path()
                .join("2024-01-15/v1/boxed_2024-01-15_10-00-00_85_american-robin_92.png"),
        );
        touch(&dir.path().join("2024-01-15/v1/full_2024-01-15_10-00-00_85_v1.png"));
        // Sidecars and unrelated files are not photo records.
        touch(&dir.path().join("2024-01-15/v1/notes.txt"));
        std::fs::write(dir.path().join("2024-01-15/v1/abc.json"), "{}").unwrap();

        let records = scan_photos(dir.path(), None, now()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records.iter().filter(|r| r.kind == PhotoType::Boxed).count(),
            1
        );
        assert_eq!(
            records.iter().filter(|r| r.kind == PhotoType::Full).count(),
            1
        );
    }

    #[test]
    fn test_scan_prefers_high_res_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("2024-01-15/v1/abc.png"));
        touch(&dir.path().join("2024-01-15/v1/abc_hires.png"));

        let records = scan_photos(dir.path(), None, now()).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].high_res);
        assert!(records[0].path.to_string_lossy().contains("abc_hires"));
    }

    #[test]
    fn test_scan_adopts_directory_visitation_id() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            &dir.path()
                .join("2024-01-15/nest-cam-7/boxed_2024-01-15_10-00-00_85_american-robin_92.png"),
        );

        let records = scan_photos(dir.path(), None, now()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].visitation_id, "nest-cam-7");
    }

    #[test]
    fn test_scan_does_not_adopt_date_directory_as_id() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            &dir.path()
                .join("2024-01-15/boxed_2024-01-15_10-00-00_85_american-robin_92.png"),
        );

        let records = scan_photos(dir.path(), None, now()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].visitation_id, "");
    }

    #[test]
    fn test_scan_embedded_id_wins_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            &dir.path()
                .join("2024-01-15/dir-id/boxed_2024-01-15_10-00-00_85_filename-id_american-robin_92.png"),
        );

        let records = scan_photos(dir.path(), None, now()).unwrap();

        assert_eq!(records[0].visitation_id, "filename-id");
    }

    #[test]
    fn test_scan_date_filter_by_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            &dir.path()
                .join("2024-01-15/v1/boxed_2024-01-15_10-00-00_85_american-robin_92.png"),
        );
        touch(
            &dir.path()
                .join("2024-01-16/v2/boxed_2024-01-16_10-00-00_85_house-finch_70.png"),
        );

        let filter = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let records = scan_photos(dir.path(), Some(filter), now()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].species, "american robin");
    }

    #[test]
    fn test_scan_date_filter_by_timestamp_for_flat_tree() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("boxed_2024-01-15_10-00-00_85_american-robin_92.png"));
        touch(&dir.path().join("boxed_2024-01-16_10-00-00_85_house-finch_70.png"));

        let filter = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let records = scan_photos(dir.path(), Some(filter), now()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].species, "house finch");
    }

    #[test]
    fn test_scan_missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = scan_photos(&missing, None, now());

        assert!(matches!(result, Err(Error::StorageScan { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_unreadable_visitation_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(
            &dir.path()
                .join("2024-01-15/v1/boxed_2024-01-15_10-00-00_85_american-robin_92.png"),
        );
        let locked = dir.path().join("2024-01-15/v2");
        touch(&locked.join("boxed_2024-01-15_10-05-00_85_house-finch_70.png"));
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::read_dir(&locked).is_ok() {
            // Permission bits are not enforced for this user (e.g. root).
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = scan_photos(dir.path(), None, now());

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        let records = result.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].species, "american robin");
    }
}
