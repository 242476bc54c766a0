//! Disk-usage guard for photo writes.

use std::path::Path;

/// Current usage of the filesystem holding `path`, as a percentage.
///
/// Returns `None` when the usage cannot be determined (non-unix platforms,
/// or `statvfs` failing); callers treat unknown usage as writable.
pub fn usage_percent(path: &Path) -> Option<f64> {
    imp::usage_percent(path)
}

/// Whether the filesystem holding `path` is below the usage threshold.
pub fn has_space(path: &Path, max_percent: u8) -> bool {
    usage_percent(path).is_none_or(|pct| pct < f64::from(max_percent))
}

#[cfg(unix)]
mod imp {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    #[allow(unsafe_code)]
    pub fn usage_percent(path: &Path) -> Option<f64> {
        let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
        let mut stat = std::mem::MaybeUninit::<libc::statvfs>::uninit();

        // SAFETY: statvfs writes the struct on success; we only read it
        // after checking the return code.
        let stat = unsafe {
            if libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) != 0 {
                return None;
            }
            stat.assume_init()
        };

        if stat.f_blocks == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let used = 1.0 - stat.f_bavail as f64 / stat.f_blocks as f64;
        Some(used * 100.0)
    }
}

#[cfg(not(unix))]
mod imp {
    use std::path::Path;

    pub fn usage_percent(_path: &Path) -> Option<f64> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_usage_percent_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let pct = usage_percent(dir.path()).unwrap();
        assert!((0.0..=100.0).contains(&pct));
    }

    #[cfg(unix)]
    #[test]
    fn test_usage_percent_missing_path() {
        assert!(usage_percent(Path::new("/nonexistent/perchwatch")).is_none());
    }

    #[test]
    fn test_has_space_at_full_threshold() {
        let dir = tempfile::tempdir().unwrap();
        assert!(has_space(dir.path(), 100));
    }
}
