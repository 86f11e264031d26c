//! # File I/O Module
//!
//! Handles job file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent two technicians editing one job on a shared drive
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Jobs are saved as `.dpj` files containing JSON.
//! Lock files use the `.dpj.lock` extension with metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drypoint_core::file_io::{save_job, load_job, FileLock};
//! use drypoint_core::job::Job;
//! use std::path::Path;
//!
//! let job = Job::new("Sam Technician", "CLM-2291", "Harbour Insurance");
//! let path = Path::new("CLM-2291.dpj");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "sam@restoration.example")?;
//!
//! save_job(&job, path)?;
//!
//! // Lock is released when dropped
//! drop(lock);
//! # Ok::<(), drypoint_core::errors::EstimateError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::job::{Job, SCHEMA_VERSION};

/// Job file extension
pub const JOB_EXTENSION: &str = "dpj";

/// Locks older than this are treated as abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in .dpj.lock files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Whether the holder is gone (dead process on this machine, or too old)
    pub fn is_stale(&self) -> bool {
        if hostname().as_deref() == Some(self.machine.as_str()) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    use std::process::Command;
    match Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
    {
        Ok(output) => String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()),
        Err(_) => true,
    }
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata so other users can see who holds the job
#[derive(Debug)]
pub struct FileLock {
    job_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a job file.
    ///
    /// Returns `EstimateError::FileLocked` if another live holder has it.
    /// Stale locks are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EstimateResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(EstimateError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            tracing::warn!(
                path = %path.display(),
                holder = %existing.user_id,
                "taking over stale job lock"
            );
        }

        // Not truncated until the OS lock is ours: a live holder's metadata
        // must survive a failed attempt.
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error("create lock", &lock_path))?;

        // Non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            EstimateError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(EstimateError::serialization)?;

        lock_file
            .set_len(0)
            .and_then(|_| lock_file.write_all(lock_json.as_bytes()))
            .and_then(|_| lock_file.sync_all())
            .map_err(io_error("write lock", &lock_path))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "job lock acquired");

        Ok(FileLock {
            job_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a job is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if a live holder has it, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !info.is_stale())
    }

    pub fn job_path(&self) -> &Path {
        &self.job_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released with the handle
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Lock file path for a job file: `job.dpj` → `job.dpj.lock`
fn lock_path_for(job_path: &Path) -> PathBuf {
    let mut lock_path = job_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// `map_err` adapter for I/O failures on `path`
fn io_error<'a>(
    operation: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> EstimateError + 'a {
    move |e| EstimateError::file_error(operation, path.display().to_string(), e.to_string())
}

fn read_to_string(path: &Path, operation: &str) -> EstimateResult<String> {
    let mut file = File::open(path).map_err(io_error(operation, path))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(io_error(operation, path))?;
    Ok(contents)
}

fn read_lock_info(lock_path: &Path) -> EstimateResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(EstimateError::serialization)
}

/// Save a job with atomic write semantics.
///
/// 1. Serialize the job to JSON
/// 2. Write to a temporary file (.dpj.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target
///
/// ```rust,no_run
/// use drypoint_core::file_io::save_job;
/// use drypoint_core::job::Job;
/// use std::path::Path;
///
/// let job = Job::new("Sam Technician", "CLM-2291", "Harbour Insurance");
/// save_job(&job, Path::new("CLM-2291.dpj"))?;
/// # Ok::<(), drypoint_core::errors::EstimateError>(())
/// ```
pub fn save_job(job: &Job, path: &Path) -> EstimateResult<()> {
    let json = serde_json::to_string_pretty(job).map_err(EstimateError::serialization)?;

    let tmp_path = path.with_extension(format!("{}.tmp", JOB_EXTENSION));

    let mut tmp_file = File::create(&tmp_path).map_err(io_error("create temp file", &tmp_path))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(io_error("write temp file", &tmp_path))?;

    tmp_file
        .sync_all()
        .map_err(io_error("sync temp file", &tmp_path))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), claim = %job.meta.claim_number, "job saved");
    Ok(())
}

/// Load a job from a file.
///
/// # Returns
///
/// * `Err(EstimateError::VersionMismatch)` - File version is incompatible
/// * `Err(EstimateError::SerializationError)` - Invalid JSON
/// * `Err(EstimateError::FileError)` - I/O error
pub fn load_job(path: &Path) -> EstimateResult<Job> {
    let contents = read_to_string(path, "read")?;

    let job: Job = serde_json::from_str(&contents).map_err(|e| {
        EstimateError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    validate_version(&job.meta.version)?;

    tracing::debug!(
        path = %path.display(),
        areas = job.areas.len(),
        items = job.line_items.len(),
        "job loaded"
    );
    Ok(job)
}

/// Load a job along with the current lock holder, if any.
///
/// A job locked by someone else should be opened read-only.
pub fn load_job_with_lock_check(path: &Path) -> EstimateResult<(Job, Option<LockInfo>)> {
    let job = load_job(path)?;
    let lock_info = FileLock::check(path);
    Ok((job, lock_info))
}

/// Major must match; on 0.x a newer minor is also rejected.
fn validate_version(file_version: &str) -> EstimateResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || EstimateError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => {
            Err(mismatch())
        }
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeArea;
    use tempfile::TempDir;

    fn job_path(dir: &TempDir, name: &str) -> PathBuf {
        dir.path().join(format!("{}.{}", name, JOB_EXTENSION))
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/jobs/CLM-2291.dpj"));
        assert_eq!(lock_path, Path::new("/jobs/CLM-2291.dpj.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("sam@restoration.example");
        assert_eq!(info.user_id, "sam@restoration.example");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_old_lock_is_stale() {
        let mut info = LockInfo::new("someone");
        info.machine = "another-machine".to_string();
        assert!(!info.is_stale());
        info.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        assert!(info.is_stale());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "roundtrip");

        let mut job = Job::new("Sam Technician", "CLM-2291", "Harbour Insurance");
        job.add_area(ScopeArea::new("Kitchen", 4.0, 3.0, 2.4, 75.0));
        save_job(&job, &path).unwrap();

        let loaded = load_job(&path).unwrap();
        assert_eq!(loaded.meta.claim_number, "CLM-2291");
        assert_eq!(loaded.areas, job.areas);
        assert_eq!(loaded.settings, job.settings);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "atomic");
        let tmp_path = path.with_extension("dpj.tmp");

        save_job(&Job::default(), &path).unwrap();
        assert!(!tmp_path.exists());
        assert!(path.exists());
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "locked");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "sam@restoration.example").unwrap();
        assert_eq!(lock.info.user_id, "sam@restoration.example");
        assert_eq!(lock.job_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_failed_acquire_keeps_holder_metadata() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "held");
        save_job(&Job::default(), &path).unwrap();

        // Holder with the OS lock whose metadata does not parse
        let lock_path = lock_path_for(&path);
        fs::write(&lock_path, "{ partially written").unwrap();
        let holder = OpenOptions::new().read(true).write(true).open(&lock_path).unwrap();
        holder.try_lock_exclusive().unwrap();

        let err = FileLock::acquire(&path, "second@restoration.example").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert_eq!(fs::read_to_string(&lock_path).unwrap(), "{ partially written");

        holder.unlock().unwrap();
        drop(holder);

        let lock = FileLock::acquire(&path, "second@restoration.example").unwrap();
        let written = read_lock_info(&lock_path).unwrap();
        assert_eq!(written.user_id, "second@restoration.example");
        drop(lock);
    }

    #[test]
    fn test_foreign_lock_blocks_acquire() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "foreign");
        save_job(&Job::default(), &path).unwrap();

        let mut holder = LockInfo::new("alex@restoration.example");
        holder.machine = "site-laptop-7".to_string();
        fs::write(lock_path_for(&path), serde_json::to_string(&holder).unwrap()).unwrap();

        let err = FileLock::acquire(&path, "sam@restoration.example").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.is_recoverable());

        let (_, lock_info) = load_job_with_lock_check(&path).unwrap();
        assert_eq!(lock_info, Some(holder));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "future");
        let mut job = Job::default();
        job.meta.version = "0.9.0".to_string();
        save_job(&job, &path).unwrap();

        let err = load_job(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "broken");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_job(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
        assert_eq!(
            load_job(&job_path(&dir, "missing")).unwrap_err().error_code(),
            "FILE_ERROR"
        );
    }

    #[test]
    fn test_load_with_lock_check_unlocked() {
        let dir = TempDir::new().unwrap();
        let path = job_path(&dir, "unlocked");
        save_job(&Job::new("Sam", "CLM-1", "Client"), &path).unwrap();

        let (loaded, lock_info) = load_job_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.claim_number, "CLM-1");
        assert!(lock_info.is_none());
    }
}
