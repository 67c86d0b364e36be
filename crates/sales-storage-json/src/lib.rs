//! sales-storage-json
//!
//! File-backed [`RecordStore`]: one JSON file per key, replaced atomically, with the
//! previous contents rotated into timestamped backups before every overwrite.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use sales_core::{decode_records, CoreError, RecordStore};
use sales_domain::SaleRecord;

const STORE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Directories used by [`JsonFileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub store_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<base>/store` and `<base>/backups`.
    pub fn under(base: &Path) -> Self {
        Self {
            store_root: base.join("store"),
            backup_root: base.join("backups"),
        }
    }
}

/// Describes one rotated copy of a stored blob.
///
/// Backups taken within the same millisecond share `created_at` and are told apart by
/// `sequence`, which counts up from zero.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub key: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub sequence: u32,
    pub path: PathBuf,
}

/// Filesystem-backed JSON persistence for record blobs and their backups.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    store_root: PathBuf,
    backup_root: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.store_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            store_root: paths.store_root,
            backup_root: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.store_root
            .join(format!("{}.{}", canonical_name(key), STORE_EXTENSION))
    }

    /// Backups of `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let (created_at, sequence) = match parse_backup_name(file_name) {
                    Some((at, sequence)) => (Some(at), sequence),
                    None => (None, 0),
                };
                entries.push(BackupInfo {
                    key: slug.clone(),
                    id: file_name.to_string(),
                    created_at,
                    sequence,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse((info.created_at, info.sequence)));
        Ok(entries)
    }

    /// Decodes the records held in a backup without touching the live blob.
    pub fn read_backup(&self, backup: &BackupInfo) -> Result<Vec<SaleRecord>, CoreError> {
        let data = fs::read_to_string(&backup.path)?;
        decode_records(&data)
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backup_root.join(canonical_name(key))
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let stem = format!("{}_{}", canonical_name(key), timestamp);
        let sequence = self
            .list_backups(key)?
            .iter()
            .filter(|backup| backup.id.starts_with(&stem))
            .map(|backup| backup.sequence + 1)
            .max()
            .unwrap_or(0);
        let file_name = if sequence == 0 {
            format!("{stem}.{STORE_EXTENSION}")
        } else {
            format!("{stem}-{sequence}.{STORE_EXTENSION}")
        };
        fs::copy(path, dir.join(&file_name))?;
        tracing::debug!(key, backup = %file_name, "previous blob backed up");
        self.prune_backups(key)
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        let entries = self.list_backups(key)?;
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.blob_path(key);
        self.backup_existing_file(key, &path)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "records".into()
    } else {
        sanitized
    }
}

/// Timestamp and same-millisecond sequence of `<key>_<date>_<time>[-<n>].json`.
fn parse_backup_name(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let trimmed = name.strip_suffix(&format!(".{}", STORE_EXTENSION))?;
    let mut segments = trimmed.rsplit('_');
    let last = segments.next()?;
    let (time, sequence) = match last.split_once('-') {
        Some((time, sequence)) => (time, sequence.parse().ok()?),
        None => (last, 0),
    };
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}_{time}"), BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| (DateTime::from_naive_utc_and_offset(naive, Utc), sequence))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
