use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calamine::{open_workbook, Data, Reader, Xlsx};
use log::{debug, warn};

use crate::config::DashboardConfig;
use crate::dataset::{normalize_column_name, Dataset, Value};

/// Read the configured sheet into a [`Dataset`].
///
/// On any failure — missing file, missing sheet, malformed workbook —
/// this deliberately degrades to an empty dataset plus a user-facing
/// message instead of propagating the error. The empty dataset then
/// fails schema validation downstream, which is where the render cycle
/// actually stops.
pub fn read_workbook(config: &DashboardConfig) -> (Dataset, Option<String>) {
    match try_read(&config.workbook_path, &config.sheet_name) {
        Ok(dataset) => {
            debug!(
                "loaded {} rows x {} columns from {}",
                dataset.row_count(),
                dataset.columns().len(),
                config.workbook_path.display()
            );
            (dataset, None)
        }
        Err(e) => {
            warn!(
                "failed to read workbook {}: {}",
                config.workbook_path.display(),
                e
            );
            (
                Dataset::empty(),
                Some(format!("Erreur lors de la lecture du fichier Excel: {}", e)),
            )
        }
    }
}

fn try_read(path: &Path, sheet_name: &str) -> Result<Dataset, Box<dyn Error>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(sheet_name)?;

    let mut rows = range.rows();
    let header = rows.next().ok_or("worksheet has no header row")?;
    let columns = header
        .iter()
        .map(|cell| normalize_column_name(&cell_text(cell)))
        .collect();

    let mut dataset = Dataset::new(columns);
    for row in rows {
        dataset.push_row(row.iter().map(to_value).collect());
    }
    Ok(dataset)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(e) => Value::Text(e.to_string()),
    }
}

/// Single-entry memoizer for the workbook read, keyed by path and file
/// modification time.
///
/// The file is physically read at most once per (path, mtime); a touched
/// or replaced workbook invalidates the entry on the next render. Owned
/// by the application state rather than hidden in a global, so each test
/// can hold its own instance.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
    dataset: Dataset,
    load_error: Option<String>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset for the configured workbook, reading it only when the
    /// cached entry is missing or stale. Also hands back the load error
    /// message from the most recent physical read, if any.
    pub fn get(&mut self, config: &DashboardConfig) -> (&Dataset, Option<&str>) {
        let modified = file_mtime(&config.workbook_path);
        let fresh = self
            .entry
            .as_ref()
            .is_some_and(|e| e.path == config.workbook_path && e.modified == modified);

        if !fresh {
            let (dataset, load_error) = read_workbook(config);
            self.entry = Some(CacheEntry {
                path: config.workbook_path.clone(),
                modified,
                dataset,
                load_error,
            });
        }

        // Populated just above when missing or stale.
        let entry = self.entry.as_ref().expect("cache entry present after fill");
        (&entry.dataset, entry.load_error.as_deref())
    }

    /// Drop the cached entry; the next `get` re-reads the file.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
