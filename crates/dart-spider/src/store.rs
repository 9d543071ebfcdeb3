use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

/// Append-only sink over a local record store.
///
/// Both the output store and the failure store go through this seam, so the
/// storage format can change without touching the crawl loop.
pub trait RecordSink {
    /// Append one row and make it durable before returning.
    fn append(&mut self, row: &[&str]) -> Result<()>;

    /// Read back a single column of the store at `path`, by position.
    /// A missing store is an empty column.
    fn load_column(path: &Path, idx: usize) -> Result<Vec<String>>
    where
        Self: Sized;
}

/// Headerless, UTF-8, comma-delimited flat file; every append is flushed so
/// a crash loses at most the in-flight lookup.
pub struct CsvSink {
    writer: csv::Writer<std::fs::File>,
}

impl CsvSink {
    /// Open `path` for appending, creating it (and its directory) when
    /// absent. Never truncates.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        debug!("opened record sink at {path:?}");
        Ok(Self { writer })
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, row: &[&str]) -> Result<()> {
        self.writer.write_record(row)?;
        self.writer.flush()?;
        Ok(())
    }

    fn load_column(path: &Path, idx: usize) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(value) = record.get(idx) {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }
}

/// Move an existing store aside with a timestamp suffix, for fresh runs that
/// should not resume from prior state.
pub fn rotate(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("store");
    let rotated = path.with_file_name(format!("{stem}_{stamp}.csv"));

    std::fs::rename(path, &rotated)?;
    info!("rotated {path:?} to {rotated:?}");
    Ok(())
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
