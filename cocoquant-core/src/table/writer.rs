//! Parquet writer for parsed tables.
//!
//! Layout: `{root}[/{sub_path}]/{name}.parq`
//!
//! Files are overwritten on every run. There is no temp-file/rename step, so
//! a crash mid-write can leave a partial file behind.

use crate::error::Result;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of every persisted table.
pub const EXTENSION: &str = "parq";

/// Writes tables below one category root.
#[derive(Debug, Clone)]
pub struct TableWriter {
    root: PathBuf,
}

impl TableWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this category.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination of `name` under an optional sub-path.
    pub fn path_for(&self, name: &str, sub_path: Option<&str>) -> PathBuf {
        self.dir_for(sub_path).join(format!("{name}.{EXTENSION}"))
    }

    fn dir_for(&self, sub_path: Option<&str>) -> PathBuf {
        match sub_path {
            Some(sub) if !sub.is_empty() => self.root.join(sub),
            _ => self.root.clone(),
        }
    }

    /// Write `table` as `name.parq`, creating directories as needed.
    pub fn write(&self, name: &str, table: &mut DataFrame, sub_path: Option<&str>) -> Result<PathBuf> {
        fs::create_dir_all(self.dir_for(sub_path))?;

        let path = self.path_for(name, sub_path);
        let file = fs::File::create(&path)?;
        ParquetWriter::new(file).finish(table)?;

        debug!(path = %path.display(), rows = table.height(), "wrote table");
        Ok(path)
    }
}

/// Read a persisted table back.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let file = fs::File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}
