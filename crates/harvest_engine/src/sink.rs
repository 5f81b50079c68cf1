use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use harvest_core::{FieldSchema, Record};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Append-only CSV destination.
///
/// Created once in truncate mode with exactly one header row. Every
/// [`CsvSink::append`] opens, writes, flushes and closes on its own, so a
/// crash between pages loses at most the in-flight page.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Truncates `path`, writes the header row and syncs it to disk.
    /// Any pre-existing content is discarded.
    pub fn create(path: impl Into<PathBuf>, schema: &FieldSchema) -> Result<Self, SinkError> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| SinkError::Open {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        write_row(&mut writer, schema.fields())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row per record, in schema field order, as a single
    /// open/write/close cycle.
    pub fn append(&self, records: &[Record]) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = BufWriter::new(file);
        for record in records {
            write_row(&mut writer, record.values())?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

fn write_row<W: Write>(writer: &mut W, fields: &[String]) -> io::Result<()> {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            writer.write_all(b",")?;
        }
        write_field(writer, field)?;
    }
    writer.write_all(b"\n")
}

/// RFC 4180 quoting: fields containing the delimiter, a quote or a line
/// break are wrapped in quotes with inner quotes doubled.
fn write_field<W: Write>(writer: &mut W, field: &str) -> io::Result<()> {
    if field.contains([',', '"', '\n', '\r']) {
        writer.write_all(b"\"")?;
        writer.write_all(field.replace('"', "\"\"").as_bytes())?;
        writer.write_all(b"\"")
    } else {
        writer.write_all(field.as_bytes())
    }
}
