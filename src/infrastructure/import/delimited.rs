//! Delimited record files
//!
//! Line-oriented import format: a marker line opens each record, and
//! `field: value` lines fill it until the next marker. Blank lines are
//! skipped wherever they appear; only the first colon on a line splits,
//! so values may contain colons.

use std::fs;
use std::io::BufRead;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::domain::ports::{FieldMap, RecordSource};

/// Record source over a marker-delimited text file
pub struct DelimitedRecordSource {
    marker: String,
    lines: Vec<String>,
    pos: usize,
}

impl DelimitedRecordSource {
    /// Read every line up front; the source then hands out one record
    /// per marker
    pub fn from_reader(reader: impl BufRead, marker: impl Into<String>) -> Result<Self> {
        let lines = reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .context("reading record source")?;
        Ok(Self {
            marker: marker.into(),
            lines,
            pos: 0,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, marker: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading record file {}", path.display()))?;
        Ok(Self {
            marker: marker.into(),
            lines: content.lines().map(str::to_string).collect(),
            pos: 0,
        })
    }

    fn skip_blank_lines(&mut self) {
        while self.pos < self.lines.len() && self.lines[self.pos].trim().is_empty() {
            self.pos += 1;
        }
    }
}

impl RecordSource for DelimitedRecordSource {
    fn next_record(&mut self) -> Result<Option<FieldMap>> {
        self.skip_blank_lines();
        if self.pos >= self.lines.len() {
            return Ok(None);
        }

        if self.lines[self.pos].trim() != self.marker {
            bail!(
                "expected record marker '{}' at line {}",
                self.marker,
                self.pos + 1
            );
        }
        self.pos += 1;

        let mut fields = FieldMap::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos].trim();
            if line == self.marker {
                break;
            }
            let line_number = self.pos + 1;
            self.pos += 1;
            if line.is_empty() {
                continue;
            }
            let Some((field, value)) = line.split_once(':') else {
                bail!("line {line_number} is not a 'field: value' pair");
            };
            fields.insert(field.trim().to_string(), value.trim().to_string());
        }
        Ok(Some(fields))
    }
}
