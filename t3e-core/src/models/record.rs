use std::fmt::{self, Display};
use std::io::{BufRead, Lines};
use std::path::Path;

use crate::errors::{Result, T3eError};
use crate::utils::get_dynamic_reader;

///
/// One row of a four-column, tab-separated table: `chromosome start end name`.
///
/// Control reads, sample reads and repeat annotations all share this shape; the
/// last column is a read id for reads and a family name for repeats.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct BedRecord {
    pub chr: String,
    pub start: i64,
    pub end: i64,
    pub name: String,
}

impl BedRecord {
    ///
    /// Parse a single line. `source_name` and `line` are only used to build the
    /// error message.
    ///
    pub fn parse(text: &str, source_name: &str, line: usize) -> Result<BedRecord> {
        let fields: Vec<&str> = text.split('\t').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(T3eError::format(
                source_name,
                line,
                format!("expected 4 tab-separated fields, found {}", fields.len()),
            ));
        }

        let start = fields[1].parse::<i64>().map_err(|_| {
            T3eError::format(source_name, line, format!("invalid start: {:?}", fields[1]))
        })?;
        let end = fields[2].parse::<i64>().map_err(|_| {
            T3eError::format(source_name, line, format!("invalid end: {:?}", fields[2]))
        })?;

        if start < 0 || end < start {
            return Err(T3eError::format(
                source_name,
                line,
                format!("invalid coordinates: start {} end {}", start, end),
            ));
        }
        if fields[0].is_empty() || fields[3].is_empty() {
            return Err(T3eError::format(source_name, line, "empty chromosome or name"));
        }

        Ok(BedRecord {
            chr: fields[0].to_string(),
            start,
            end,
            name: fields[3].to_string(),
        })
    }
}

impl Display for BedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.chr, self.start, self.end, self.name)
    }
}

///
/// Streams [BedRecord]s out of any buffered reader, skipping blank lines.
///
pub struct BedRecordReader<R: BufRead> {
    lines: Lines<R>,
    source_name: String,
    line: usize,
}

impl<R: BufRead> BedRecordReader<R> {
    pub fn new(reader: R, source_name: impl Into<String>) -> Self {
        BedRecordReader {
            lines: reader.lines(),
            source_name: source_name.into(),
            line: 0,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

impl BedRecordReader<std::io::BufReader<Box<dyn std::io::Read>>> {
    ///
    /// Open a (possibly gzip'd) four-column table.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        Ok(BedRecordReader::new(reader, path.display().to_string()))
    }
}

impl<R: BufRead> Iterator for BedRecordReader<R> {
    type Item = Result<(usize, BedRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line += 1;
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(BedRecord::parse(&line, &self.source_name, self.line).map(|r| (self.line, r)));
        }
    }
}
