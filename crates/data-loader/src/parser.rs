//! Parser for MovieLens 100k rating files.
//!
//! Every rating file (`u.data`, `u1.base`, `u1.test`, ...) has the same layout:
//! `userId \t movieId \t rating \t timestamp`
//!
//! Rust concepts you'll learn here:
//! - String parsing and splitting
//! - Error handling with `?` operator
//! - Generic readers (`impl BufRead`) so tests don't need files on disk
//! - Building paths with `Path::join`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Number of tab-separated fields a rating line must have
pub const RATING_FIELDS: usize = 4;

impl RatingRecord {
    /// Parse one tab-separated rating line
    ///
    /// `file` and `line_no` only feed the error message. Fields after the
    /// fourth are ignored.
    pub fn from_line(line: &str, file: &str, line_no: usize) -> Result<Self> {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < RATING_FIELDS {
            return Err(DataLoadError::FieldCountMismatch {
                file: file.to_string(),
                expected: RATING_FIELDS,
                found: parts.len(),
                line: line_no,
            });
        }

        Ok(RatingRecord {
            user_id: parse_field(parts[0], "userId", file, line_no)?,
            movie_id: parse_field(parts[1], "movieId", file, line_no)?,
            rating: parse_field(parts[2], "rating", file, line_no)?,
            timestamp: parse_field(parts[3], "timestamp", file, line_no)?,
        })
    }
}

fn parse_field<T>(raw: &str, field: &str, file: &str, line_no: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid {}: {} ({:?})", field, e, raw),
    })
}

/// Parse rating lines from any buffered reader
///
/// Blank lines are skipped; the first malformed line stops parsing.
pub fn parse_ratings_from_reader<R: BufRead>(reader: R, source: &str) -> Result<Vec<RatingRecord>> {
    let mut ratings = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_trimmed = line.trim_end_matches(['\r', '\n']);
        if line_trimmed.trim().is_empty() {
            continue;
        }
        ratings.push(RatingRecord::from_line(line_trimmed, source, idx + 1)?);
    }

    Ok(ratings)
}

/// Parse an in-memory sequence of lines (1-based line numbers in errors)
pub fn parse_ratings_from_lines<'a, I>(lines: I, source: &str) -> Result<Vec<RatingRecord>>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| RatingRecord::from_line(line, source, idx + 1))
        .collect()
}

/// Parse a rating file from disk
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingRecord>> {
    let file = File::open(path).map_err(|_| DataLoadError::FileNotFound {
        path: path.display().to_string(),
    })?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_ratings_from_reader(BufReader::new(file), &source)
}

// =============================================================================
// Data split file naming
// =============================================================================

/// Training and (optional) test file locations for one data directory
///
/// MovieLens 100k ships the full set as `u.data` and five cross-validation
/// splits as `u1.base`/`u1.test` ... `u5.base`/`u5.test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSplit {
    pub training: PathBuf,
    pub test: Option<PathBuf>,
}

impl DataSplit {
    /// Full data set file, used when no split is named
    pub const FULL_DATA_FILE: &'static str = "u.data";

    /// Resolve the files for `split` (e.g. `"u1"`) inside `dir`
    ///
    /// Example: `locate("ml-100k", Some("u1"))` ->
    /// training `ml-100k/u1.base`, test `ml-100k/u1.test`
    pub fn locate(dir: &Path, split: Option<&str>) -> Self {
        match split {
            None => DataSplit {
                training: dir.join(Self::FULL_DATA_FILE),
                test: None,
            },
            Some(name) => DataSplit {
                training: dir.join(format!("{}.base", name)),
                test: Some(dir.join(format!("{}.test", name))),
            },
        }
    }
}
