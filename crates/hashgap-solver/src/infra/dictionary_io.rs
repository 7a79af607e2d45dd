//! Dictionary file I/O
//!
//! Dictionaries are CSV files with a header row; one named column holds the
//! candidate words. Reading is forgiving: rows that are not valid UTF-8,
//! have broken quoting, or carry more fields than the header are skipped,
//! and cells holding a missing-value marker (`NaN`, `NA`, ...) are dropped.
//! Quoted fields may span several lines.

use crate::constants::{DEFAULT_WORD_COLUMN, MISSING_CELL_VALUES};
use crate::domain::corpus::Corpus;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Dictionary loading errors
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("dictionary {} has no header row", .0.display())]
    Empty(PathBuf),

    #[error("column '{column}' not found in header of {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DictionaryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Row counts from reading one dictionary
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DictionaryStats {
    /// Data rows seen (header and blank lines excluded)
    pub rows: usize,
    /// Rows skipped as malformed
    pub skipped_rows: usize,
    /// Cells dropped as missing
    pub missing_cells: usize,
}

/// Split one CSV line into fields
///
/// Fields may be wrapped in double quotes; a doubled quote inside a quoted
/// field is a literal quote. Returns `None` for an unterminated quote or
/// text after a closing quote.
pub fn parse_csv_record(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut after_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quotes = true;
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                after_quotes = false;
            }
            '"' if field.is_empty() && !after_quotes => in_quotes = true,
            _ if after_quotes => return None,
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field);
    Some(fields)
}

/// Split CSV bytes into records
///
/// Newlines inside a quoted field belong to the record. A quote left open at
/// the end of the input only claims the line it was opened on, and scanning
/// resumes on the next line.
fn split_records(bytes: &[u8]) -> Vec<&[u8]> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    let mut in_quotes = false;
    let mut field_start = true;

    loop {
        while let Some(&b) = bytes.get(pos) {
            pos += 1;
            if in_quotes {
                if b == b'"' {
                    if bytes.get(pos) == Some(&b'"') {
                        pos += 1;
                    } else {
                        in_quotes = false;
                    }
                }
                continue;
            }

            match b {
                b'"' if field_start => {
                    in_quotes = true;
                    field_start = false;
                }
                b',' => field_start = true,
                b'\n' => {
                    records.push(&bytes[start..pos - 1]);
                    start = pos;
                    field_start = true;
                }
                _ => field_start = false,
            }
        }

        if in_quotes && let Some(i) = bytes[start..].iter().position(|&b| b == b'\n') {
            records.push(&bytes[start..start + i]);
            start += i + 1;
            pos = start;
            in_quotes = false;
            field_start = true;
            continue;
        }

        if start < bytes.len() {
            records.push(&bytes[start..]);
        }
        return records;
    }
}

/// Quote a field for CSV output when it needs it
fn quote_csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Extract the named column from CSV bytes
///
/// `source` is only used for error messages.
pub fn read_word_column(
    bytes: &[u8],
    column: &str,
    source: &Path,
) -> Result<(Vec<String>, DictionaryStats), DictionaryError> {
    let mut stats = DictionaryStats::default();
    let mut lines = split_records(bytes)
        .into_iter()
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .filter(|l| !l.iter().all(u8::is_ascii_whitespace));

    let header = lines
        .next()
        .and_then(|l| std::str::from_utf8(l).ok())
        .map(|l| l.trim_start_matches('\u{feff}'))
        .and_then(parse_csv_record)
        .ok_or_else(|| DictionaryError::Empty(source.to_path_buf()))?;

    let index = header
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| DictionaryError::MissingColumn {
            path: source.to_path_buf(),
            column: column.to_string(),
        })?;

    let mut words = Vec::new();
    for raw in lines {
        stats.rows += 1;

        let Some(fields) = std::str::from_utf8(raw).ok().and_then(parse_csv_record) else {
            stats.skipped_rows += 1;
            continue;
        };
        if fields.len() > header.len() {
            stats.skipped_rows += 1;
            continue;
        }

        match fields.into_iter().nth(index) {
            Some(cell) if !MISSING_CELL_VALUES.contains(&cell.as_str()) => words.push(cell),
            _ => stats.missing_cells += 1,
        }
    }

    Ok((words, stats))
}

/// Load the raw entries of a dictionary column
pub fn load_word_column(
    path: impl AsRef<Path>,
    column: &str,
) -> Result<(Vec<String>, DictionaryStats), DictionaryError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| DictionaryError::io(path, e))?;
    let (words, stats) = read_word_column(&bytes, column, path)?;

    debug!(
        path = %path.display(),
        rows = stats.rows,
        skipped = stats.skipped_rows,
        missing = stats.missing_cells,
        "dictionary read"
    );
    Ok((words, stats))
}

/// Load a dictionary as a case-expanded corpus
pub fn load_corpus(path: impl AsRef<Path>, column: &str) -> Result<Corpus, DictionaryError> {
    let (words, _) = load_word_column(path, column)?;
    Ok(Corpus::from_words(words).with_lowercase())
}

/// Write a single-column word list with a `Word` header
pub fn save_word_list(path: impl AsRef<Path>, words: &[String]) -> Result<(), DictionaryError> {
    let path = path.as_ref();
    ensure_parent_dir(path).map_err(|e| DictionaryError::io(path, e))?;

    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", DEFAULT_WORD_COLUMN)?;
        for word in words {
            writeln!(writer, "{}", quote_csv_field(word))?;
        }
        writer.flush()
    };
    write().map_err(|e| DictionaryError::io(path, e))
}

/// Summary of a dictionary expansion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandSummary {
    pub stats: DictionaryStats,
    /// Entries read from the input column
    pub input_words: usize,
    /// Words written (originals plus new lowercase forms, de-duplicated)
    pub output_words: usize,
}

/// Build the cleaned, case-expanded word list from a raw dictionary
///
/// The output lists the trimmed originals first, then each lowercase form
/// not already present.
pub fn expand_dictionary(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    column: &str,
) -> Result<ExpandSummary, DictionaryError> {
    let (words, stats) = load_word_column(input, column)?;
    let input_words = words.len();
    let corpus = Corpus::from_words(words).with_lowercase();
    save_word_list(output, corpus.words())?;

    Ok(ExpandSummary {
        stats,
        input_words,
        output_words: corpus.len(),
    })
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_record_plain_and_quoted() {
        assert_eq!(parse_csv_record("a,b,c"), Some(vec!["a".into(), "b".into(), "c".into()]));
        assert_eq!(
            parse_csv_record("\"Abandon\",\"v. t.\",\"To give up, wholly\""),
            Some(vec!["Abandon".into(), "v. t.".into(), "To give up, wholly".into()])
        );
        assert_eq!(
            parse_csv_record("\"say \"\"hi\"\"\",x"),
            Some(vec!["say \"hi\"".into(), "x".into()])
        );
        assert_eq!(parse_csv_record(""), Some(vec![String::new()]));
        assert_eq!(parse_csv_record("a,"), Some(vec!["a".into(), String::new()]));
    }

    #[test]
    fn test_parse_csv_record_multiline_field() {
        assert_eq!(
            parse_csv_record("Abandon,\"To give up\nwholly\""),
            Some(vec!["Abandon".into(), "To give up\nwholly".into()])
        );
    }

    #[test]
    fn test_split_records_keeps_quoted_newlines() {
        let csv = b"a,\"x\ny\"\nb,\"say \"\"hi\"\"\nthere\"\nc,plain\n";
        let records = split_records(csv);
        assert_eq!(
            records,
            vec![&b"a,\"x\ny\""[..], &b"b,\"say \"\"hi\"\"\nthere\""[..], &b"c,plain"[..]]
        );
    }

    #[test]
    fn test_read_word_column_multiline_definition() {
        let csv = "Word,POS,Definition\n\
                   Abandon,v. t.,\"To give up\nwholly; to desert\"\n\
                   Tyrant,n.,\"A ruler, \"\"absolute\"\"\"\r\n\
                   Zeal,n.,\"Eager\r\ninterest\"\n";
        let (words, stats) = read_word_column(csv.as_bytes(), "Word", Path::new("dict.csv")).unwrap();

        assert_eq!(words, vec!["Abandon", "Tyrant", "Zeal"]);
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.skipped_rows, 0);
    }

    #[test]
    fn test_parse_csv_record_malformed() {
        assert_eq!(parse_csv_record("\"unterminated,x"), None);
        assert_eq!(parse_csv_record("\"closed\"junk,x"), None);
    }

    #[test]
    fn test_quote_csv_field() {
        assert_eq!(quote_csv_field("plain"), "plain");
        assert_eq!(quote_csv_field("a,b"), "\"a,b\"");
        assert_eq!(quote_csv_field("say \"x\""), "\"say \"\"x\"\"\"");
    }

    #[test]
    fn test_read_word_column_skips_bad_rows() {
        let csv = "Word,POS,Definition\n\
                   Apple,n.,A fruit\n\
                   NaN,n.,missing\n\
                   \"broken,n.,x\n\
                   Pear,n.,too,many,fields\n\
                   \n\
                   Plum\n\
                   ,n.,empty cell\n";
        let (words, stats) = read_word_column(csv.as_bytes(), "Word", Path::new("dict.csv")).unwrap();

        assert_eq!(words, vec!["Apple", "Plum"]);
        assert_eq!(stats.rows, 6);
        assert_eq!(stats.skipped_rows, 2);
        assert_eq!(stats.missing_cells, 2);
    }

    #[test]
    fn test_read_word_column_invalid_utf8_row() {
        let mut csv = b"Word\nvalid\n".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe, b'\n']);
        csv.extend_from_slice(b"also\r\n");

        let (words, stats) = read_word_column(&csv, "Word", Path::new("dict.csv")).unwrap();
        assert_eq!(words, vec!["valid", "also"]);
        assert_eq!(stats.skipped_rows, 1);
    }

    #[test]
    fn test_read_word_column_missing_column() {
        let result = read_word_column(b"Term,Def\nx,y\n", "Word", Path::new("dict.csv"));
        assert!(matches!(result, Err(DictionaryError::MissingColumn { .. })));
    }

    #[test]
    fn test_read_word_column_empty_file() {
        let result = read_word_column(b"", "Word", Path::new("dict.csv"));
        assert!(matches!(result, Err(DictionaryError::Empty(_))));
    }

    #[test]
    fn test_expand_dictionary_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dictionary.csv");
        let output = dir.path().join("out").join("clean_words_expanded.csv");
        fs::write(
            &input,
            "Word,POS\nButtercup,n.\n Westley ,n.\nbuttercup,n.\n\"Inconceivable, indeed\",adj.\n",
        )
        .unwrap();

        let summary = expand_dictionary(&input, &output, DEFAULT_WORD_COLUMN).unwrap();
        assert_eq!(summary.input_words, 4);
        assert_eq!(summary.output_words, 6);

        let corpus = load_corpus(&output, DEFAULT_WORD_COLUMN).unwrap();
        assert_eq!(
            corpus.words(),
            &[
                "Buttercup",
                "Westley",
                "buttercup",
                "Inconceivable, indeed",
                "westley",
                "inconceivable, indeed",
            ]
        );
    }

    #[test]
    fn test_missing_dictionary_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_corpus(dir.path().join("nope.csv"), DEFAULT_WORD_COLUMN);
        assert!(matches!(result, Err(DictionaryError::NotFound(_))));
    }
}
