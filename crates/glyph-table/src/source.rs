use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::diagnostics::Location;
use crate::error::TableError;

/// An input file, read completely into memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    text: String,
}

impl SourceFile {
    /// Read `path` into memory. The file is closed before this returns.
    ///
    /// Bytes that are not valid UTF-8, such as Latin-1 text in comments, become U+FFFD.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        log::info!("loading `{}'", path.display());
        let bytes = fs::read(path).map_err(|err| TableError::from_io(path, err))?;
        let text = String::from_utf8(bytes).unwrap_or_else(|err| {
            log::warn!("`{}' is not valid UTF-8, replacing invalid bytes", path.display());
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        });
        Ok(Self {
            name: path.display().to_string(),
            text,
        })
    }

    /// Wrap text that did not come from the file system, e.g. in tests.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterate over the lines of the file together with their position.
    pub(crate) fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        let mut offset = 0usize;
        self.text
            .split('\n')
            .enumerate()
            .map(move |(idx, text)| {
                let start = offset;
                offset += text.len() + 1;
                Line {
                    number: idx + 1,
                    span: start..(start + text.len()),
                    text,
                }
            })
    }

    pub(crate) fn location(&self, number: usize, span: Range<usize>) -> Location {
        Location {
            file: self.name.clone(),
            line: number,
            span,
        }
    }
}

/// A physical line of a [`SourceFile`], without its line terminator.
#[derive(Debug, Clone)]
pub(crate) struct Line<'source> {
    pub number: usize,
    pub span: Range<usize>,
    pub text: &'source str,
}

/// Strip a line of TeX source down to its content.
///
/// Leading blanks are removed, the line is truncated at the first unescaped `%`, and trailing
/// white space is removed.
pub fn tex_strip(line: &str) -> &str {
    let line = line.trim_start_matches([' ', '\t']);
    let line = match find_comment(line) {
        Some(idx) => &line[..idx],
        None => line,
    };
    line.trim_end_matches([' ', '\t', '\r', '\n'])
}

fn find_comment(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    memchr::memchr_iter(b'%', bytes).find(|&idx| {
        let backslashes = bytes[..idx]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        backslashes % 2 == 0
    })
}
