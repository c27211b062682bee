//! Readers for TeX/LaTeX macro packages: math classes, `\let` aliases and text operators.
//!
//! Every reader is a fold over the files in the order they were given: each step takes the
//! table built so far plus one file and yields the next table together with the diagnostics
//! raised by that file. When a file redefines a name, the later definition wins.

use std::borrow::Cow;
use std::ops::Range;

use memchr::memmem;
use rustc_hash::FxHashMap;

use crate::MathClass;
use crate::declaration::{Declaration, recognize_alias, recognize_math_class, recognize_operator};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::operator::OperatorRecord;
use crate::source::{Line, SourceFile, tex_strip};

/// Symbol name to math class, as declared by the macro packages.
#[derive(Debug, Default, Clone)]
pub struct ClassTable {
    classes: FxHashMap<String, MathClass>,
}

impl ClassTable {
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = &'a SourceFile>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        sources.into_iter().fold(Self::default(), |table, source| {
            let (table, found) = table.merge(source);
            diagnostics.append(found);
            table
        })
    }

    /// Add the declarations of one more file.
    pub fn merge(mut self, source: &SourceFile) -> (Self, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        for line in logical_lines(source) {
            let Declaration::MathClass { name, class } = recognize_math_class(&line.text) else {
                continue;
            };
            log::trace!("{}:{}: {} is {}", source.name(), line.number, name, class);
            if let Some(old) = self.classes.insert(name.to_string(), class)
                && !old.is_equivalent(class)
            {
                diagnostics.push(
                    Some(source.location(line.number, line.span)),
                    DiagnosticKind::ClassRedefined {
                        name: name.into_owned(),
                        old,
                        new: class,
                    },
                );
            }
        }
        (self, diagnostics)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<MathClass> {
        self.classes.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// A declaration line after `\mathchardef` runs have been split apart and dangling
/// `\DeclareMathDelimiter{name}` lines have been joined with their continuation.
#[derive(Debug)]
struct LogicalLine<'source> {
    number: usize,
    span: Range<usize>,
    text: Cow<'source, str>,
}

fn logical_lines(source: &SourceFile) -> Vec<LogicalLine<'_>> {
    let mut lines = Vec::new();
    let mut pending: Option<LogicalLine<'_>> = None;
    for line in source.lines() {
        for (span, text) in split_mathchardefs(&line) {
            let segment = match pending.take() {
                Some(mut head) => {
                    head.text.to_mut().push_str(text.trim_start_matches(' '));
                    head.span.end = span.end;
                    head
                }
                None => LogicalLine {
                    number: line.number,
                    span,
                    text: Cow::Borrowed(text),
                },
            };
            if is_dangling_delimiter(&segment.text) {
                pending = Some(LogicalLine {
                    text: Cow::Owned(tex_strip(&segment.text).to_string()),
                    ..segment
                });
            } else {
                lines.push(segment);
            }
        }
    }
    lines.extend(pending);
    lines
}

/// Plain TeX puts several `\mathchardef`s on one line, separated by spaces.
fn split_mathchardefs<'source>(line: &Line<'source>) -> Vec<(Range<usize>, &'source str)> {
    let text = line.text;
    let mut segments = Vec::new();
    let mut start = 0usize;
    for idx in memmem::find_iter(text.as_bytes(), br"\mathchardef") {
        let end = text[..idx].trim_end_matches(' ').len();
        if idx == 0 || end == idx || end <= start {
            continue;
        }
        segments.push((offset(line, start..end), &text[start..end]));
        start = idx;
    }
    segments.push((offset(line, start..text.len()), &text[start..]));
    segments
}

#[inline]
fn offset(line: &Line<'_>, range: Range<usize>) -> Range<usize> {
    (line.span.start + range.start)..(line.span.start + range.end)
}

fn is_dangling_delimiter(text: &str) -> bool {
    let text = tex_strip(text);
    text.starts_with(r"\DeclareMathDelimiter{") && text.find('}') == Some(text.len() - 1)
}

/// `\let` aliases, keyed by the alias being defined.
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    aliases: FxHashMap<String, String>,
}

impl AliasTable {
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = &'a SourceFile>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        sources.into_iter().fold(Self::default(), |table, source| {
            let (table, found) = table.merge(source);
            diagnostics.append(found);
            table
        })
    }

    pub fn merge(mut self, source: &SourceFile) -> (Self, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        for line in source.lines() {
            let Declaration::Alias { to, from } = recognize_alias(line.text) else {
                continue;
            };
            if let Some(old) = self.aliases.insert(to.to_string(), from.to_string())
                && old != from
            {
                diagnostics.push(
                    Some(source.location(line.number, line.span)),
                    DiagnosticKind::AliasRedefined {
                        name: to.into_owned(),
                        old,
                        new: from.into_owned(),
                    },
                );
            }
        }
        (self, diagnostics)
    }

    #[inline]
    pub fn get(&self, to: &str) -> Option<&str> {
        self.aliases.get(to).map(String::as_str)
    }

    /// All `(to, from)` pairs, sorted by `to`.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(to, from)| (to.as_str(), from.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Read the text operators (`\sin`, `\lim`, ...) defined by the given files. A later definition
/// silently replaces an earlier one. The result is sorted by control sequence.
pub fn read_text_operators<'a>(
    sources: impl IntoIterator<Item = &'a SourceFile>,
) -> Vec<OperatorRecord> {
    let mut operators: FxHashMap<String, OperatorRecord> = FxHashMap::default();
    for source in sources {
        for line in source.lines() {
            if let Declaration::Operator {
                name,
                text,
                no_limits,
            } = recognize_operator(line.text)
            {
                operators.insert(name.to_string(), OperatorRecord::text(name, text, no_limits));
            }
        }
    }
    let mut operators: Vec<OperatorRecord> = operators.into_values().collect();
    operators.sort_by(|a, b| a.control_sequence.cmp(&b.control_sequence));
    operators
}
