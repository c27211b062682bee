use std::fmt;
use std::ops::Range;

use strum_macros::IntoStaticStr;

use crate::MathClass;

/// Where in an input file a diagnostic was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The file name as it was given to the reader.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// Byte range of the offending line within the file.
    pub span: Range<usize>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A recoverable problem found while building a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Option<Location>,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum DiagnosticKind {
    /// A symbol's math class changed to a non-equivalent class. The new class is kept.
    ClassRedefined {
        name: String,
        old: MathClass,
        new: MathClass,
    },
    /// An alias was pointed at a different target. The new target is kept.
    AliasRedefined {
        name: String,
        old: String,
        new: String,
    },
    /// The alias source is not in the base table; the alias is dropped.
    UnresolvedAlias { to: String, from: String },
    /// The alias destination already exists in the base table; the alias is dropped.
    TargetAlreadyDefined { to: String, from: String },
    /// Two primary table rows share a control sequence; the first one is kept.
    DuplicateSymbol { control_sequence: String },
    /// An ETX comment could not be reduced to a bare control sequence.
    LowConfidenceExtraction { slot: String, code: String },
    /// An ETX slot carries no comment to recover a control sequence from.
    EmptySlotComment { slot: String },
}

impl DiagnosticKind {
    /// The one-line message, without location.
    pub fn message(&self) -> String {
        match self {
            DiagnosticKind::ClassRedefined { name, old, new } => {
                format!("type of `{name}' is redefined from {old} to {new}")
            }
            DiagnosticKind::AliasRedefined { name, old, new } => {
                format!("alias `{name}' is redefined from {old} to {new}")
            }
            DiagnosticKind::UnresolvedAlias { to, from } => {
                format!("source glyph `{from}' of alias `{to}' undefined")
            }
            DiagnosticKind::TargetAlreadyDefined { to, from } => {
                format!("target glyph `{to}' defined (`{from}' intended?)")
            }
            DiagnosticKind::DuplicateSymbol { control_sequence } => {
                format!("glyph `{control_sequence}' defined more than once")
            }
            DiagnosticKind::LowConfidenceExtraction { slot, code } => {
                format!("slot `{slot}' extracted as `{code}', which still contains braces")
            }
            DiagnosticKind::EmptySlotComment { slot } => {
                format!("slot `{slot}' has no comment")
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::ClassRedefined { .. } | DiagnosticKind::AliasRedefined { .. } => {
                "redefined here"
            }
            DiagnosticKind::UnresolvedAlias { .. } => "alias source not found",
            DiagnosticKind::TargetAlreadyDefined { .. } => "alias target already exists",
            DiagnosticKind::DuplicateSymbol { .. } => "duplicate definition",
            DiagnosticKind::LowConfidenceExtraction { .. } => "unstripped macro argument",
            DiagnosticKind::EmptySlotComment { .. } => "slot ends here",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "warning: {}", self.kind.message())
    }
}

#[cfg(feature = "ariadne")]
impl Diagnostic {
    /// Convert this diagnostic into an [`ariadne::Report`] for pretty-printing.
    ///
    /// Returns `None` for diagnostics that are not tied to a source line.
    pub fn to_report(
        &self,
        with_color: bool,
    ) -> Option<ariadne::Report<'static, (&str, Range<usize>)>> {
        use ariadne::{Label, Report, ReportKind};

        let location = self.location.as_ref()?;
        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        let name = location.file.as_str();
        Some(
            Report::build(ReportKind::Warning, (name, location.span.clone()))
                .with_config(config)
                .with_message(self.kind.message())
                .with_label(Label::new((name, location.span.clone())).with_message(self.kind.label()))
                .finish(),
        )
    }
}

/// Collects diagnostics in the order they were raised.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, location: Option<Location>, kind: DiagnosticKind) {
        log::trace!("{}: {}", <&str>::from(&kind), kind.message());
        self.0.push(Diagnostic { location, kind });
    }

    pub(crate) fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// The kinds of all collected diagnostics, in order. Mostly useful in tests.
    pub fn kinds(&self) -> impl Iterator<Item = &DiagnosticKind> {
        self.0.iter().map(|d| &d.kind)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_location() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(
            Some(Location {
                file: "amssymb.sty".to_string(),
                line: 12,
                span: 200..240,
            }),
            DiagnosticKind::ClassRedefined {
                name: r"\square".to_string(),
                old: MathClass::Ord,
                new: MathClass::Bin,
            },
        );
        diagnostics.push(
            None,
            DiagnosticKind::UnresolvedAlias {
                to: r"\foo".to_string(),
                from: r"\bar".to_string(),
            },
        );
        let lines: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                r"amssymb.sty:12: warning: type of `\square' is redefined from Ord to Bin",
                r"warning: source glyph `\bar' of alias `\foo' undefined",
            ]
        );
    }

    #[cfg(feature = "ariadne")]
    #[test]
    fn report_needs_a_location() {
        let diagnostic = Diagnostic {
            location: None,
            kind: DiagnosticKind::DuplicateSymbol {
                control_sequence: r"\alpha".to_string(),
            },
        };
        assert!(diagnostic.to_report(false).is_none());
    }
}
