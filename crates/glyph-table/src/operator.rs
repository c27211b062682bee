//! Large operators (`\sum`, `\intop`, ...) and text operators (`\sin`, `\lim`, ...).

use crate::code_point::CodePoint;
use crate::source::SourceFile;
use crate::symbol_table::read_table_rows;

/// What an operator renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OperatorGlyph {
    /// A single symbol from the large-operator font.
    Symbol(CodePoint),
    /// A word set in the operator font.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OperatorRecord {
    pub control_sequence: String,
    pub glyph: OperatorGlyph,
    /// Limits are set as sub/superscripts even in display style.
    pub no_limits: bool,
}

impl OperatorRecord {
    pub fn symbol(control_sequence: impl Into<String>, code: CodePoint, no_limits: bool) -> Self {
        Self {
            control_sequence: control_sequence.into(),
            glyph: OperatorGlyph::Symbol(code),
            no_limits,
        }
    }

    pub fn text(
        control_sequence: impl Into<String>,
        text: impl Into<String>,
        no_limits: bool,
    ) -> Self {
        Self {
            control_sequence: control_sequence.into(),
            glyph: OperatorGlyph::Text(text.into()),
            no_limits,
        }
    }

    #[inline]
    pub fn is_symbol(&self) -> bool {
        matches!(self.glyph, OperatorGlyph::Symbol(_))
    }

    pub fn code_point(&self) -> Option<CodePoint> {
        match self.glyph {
            OperatorGlyph::Symbol(code) => Some(code),
            OperatorGlyph::Text(_) => None,
        }
    }

    pub fn text_expansion(&self) -> Option<&str> {
        match &self.glyph {
            OperatorGlyph::Symbol(_) => None,
            OperatorGlyph::Text(text) => Some(text),
        }
    }
}

/// Build the operator table from the large-operator tables and the text operators.
///
/// Every large operator whose name contains `intop` also gets an `int` variant with
/// `\nolimits`, the way plain TeX defines `\int` as `\intop\nolimits`. The result is sorted by
/// control sequence; the sort is stable so that a large operator precedes a text operator of
/// the same name.
pub fn build_operator_table<'a>(
    large_operator_tables: impl IntoIterator<Item = &'a SourceFile>,
    text_operators: Vec<OperatorRecord>,
) -> Vec<OperatorRecord> {
    let rows = read_table_rows(large_operator_tables);
    let mut operators = Vec::with_capacity(rows.records.len() + text_operators.len());
    for record in rows.records.into_iter().map(|located| located.value) {
        let Some(code) = record.code_point() else {
            continue;
        };
        if record.control_sequence.contains("intop") {
            operators.push(OperatorRecord::symbol(
                record.control_sequence.replace("intop", "int"),
                code,
                true,
            ));
        }
        operators.push(OperatorRecord::symbol(record.control_sequence, code, false));
    }
    log::info!(
        "{} large operators, {} text operators",
        operators.len(),
        text_operators.len()
    );
    operators.extend(text_operators);
    operators.sort_by(|a, b| a.control_sequence.cmp(&b.control_sequence));
    operators
}
