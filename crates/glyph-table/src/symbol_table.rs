//! The tab-separated symbol tables and the builder that merges them with the alias table.
//!
//! A table row has four tab-separated columns: `slot`, `type`, `upright`, `control sequence`.
//! The slot is a comma-separated list of hexadecimal code points or `-` if the symbol has no
//! code point yet, the type is a [`MathClass`] name or `-`, and an upright flag of `0` marks
//! a symbol that follows the italic math font.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::MathClass;
use crate::code_point::CodePoint;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::source::SourceFile;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SymbolRecord {
    /// Code points of the glyph; empty for an uncoded symbol.
    pub slot: Vec<CodePoint>,
    /// `None` is written as `-`: the class is not known and the symbol is treated as `Ord`.
    pub math_class: Option<MathClass>,
    pub upright: bool,
    pub control_sequence: String,
}

impl SymbolRecord {
    /// The first code point of the slot, which is the one the renderer uses.
    #[inline]
    pub fn code_point(&self) -> Option<CodePoint> {
        self.slot.first().copied()
    }

    /// Upright as the emitted table sees it: symbols without a class are always upright.
    #[inline]
    pub fn is_upright(&self) -> bool {
        self.math_class.is_none() || self.upright
    }

    fn parse(line: &str) -> Option<Self> {
        let mut columns = line.split('\t');
        let (slot, class, upright, control_sequence) = (
            columns.next()?,
            columns.next()?,
            columns.next()?,
            columns.next()?,
        );
        if columns.next().is_some() {
            return None;
        }
        let slot = if slot == "-" {
            Vec::new()
        } else {
            CodePoint::parse_list(slot)?
        };
        let math_class = if class == "-" {
            None
        } else {
            Some(class.parse().ok()?)
        };
        Some(SymbolRecord {
            slot,
            math_class,
            upright: upright != "0",
            control_sequence: control_sequence.to_string(),
        })
    }

    #[inline]
    fn is_character(&self) -> bool {
        !self.control_sequence.starts_with('\\')
    }
}

/// A value together with the table line it was read from.
#[derive(Debug, Clone)]
pub(crate) struct Located<T> {
    pub value: T,
    pub location: Location,
}

/// The rows of one or more table files, split the way the builder consumes them.
#[derive(Debug, Default)]
pub(crate) struct TableRows {
    /// Coded rows whose control sequence is a command, in input order.
    pub records: Vec<Located<SymbolRecord>>,
    /// Coded rows whose control sequence is a literal character, verbatim.
    pub character_lines: Vec<String>,
    /// Rows without a slot, and non-blank lines without a tab, verbatim.
    pub uncoded_lines: Vec<String>,
}

pub(crate) fn read_table_rows<'a>(sources: impl IntoIterator<Item = &'a SourceFile>) -> TableRows {
    let mut rows = TableRows::default();
    for source in sources {
        for line in source.lines() {
            let text = line.text.trim_end_matches('\r');
            if text.starts_with('#') || text.trim().is_empty() {
                continue;
            }
            if !text.contains('\t') || text.split('\t').next() == Some("-") {
                rows.uncoded_lines.push(text.to_string());
                continue;
            }
            let Some(record) = SymbolRecord::parse(text) else {
                log::debug!("{}:{}: skipping `{}'", source.name(), line.number, text);
                continue;
            };
            if record.is_character() {
                rows.character_lines.push(text.to_string());
            } else {
                rows.records.push(Located {
                    value: record,
                    location: source.location(line.number, line.span),
                });
            }
        }
    }
    rows
}

/// A row of an alias table: `to<TAB>from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEdge {
    pub to: String,
    pub from: String,
}

pub(crate) fn read_alias_rows<'a>(
    sources: impl IntoIterator<Item = &'a SourceFile>,
) -> Vec<Located<AliasEdge>> {
    let mut edges = Vec::new();
    for source in sources {
        for line in source.lines() {
            let text = line.text.trim_end_matches('\r');
            if text.starts_with('#') || !text.contains('\t') {
                continue;
            }
            let mut columns = text.split('\t');
            let (Some(to), Some(from), None) = (columns.next(), columns.next(), columns.next())
            else {
                log::debug!("{}:{}: skipping `{}'", source.name(), line.number, text);
                continue;
            };
            edges.push(Located {
                value: AliasEdge {
                    to: to.to_string(),
                    from: from.to_string(),
                },
                location: source.location(line.number, line.span),
            });
        }
    }
    edges.sort_by(|a, b| a.value.to.cmp(&b.value.to));
    edges
}

#[inline]
fn by_control_sequence(a: &SymbolRecord, b: &SymbolRecord) -> Ordering {
    a.control_sequence.cmp(&b.control_sequence)
}

/// The resolved symbol table: unique control sequences in sorted order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
    character_lines: Vec<String>,
    uncoded_lines: Vec<String>,
}

impl SymbolTable {
    /// Merge the primary tables in the given order and add the aliases on top.
    pub fn build<'a>(
        tables: impl IntoIterator<Item = &'a SourceFile>,
        alias_tables: impl IntoIterator<Item = &'a SourceFile>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let TableRows {
            mut records,
            character_lines,
            uncoded_lines,
        } = read_table_rows(tables);

        records.sort_by(|a, b| by_control_sequence(&a.value, &b.value));
        let mut base: Vec<SymbolRecord> = Vec::with_capacity(records.len());
        for Located { value, location } in records {
            if base
                .last()
                .is_some_and(|last| last.control_sequence == value.control_sequence)
            {
                diagnostics.push(
                    Some(location),
                    DiagnosticKind::DuplicateSymbol {
                        control_sequence: value.control_sequence,
                    },
                );
            } else {
                base.push(value);
            }
        }

        let aliases = read_alias_rows(alias_tables);
        let resolved = resolve_aliases(&base, &aliases, diagnostics);
        log::info!(
            "{} symbols, {} of {} aliases resolved",
            base.len(),
            resolved.len(),
            aliases.len()
        );
        base.extend(resolved);
        base.sort_by(by_control_sequence);
        Self {
            records: base,
            character_lines,
            uncoded_lines,
        }
    }

    #[inline]
    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    pub fn get(&self, control_sequence: &str) -> Option<&SymbolRecord> {
        self.records
            .binary_search_by(|record| record.control_sequence.as_str().cmp(control_sequence))
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Records whose math class has not been assigned yet.
    pub fn typeless(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.records.iter().filter(|r| r.math_class.is_none())
    }

    pub fn character_lines(&self) -> &[String] {
        &self.character_lines
    }

    pub fn uncoded_lines(&self) -> &[String] {
        &self.uncoded_lines
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Turn every alias into a copy of the record it finally points at, under the alias's name.
///
/// `base` must be sorted and free of duplicates, `aliases` sorted by `to`.
fn resolve_aliases(
    base: &[SymbolRecord],
    aliases: &[Located<AliasEdge>],
    diagnostics: &mut Diagnostics,
) -> Vec<SymbolRecord> {
    let index: FxHashMap<&str, &SymbolRecord> = base
        .iter()
        .map(|record| (record.control_sequence.as_str(), record))
        .collect();
    let mut edges: FxHashMap<&str, &str> = FxHashMap::default();
    for Located { value, .. } in aliases {
        edges.entry(value.to.as_str()).or_insert(value.from.as_str());
    }

    let mut defined: FxHashSet<&str> = FxHashSet::default();
    let mut resolved = Vec::new();
    for Located { value: edge, location } in aliases {
        if index.contains_key(edge.to.as_str()) || !defined.insert(edge.to.as_str()) {
            diagnostics.push(
                Some(location.clone()),
                DiagnosticKind::TargetAlreadyDefined {
                    to: edge.to.clone(),
                    from: edge.from.clone(),
                },
            );
            continue;
        }
        match follow(&index, &edges, &edge.from) {
            Some(record) => resolved.push(SymbolRecord {
                control_sequence: edge.to.clone(),
                ..record.clone()
            }),
            None => diagnostics.push(
                Some(location.clone()),
                DiagnosticKind::UnresolvedAlias {
                    to: edge.to.clone(),
                    from: edge.from.clone(),
                },
            ),
        }
    }
    resolved
}

/// Follow an alias chain starting at `from` until it reaches a base record. Cycles and dead ends
/// yield `None`.
fn follow<'a, 'b>(
    index: &FxHashMap<&str, &'a SymbolRecord>,
    edges: &FxHashMap<&'b str, &'b str>,
    from: &'b str,
) -> Option<&'a SymbolRecord> {
    let mut current = from;
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    loop {
        if let Some(&record) = index.get(current) {
            return Some(record);
        }
        if !seen.insert(current) {
            return None;
        }
        current = *edges.get(current)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(tables: &[&str], aliases: &str) -> (SymbolTable, Diagnostics) {
        let tables: Vec<SourceFile> = tables
            .iter()
            .enumerate()
            .map(|(idx, text)| SourceFile::from_text(format!("table{idx}.txt"), *text))
            .collect();
        let aliases = SourceFile::from_text("alias_map.txt", aliases);
        let mut diagnostics = Diagnostics::new();
        let table = SymbolTable::build(&tables, [&aliases], &mut diagnostics);
        (table, diagnostics)
    }

    #[test]
    fn parse_rows() {
        assert_eq!(
            SymbolRecord::parse("03B1\tOrd\t0\t\\alpha"),
            Some(SymbolRecord {
                slot: vec![CodePoint::new(0x3B1)],
                math_class: Some(MathClass::Ord),
                upright: false,
                control_sequence: r"\alpha".to_string(),
            })
        );
        assert_eq!(
            SymbolRecord::parse("-\t-\t1\t\\foo").map(|r| (r.slot, r.math_class)),
            Some((vec![], None))
        );
        assert_eq!(SymbolRecord::parse("03B1\tOrdinary\t0\t\\alpha"), None);
        assert_eq!(SymbolRecord::parse("03B1\tOrd\t0"), None);
        assert_eq!(SymbolRecord::parse("03B1\tOrd\t0\t\\alpha\textra"), None);
    }

    #[test]
    fn rows_are_split_by_kind() {
        let source = SourceFile::from_text(
            "lmp2_map.txt",
            "# comment\n0041\tAlpha\t0\tA\n-\tRel\t1\t\\nrelbar\n2190\tRel\t1\t\\leftarrow\n\\mapstochar\n-\tRelation\t1\t\\nrelbaz\n\n",
        );
        let rows = read_table_rows([&source]);
        assert_eq!(rows.records.len(), 1);
        assert_eq!(rows.records[0].location.line, 4);
        assert_eq!(rows.character_lines, ["0041\tAlpha\t0\tA"]);
        assert_eq!(
            rows.uncoded_lines,
            ["-\tRel\t1\t\\nrelbar", "\\mapstochar", "-\tRelation\t1\t\\nrelbaz"]
        );
    }

    #[test]
    fn reordered_tables_stay_sorted_and_unique() {
        let mt2sya = "2192\tRel\t1\t\\to\n0078\tOrd\t0\t\\x\n";
        let lucida = "21A6\tRel\t1\t\\to\n";
        let aliases = "\\gets\t\\to\n\\x\t\\to\n";
        for (tables, first) in [([mt2sya, lucida], 0x2192), ([lucida, mt2sya], 0x21A6)] {
            let (table, diagnostics) = build(&tables, aliases);
            let names: Vec<&str> = table
                .records()
                .iter()
                .map(|r| r.control_sequence.as_str())
                .collect();
            assert_eq!(names, [r"\gets", r"\to", r"\x"]);
            assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
            assert_eq!(table.get(r"\to").unwrap().slot, [CodePoint::new(first)]);
            assert_eq!(table.get(r"\gets").unwrap().slot, [CodePoint::new(first)]);
            assert_eq!(table.get(r"\x").unwrap().slot, [CodePoint::new(0x78)]);
            let kinds: Vec<&str> = diagnostics.kinds().map(<&str>::from).collect();
            assert_eq!(kinds, ["DuplicateSymbol", "TargetAlreadyDefined"]);
        }
    }

    #[test]
    fn alias_copies_base_record() {
        let (table, diagnostics) = build(&["03F5\tOrd\t0\t\\epsilon\n"], "\\eps\t\\epsilon\n");
        assert!(diagnostics.is_empty());
        let eps = table.get(r"\eps").unwrap();
        assert_eq!(eps.slot, [CodePoint::new(0x3F5)]);
        assert_eq!(eps.math_class, Some(MathClass::Ord));
        assert!(!eps.upright);
    }

    #[test]
    fn unresolved_alias_is_dropped() {
        let (table, diagnostics) = build(&["03F5\tOrd\t0\t\\epsilon\n"], "\\foo\t\\bar\n");
        assert!(table.get(r"\foo").is_none());
        assert_eq!(
            diagnostics.kinds().collect::<Vec<_>>(),
            [&DiagnosticKind::UnresolvedAlias {
                to: r"\foo".to_string(),
                from: r"\bar".to_string(),
            }]
        );
    }

    #[test]
    fn alias_may_not_replace_base_record() {
        let (table, diagnostics) = build(
            &["2190\tRel\t1\t\\gets\n2192\tRel\t1\t\\to\n"],
            "\\gets\t\\to\n",
        );
        assert_eq!(table.get(r"\gets").unwrap().slot, [CodePoint::new(0x2190)]);
        assert!(matches!(
            diagnostics.kinds().next(),
            Some(DiagnosticKind::TargetAlreadyDefined { .. })
        ));
    }

    #[test]
    fn alias_chains_and_cycles() {
        let (table, diagnostics) = build(
            &["2260\tRel\t1\t\\neq\n"],
            "\\ne\t\\neq\n\\notequal\t\\ne\n\\x\t\\y\n\\y\t\\x\n",
        );
        assert_eq!(table.get(r"\notequal").unwrap().slot, [CodePoint::new(0x2260)]);
        let unresolved: Vec<&str> = diagnostics
            .kinds()
            .filter_map(|kind| match kind {
                DiagnosticKind::UnresolvedAlias { to, .. } => Some(to.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(unresolved, [r"\x", r"\y"]);
    }

    #[test]
    fn duplicates_keep_first_in_order() {
        let (table, diagnostics) = build(
            &["2192\tRel\t1\t\\to\n", "27F6\tRel\t1\t\\to\n2190\tRel\t1\t\\gets\n"],
            "",
        );
        let names: Vec<&str> = table
            .records()
            .iter()
            .map(|r| r.control_sequence.as_str())
            .collect();
        assert_eq!(names, [r"\gets", r"\to"]);
        assert_eq!(table.get(r"\to").unwrap().slot, [CodePoint::new(0x2192)]);
        let location = &diagnostics.iter().next().unwrap().location;
        assert_eq!(location.as_ref().map(|l| l.file.as_str()), Some("table1.txt"));
    }

    #[test]
    fn typeless_rows() {
        let (table, _) = build(&["2A00\t-\t1\t\\bigodot\n2211\tOp\t1\t\\sum\n"], "");
        let typeless: Vec<&str> = table
            .typeless()
            .map(|r| r.control_sequence.as_str())
            .collect();
        assert_eq!(typeless, [r"\bigodot"]);
    }
}
