//! Reader for fontinst encoding files (`.etx`).
//!
//! Only the human-written slot comments are of interest. A slot looks like
//!
//! ```text
//! \setslot{arrowleft}
//!    \comment{A left arrow `$\leftarrow$'.}
//! \endsetslot
//! ```
//!
//! and the control sequence is recovered from the comment prose by a handful of rewriting
//! rules. The rules know nothing about TeX syntax beyond what these comments contain, so an
//! extraction that still has braces in it is reported.

use crate::code_point::CodePoint;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::glyph_list::GlyphList;
use crate::macro_package::ClassTable;
use crate::source::{SourceFile, tex_strip};
use crate::symbol_table::SymbolRecord;

/// Comments that the rewriting rules get wrong for the encodings in use.
static CORRECTIONS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    r"\not=" => r"\not",
    r"\t oo" => r"\t",
};

/// A control sequence recovered from a slot comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub code: String,
    /// The glyph name given to `\setslot`.
    pub slot: String,
}

#[derive(Debug, Default)]
struct Scanner {
    slot: String,
    comment: Option<String>,
    in_comment: bool,
}

impl Scanner {
    fn comment_line(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix(r"\comment{") {
            match rest.strip_suffix('}') {
                Some(comment) => {
                    self.comment = Some(comment.to_string());
                    self.in_comment = false;
                }
                None => self.comment = Some(rest.to_string()),
            }
            return;
        }
        let comment = self.comment.get_or_insert_with(String::new);
        comment.push(' ');
        match line.strip_suffix('}') {
            Some(last) => {
                comment.push_str(last);
                self.in_comment = false;
            }
            None => comment.push_str(line),
        }
    }
}

/// Scan an ETX file for `\setslot` blocks and recover one control sequence per commented slot.
pub fn read_etx(source: &SourceFile, diagnostics: &mut Diagnostics) -> Vec<SlotEntry> {
    let mut scanner = Scanner::default();
    let mut entries = Vec::new();
    for line in source.lines() {
        let text = tex_strip(line.text);
        if let Some(slot) = text
            .strip_prefix(r"\setslot{")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            scanner.slot = slot.to_string();
        } else if text.starts_with(r"\comment{") {
            scanner.in_comment = true;
        }

        if text == r"\endsetslot" {
            let slot = std::mem::take(&mut scanner.slot);
            let location = source.location(line.number, line.span);
            let comment = scanner.comment.take().unwrap_or_default();
            scanner.in_comment = false;
            if comment.trim().is_empty() {
                diagnostics.push(Some(location), DiagnosticKind::EmptySlotComment { slot });
                continue;
            }
            let code = extract_control_sequence(&comment);
            if code.contains(['{', '}']) {
                diagnostics.push(
                    Some(location),
                    DiagnosticKind::LowConfidenceExtraction {
                        slot: slot.clone(),
                        code: code.clone(),
                    },
                );
            }
            log::trace!("{}:{}: {} -> {}", source.name(), line.number, slot, code);
            entries.push(SlotEntry { code, slot });
        } else if scanner.in_comment {
            scanner.comment_line(text);
        }
    }
    entries
}

/// Reduce a slot comment to the control sequence or character it describes.
pub fn extract_control_sequence(comment: &str) -> String {
    let code = inside_math(comment);
    let code = inside_quotes(code);
    let code = strip_placeholder_arguments(code);
    let code = unwrap_macro_arguments(&code);
    let code = strip_accent_placeholders(&code);
    match CORRECTIONS.get(code.as_str()) {
        Some(corrected) => corrected.to_string(),
        None => code,
    }
}

/// The text between the first pair of `$`, if there is one.
fn inside_math(text: &str) -> &str {
    let text = text.split_once('$').map_or(text, |(_, rest)| rest);
    text.split_once('$').map_or(text, |(inner, _)| inner)
}

/// The text after the first backtick, up to the first unescaped `'`.
fn inside_quotes(text: &str) -> &str {
    let text = text.split_once('`').map_or(text, |(_, rest)| rest);
    let bytes = text.as_bytes();
    match memchr::memchr_iter(b'\'', bytes).find(|&idx| idx == 0 || bytes[idx - 1] != b'\\') {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// The run of lowercase ASCII letters at the start of `text`.
#[inline]
fn lowercase_run(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_lowercase).count()
}

/// `\hat{a}` becomes `\hat`.
fn strip_placeholder_arguments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let name_len = lowercase_run(after);
        let argument = after[name_len..].as_bytes();
        if let [b'{', b'a' | b'x', b'}', ..] = argument {
            out.push_str(&rest[idx..idx + 1 + name_len]);
            rest = &after[name_len + 3..];
        } else {
            out.push('\\');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// `\mathit{B}` becomes `B`.
fn unwrap_macro_arguments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let name_len = lowercase_run(after);
        let argument = after[name_len..]
            .strip_prefix('{')
            .and_then(|arg| arg.split_once('}'));
        match argument {
            Some((inner, tail)) => {
                out.push_str(inner);
                rest = tail;
            }
            None => {
                out.push('\\');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// `\" a` and `\'a` become `\"` and `\'`: an accent applied to a placeholder letter.
fn strip_accent_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let mut chars = after.chars();
        let accent = chars.next().filter(|c| !matches!(c, 'a' | 'x'));
        if let Some(accent) = accent {
            let tail = chars.as_str().trim_start_matches(' ');
            let mut tail_chars = tail.chars();
            if matches!(tail_chars.next(), Some('a' | 'x'))
                && !tail_chars.next().is_some_and(|c| c.is_ascii_lowercase())
            {
                out.push('\\');
                out.push(accent);
                rest = &tail[1..];
                continue;
            }
        }
        out.push('\\');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Turn the recovered slots into table rows: the class comes from the macro packages, the code
/// points from the glyph lists. Rows are ordered by their first code point, slots without one
/// first.
pub fn etx_table(
    entries: &[SlotEntry],
    classes: &ClassTable,
    glyph_list: &GlyphList,
) -> Vec<SymbolRecord> {
    let mut records: Vec<SymbolRecord> = entries
        .iter()
        .map(|entry| SymbolRecord {
            slot: glyph_list
                .get(&entry.slot)
                .map(<[CodePoint]>::to_vec)
                .unwrap_or_default(),
            math_class: classes.get(&entry.code),
            upright: true,
            control_sequence: entry.code.clone(),
        })
        .collect();
    records.sort_by_key(|record| record.code_point().unwrap_or(CodePoint::NULL));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MathClass;

    #[test]
    fn comment_heuristics() {
        let cases = [
            (r"A left arrow `$\leftarrow$'.", r"\leftarrow"),
            (r"The integral sign `\int'.", r"\int"),
            (r"The letter `$\mathit{B}$'.", "B"),
            (r"A hat accent `\hat{a}'.", r"\hat"),
            (r#"An umlaut `\" a'."#, r#"\""#),
            (r"An acute accent `\'a'.", r"\'"),
            (r"A negated equals `$\not=$'.", r"\not"),
            (r"A tie `\t oo'.", r"\t"),
            (r"Greek `$\alpha$' as in alpha.", r"\alpha"),
            (r"Dotless `\imath'.", r"\imath"),
        ];
        for (comment, expected) in cases {
            assert_eq!(extract_control_sequence(comment), expected, "{comment}");
        }
    }

    #[test]
    fn accent_keeps_following_words() {
        assert_eq!(strip_accent_placeholders(r"\b ax"), r"\b ax");
        assert_eq!(strip_accent_placeholders(r"\b a"), r"\b");
        assert_eq!(strip_accent_placeholders(r"\ax"), r"\ax");
    }

    #[test]
    fn multi_line_comments() {
        let etx = SourceFile::from_text(
            "mathsy.etx",
            "\\setslot{arrowdblleft}\n   \\comment{A double left arrow\n      `$\\Leftarrow$'.}\n\\endsetslot\n\n\\setslot{minus}\n   \\comment{A minus sign `$-$'.}\n   \\ligature{LIG}{x}{y}\n\\endsetslot\n",
        );
        let mut diagnostics = Diagnostics::new();
        let entries = read_etx(&etx, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(
            entries,
            [
                SlotEntry {
                    code: r"\Leftarrow".to_string(),
                    slot: "arrowdblleft".to_string(),
                },
                SlotEntry {
                    code: "-".to_string(),
                    slot: "minus".to_string(),
                },
            ]
        );
    }

    #[test]
    fn uncommented_and_unclear_slots() {
        let etx = SourceFile::from_text(
            "mathsy.etx",
            "\\setslot{uni0000}\n\\endsetslot\n\\setslot{braceleft}\n\\comment{Left brace `$\\left\\{$'.}\n\\endsetslot\n",
        );
        let mut diagnostics = Diagnostics::new();
        let entries = read_etx(&etx, &mut diagnostics);
        assert_eq!(entries.len(), 1);
        let kinds: Vec<&'static str> = diagnostics.kinds().map(<&str>::from).collect();
        assert_eq!(kinds, ["EmptySlotComment", "LowConfidenceExtraction"]);
    }

    #[test]
    fn table_rows_sorted_by_code_point() {
        let entries = [
            SlotEntry {
                code: r"\leftarrow".to_string(),
                slot: "arrowleft".to_string(),
            },
            SlotEntry {
                code: r"\mystery".to_string(),
                slot: "unknownglyph".to_string(),
            },
            SlotEntry {
                code: "-".to_string(),
                slot: "minus".to_string(),
            },
        ];
        let fontmath = SourceFile::from_text(
            "fontmath.ltx",
            "\\DeclareMathSymbol{\\leftarrow}{\\mathrel}{symbols}{\"20}\n",
        );
        let mut diagnostics = Diagnostics::new();
        let classes = ClassTable::from_sources([&fontmath], &mut diagnostics);
        let glyphs = GlyphList::from_sources([&SourceFile::from_text(
            "glyphlist.txt",
            "arrowleft;2190\nminus;2212\n",
        )]);
        let rows = etx_table(&entries, &classes, &glyphs);
        let summary: Vec<(Option<CodePoint>, Option<MathClass>, &str)> = rows
            .iter()
            .map(|r| (r.code_point(), r.math_class, r.control_sequence.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                (None, None, r"\mystery"),
                (Some(CodePoint::new(0x2190)), Some(MathClass::Rel), r"\leftarrow"),
                (Some(CodePoint::new(0x2212)), None, "-"),
            ]
        );
    }
}
