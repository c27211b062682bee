//! Serialization of the resolved tables.
//!
//! Two forms are written: the tab-separated table format that the builder itself reads, and
//! C++ array definitions that the renderer includes verbatim. Nothing is reordered or
//! filtered here.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::code_point::{CodePoint, SlotDisplay};
use crate::operator::{OperatorGlyph, OperatorRecord};
use crate::symbol_table::SymbolRecord;

/// A `wchar_t` literal for a code point.
pub fn ucs_c_form(code: CodePoint) -> String {
    match code {
        CodePoint::SENTINEL => code.value().to_string(),
        CodePoint::NULL => r"L'\0'".to_string(),
        _ => match code.value() {
            value @ 0..0x80 => format!(r"L'\{value:03o}'"),
            value @ 0x80..0x10000 => format!(r"L'\u{value:04x}'"),
            value => format!(r"L'\U{value:08x}'"),
        },
    }
}

/// Escape a string for a C string or character literal.
pub fn escape_c_form(text: &str) -> Cow<'_, str> {
    if text.contains(['\\', '"']) {
        Cow::Owned(text.replace('\\', r"\\").replace('"', r#"\""#))
    } else {
        Cow::Borrowed(text)
    }
}

/// Write `slot<TAB>type<TAB>upright<TAB>control sequence` rows.
pub fn write_tsv<W: Write>(out: &mut W, records: &[SymbolRecord]) -> fmt::Result {
    for record in records {
        let class: &str = record.math_class.map_or("-", <&str>::from);
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            SlotDisplay(&record.slot),
            class,
            u8::from(record.upright),
            record.control_sequence
        )?;
    }
    Ok(())
}

pub fn write_lines<W: Write, S: AsRef<str>>(out: &mut W, lines: &[S]) -> fmt::Result {
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}

/// Write `to<TAB>from` rows.
pub fn write_alias_pairs<W: Write>(out: &mut W, pairs: &[(&str, &str)]) -> fmt::Result {
    for (to, from) in pairs {
        writeln!(out, "{to}\t{from}")?;
    }
    Ok(())
}

/// A C++ array definition, one element per line.
struct ArrayWriter<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> ArrayWriter<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    fn array<T>(
        &mut self,
        declaration: &str,
        items: &[T],
        mut element: impl FnMut(&T) -> String,
    ) -> fmt::Result {
        writeln!(self.out, "{declaration} = {{")?;
        for item in items {
            writeln!(self.out, "    {},", element(item))?;
        }
        writeln!(self.out, "}};")
    }

    fn blank(&mut self) -> fmt::Result {
        writeln!(self.out)
    }
}

#[inline]
fn c_bool(value: bool) -> String {
    let literal = if value { "true" } else { "false" };
    literal.to_string()
}

#[inline]
fn c_string(text: &str) -> String {
    format!("\"{}\"", escape_c_form(text))
}

/// Write the four parallel glyph arrays of the renderer.
pub fn write_symbol_arrays<W: Write>(out: &mut W, records: &[SymbolRecord]) -> fmt::Result {
    writeln!(out, "static const unsigned long nglyph = {};", records.len())?;
    let mut w = ArrayWriter::new(out);
    w.array(
        "static const char *glyph_control_sequence[nglyph]",
        records,
        |r| c_string(&r.control_sequence),
    )?;
    w.blank()?;
    w.array("static const unsigned int glyph_type[nglyph]", records, |r| {
        r.math_class
            .map_or("atom_t::TYPE_ORD", |class| class.atom_type())
            .to_string()
    })?;
    w.blank()?;
    w.array("static const bool glyph_upright[nglyph]", records, |r| {
        c_bool(r.is_upright())
    })?;
    w.blank()?;
    w.array("static const wchar_t glyph_code_point[nglyph]", records, |r| {
        ucs_c_form(r.code_point().unwrap_or(CodePoint::NULL))
    })
}

/// Write the operator arrays: name, code point, text expansion and the `\nolimits` flag.
pub fn write_operator_arrays<W: Write>(out: &mut W, operators: &[OperatorRecord]) -> fmt::Result {
    writeln!(
        out,
        "static const unsigned long __noperator = {};",
        operators.len()
    )?;
    let mut w = ArrayWriter::new(out);
    w.array(
        "static const char *__operator_name[__noperator]",
        operators,
        |o| c_string(&o.control_sequence),
    )?;
    w.blank()?;
    w.array(
        "static const wchar_t __operator_code_point[__noperator]",
        operators,
        |o| ucs_c_form(o.code_point().unwrap_or(CodePoint::NULL)),
    )?;
    w.blank()?;
    w.array(
        "static const char *__operator_control_sequence[__noperator]",
        operators,
        |o| match &o.glyph {
            OperatorGlyph::Symbol(_) => c_string(""),
            OperatorGlyph::Text(text) => c_string(text),
        },
    )?;
    w.blank()?;
    w.array(
        "static const bool __operator_nolimits[__noperator]",
        operators,
        |o| c_bool(o.no_limits),
    )
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::MathClass;

    #[test]
    fn code_point_literals() {
        let forms: Vec<String> = [0, 0x2B, 0x7F, 0x80, 0x3B1, 0xD80D, 0xFFFF, 0x10000, 0x1D400]
            .into_iter()
            .map(|value| ucs_c_form(CodePoint::new(value)))
            .collect();
        assert_eq!(
            forms,
            [
                r"L'\0'",
                r"L'\053'",
                r"L'\177'",
                r"L'\u0080'",
                r"L'\u03b1'",
                "55309",
                r"L'\uffff'",
                r"L'\U00010000'",
                r"L'\U0001d400'",
            ]
        );
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_c_form(r"\alpha"), r"\\alpha");
        assert_eq!(escape_c_form(r#"\""#), r#"\\\""#);
        assert!(matches!(escape_c_form("sin"), Cow::Borrowed("sin")));
    }

    fn record(slot: u32, class: Option<MathClass>, upright: bool, name: &str) -> SymbolRecord {
        SymbolRecord {
            slot: vec![CodePoint::new(slot)],
            math_class: class,
            upright,
            control_sequence: name.to_string(),
        }
    }

    #[test]
    fn symbol_arrays() {
        let records = [
            record(0x3B1, Some(MathClass::Ord), false, r"\alpha"),
            record(0x393, Some(MathClass::Alpha), true, r"\Gamma"),
            record(0x2A00, None, false, r"\bigodot"),
            record(0x2190, Some(MathClass::Rel), true, r"\leftarrow"),
        ];
        let mut out = String::new();
        write_symbol_arrays(&mut out, &records).unwrap();
        assert_snapshot!(out, @r#"
        static const unsigned long nglyph = 4;
        static const char *glyph_control_sequence[nglyph] = {
            "\\alpha",
            "\\Gamma",
            "\\bigodot",
            "\\leftarrow",
        };

        static const unsigned int glyph_type[nglyph] = {
            atom_t::TYPE_ORD,
            atom_t::TYPE_ORD,
            atom_t::TYPE_ORD,
            atom_t::TYPE_REL,
        };

        static const bool glyph_upright[nglyph] = {
            false,
            true,
            true,
            true,
        };

        static const wchar_t glyph_code_point[nglyph] = {
            L'\u03b1',
            L'\u0393',
            L'\u2a00',
            L'\u2190',
        };
        "#);
    }

    #[test]
    fn operator_arrays() {
        let operators = [
            OperatorRecord::symbol(r"\int", CodePoint::new(0x222B), true),
            OperatorRecord::text(r"\lim", "lim", false),
        ];
        let mut out = String::new();
        write_operator_arrays(&mut out, &operators).unwrap();
        assert_snapshot!(out, @r#"
        static const unsigned long __noperator = 2;
        static const char *__operator_name[__noperator] = {
            "\\int",
            "\\lim",
        };

        static const wchar_t __operator_code_point[__noperator] = {
            L'\u222b',
            L'\0',
        };

        static const char *__operator_control_sequence[__noperator] = {
            "",
            "lim",
        };

        static const bool __operator_nolimits[__noperator] = {
            true,
            false,
        };
        "#);
    }

    #[test]
    fn tsv_rows() {
        let mut records = vec![record(0x3B1, Some(MathClass::Ord), false, r"\alpha")];
        records.push(SymbolRecord {
            slot: vec![],
            math_class: None,
            upright: true,
            control_sequence: r"\mystery".to_string(),
        });
        let mut out = String::new();
        write_tsv(&mut out, &records).unwrap();
        assert_eq!(out, "03B1\tOrd\t0\t\\alpha\n-\t-\t1\t\\mystery\n");
    }
}
