//! Compile TeX math-symbol declarations, glyph lists and the Unicode Character Database into the
//! glyph and operator tables of the mathtext renderer.
//!
//! The inputs are several loosely structured text formats: plain TeX and LaTeX macro packages
//! (`\mathchardef`, `\DeclareMathSymbol`, `\let`, ...), fontinst encoding files, Adobe glyph
//! lists, `UnicodeData.txt` and tab-separated tables maintained by hand. None of them has a
//! formal grammar; every reader recognizes the handful of line shapes that carry information
//! and ignores everything else.
//!
//! # Usage
//!
//! The main struct of this library is [`TableCompiler`]. It is constructed from a
//! [`SourceConfig`] that names the input files, and has one method per generated table. Every
//! method returns the generated text together with the [`Diagnostics`] raised while building
//! it; only an input file that cannot be read is an error.
//!
//! ```rust,no_run
//! use glyph_table::{SourceConfig, SymbolOutput, TableCompiler};
//!
//! let compiler = TableCompiler::new(SourceConfig::default());
//! let generated = compiler.symbols(SymbolOutput::Table).unwrap();
//! for diagnostic in &generated.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! print!("{}", generated.output);
//! ```
//!
//! The readers and builders are public as well, so a table can also be built from text that
//! did not come from the file system:
//!
//! ```rust
//! use glyph_table::{ClassTable, Diagnostics, MathClass, SourceFile};
//!
//! let fontmath = SourceFile::from_text(
//!     "fontmath.ltx",
//!     r"\DeclareMathSymbol{\alpha}{\mathalpha}{letters}{'013}",
//! );
//! let mut diagnostics = Diagnostics::new();
//! let classes = ClassTable::from_sources([&fontmath], &mut diagnostics);
//! assert_eq!(classes.get(r"\alpha"), Some(MathClass::Alpha));
//! ```
//!
//! # Features
//!
//! - `serde`: [`SourceConfig`] implements `Deserialize` and the records implement `Serialize`.
//! - `ariadne`: [`Diagnostic::to_report`] renders a diagnostic with a source excerpt.
//!
mod alphabet;
mod code_point;
mod config;
mod declaration;
mod diagnostics;
mod emit;
mod error;
mod etx;
mod glyph_list;
mod macro_package;
mod math_class;
mod named_symbol;
mod operator;
mod source;
mod symbol_table;
mod unicode_data;

use std::path::Path;

use strum_macros::{Display, EnumString, IntoStaticStr};

pub use self::alphabet::{
    AlphabetMember, AlphabetStyle, UnicodeSelector, alphabet_line, alphabet_lines,
    extract_alphabet,
};
pub use self::code_point::CodePoint;
pub use self::config::SourceConfig;
pub use self::declaration::{
    Declaration, recognize_alias, recognize_math_class, recognize_operator,
};
pub use self::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location};
pub use self::emit::{
    escape_c_form, ucs_c_form, write_alias_pairs, write_lines, write_operator_arrays,
    write_symbol_arrays, write_tsv,
};
pub use self::error::TableError;
pub use self::etx::{SlotEntry, etx_table, extract_control_sequence, read_etx};
pub use self::glyph_list::GlyphList;
pub use self::macro_package::{AliasTable, ClassTable, read_text_operators};
pub use self::math_class::MathClass;
pub use self::named_symbol::{NamedSymbol, named_symbol_records, named_symbols};
pub use self::operator::{OperatorGlyph, OperatorRecord, build_operator_table};
pub use self::source::{SourceFile, tex_strip};
pub use self::symbol_table::{AliasEdge, SymbolRecord, SymbolTable};
pub use self::unicode_data::{UnicodeEntry, read_unicode_data};

/// Which part of the resolved symbol table to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SymbolOutput {
    /// The glyph arrays of the renderer.
    #[default]
    Table,
    /// Table rows whose class has not been assigned yet.
    TableTypeless,
    /// Rows for literal characters, as they appear in the input.
    Character,
    /// Rows without a code point, as they appear in the input.
    Uncoded,
    /// The whole resolved table in the tab-separated input format.
    Tsv,
}

/// A generated table and everything worth reporting about how it was built.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub output: String,
    pub diagnostics: Diagnostics,
}

/// Reads the configured sources and generates the tables.
///
/// Each method reads its inputs afresh, so the output depends only on the files at the time of
/// the call.
#[derive(Debug, Clone, Default)]
pub struct TableCompiler {
    config: SourceConfig,
}

impl TableCompiler {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Math classes from the configured macro packages, later files taking precedence.
    pub fn math_classes(&self, diagnostics: &mut Diagnostics) -> Result<ClassTable, TableError> {
        let sources = load_all(&self.config.math_class)?;
        Ok(ClassTable::from_sources(&sources, diagnostics))
    }

    /// The resolved symbol table: the configured tables plus their aliases.
    pub fn symbol_table(&self, diagnostics: &mut Diagnostics) -> Result<SymbolTable, TableError> {
        let tables = load_all(&self.config.symbol_tables)?;
        let aliases = load_all(&self.config.alias_tables)?;
        Ok(SymbolTable::build(&tables, &aliases, diagnostics))
    }

    pub fn symbols(&self, mode: SymbolOutput) -> Result<Generated, TableError> {
        let mut generated = Generated::default();
        let table = self.symbol_table(&mut generated.diagnostics)?;
        let out = &mut generated.output;
        let _ = match mode {
            SymbolOutput::Table => write_symbol_arrays(out, table.records()),
            SymbolOutput::TableTypeless => {
                let typeless: Vec<SymbolRecord> = table.typeless().cloned().collect();
                write_tsv(out, &typeless)
            }
            SymbolOutput::Character => write_lines(out, table.character_lines()),
            SymbolOutput::Uncoded => write_lines(out, table.uncoded_lines()),
            SymbolOutput::Tsv => write_tsv(out, table.records()),
        };
        Ok(generated)
    }

    /// The `\let` aliases of the macro packages, as `to<TAB>from` rows.
    pub fn aliases(&self) -> Result<Generated, TableError> {
        let mut generated = Generated::default();
        let sources = load_all(&self.config.math_class)?;
        let aliases = AliasTable::from_sources(&sources, &mut generated.diagnostics);
        let _ = write_alias_pairs(&mut generated.output, &aliases.pairs());
        Ok(generated)
    }

    /// Large and text operators as the renderer's operator arrays.
    pub fn operators(&self) -> Result<Generated, TableError> {
        let mut generated = Generated::default();
        let large = load_all(&self.config.large_operator_tables)?;
        let text = load_all(&self.config.text_operator)?;
        let operators = build_operator_table(&large, read_text_operators(&text));
        let _ = write_operator_arrays(&mut generated.output, &operators);
        Ok(generated)
    }

    /// A table with one row per commented slot of a fontinst encoding file.
    pub fn etx(&self, path: &Path) -> Result<Generated, TableError> {
        let mut generated = Generated::default();
        let etx = SourceFile::load(path)?;
        let glyph_list = GlyphList::from_sources(&load_all(&self.config.glyph_list)?);
        let classes = self.math_classes(&mut generated.diagnostics)?;
        let entries = read_etx(&etx, &mut generated.diagnostics);
        let _ = write_tsv(
            &mut generated.output,
            &etx_table(&entries, &classes, &glyph_list),
        );
        Ok(generated)
    }

    /// Named symbols or a math alphabet, derived from the Unicode Character Database.
    pub fn unicode(&self, selector: UnicodeSelector) -> Result<Generated, TableError> {
        let mut generated = Generated::default();
        let entries = read_unicode_data(&SourceFile::load(&self.config.unicode_data)?);
        let _ = match selector {
            UnicodeSelector::NamedSymbols => {
                let classes = self.math_classes(&mut generated.diagnostics)?;
                let records = named_symbol_records(&named_symbols(&entries), &classes);
                write_tsv(&mut generated.output, &records)
            }
            UnicodeSelector::Alphabet(style) => {
                let lines = alphabet_lines(&extract_alphabet(&entries, style));
                write_lines(&mut generated.output, &lines)
            }
        };
        Ok(generated)
    }
}

fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceFile>, TableError> {
    paths
        .iter()
        .map(|path| SourceFile::load(path.as_ref()))
        .collect()
}
