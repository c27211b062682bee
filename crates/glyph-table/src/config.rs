use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::Deserialize;

const TEXMF: &str = "/usr/share/texmf/tex/latex";
const LOCAL_TEXMF: &str = "/usr/local/share/texmf/tex/latex";
const LCDF_TYPETOOLS: &str = "/usr/local/lcdf-typetools/share/lcdf-typetools";

/// Where the input files live.
///
/// Lists are read in the order given. For the math classes this is the precedence order: a later
/// file overrides an earlier one. Relative paths are resolved against the data root, see
/// [`SourceConfig::rebase`].
///
/// # Example usage
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use glyph_table::SourceConfig;
///
/// let mut config = SourceConfig {
///     alias_tables: vec![PathBuf::from("my_aliases.txt")],
///     ..Default::default()
/// };
/// config.rebase(Path::new("/src/mathtext"));
/// assert_eq!(config.alias_tables, [PathBuf::from("/src/mathtext/my_aliases.txt")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct SourceConfig {
    /// TeX/LaTeX files declaring math classes and `\let` aliases.
    pub math_class: Vec<PathBuf>,
    /// TeX/LaTeX files defining text operators such as `\sin`.
    pub text_operator: Vec<PathBuf>,
    /// Adobe-style glyph lists; the first list naming a glyph wins.
    pub glyph_list: Vec<PathBuf>,
    /// The Unicode Character Database, `UnicodeData.txt`.
    pub unicode_data: PathBuf,
    /// Hand-maintained symbol tables, merged in order.
    pub symbol_tables: Vec<PathBuf>,
    pub alias_tables: Vec<PathBuf>,
    pub large_operator_tables: Vec<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let texmf = Path::new(TEXMF);
        let table = |name: &str| Path::new("data").join("table").join(name);
        Self {
            math_class: vec![
                texmf.join("base").join("fontmath.ltx"),
                texmf.join("amsfonts").join("amsfonts.sty"),
                texmf.join("amsfonts").join("amssymb.sty"),
                Path::new(LOCAL_TEXMF).join("mtpro2").join("mtpro2.sty"),
            ],
            text_operator: vec![texmf.join("base").join("latex.ltx")],
            glyph_list: vec![
                Path::new(LCDF_TYPETOOLS).join("glyphlist.txt"),
                Path::new("data")
                    .join("source")
                    .join("ucs")
                    .join("texglyphlist.txt"),
            ],
            unicode_data: Path::new("data").join("UnicodeData.txt"),
            symbol_tables: vec![
                table("lmp1_map.txt"),
                table("lmp2_map.txt"),
                table("mt2sya_map.txt"),
                table("lucida_map.txt"),
                table("composite_map.txt"),
            ],
            alias_tables: vec![table("alias_map.txt")],
            large_operator_tables: vec![table("mt2exa_map.txt")],
        }
    }
}

impl SourceConfig {
    /// Resolve every relative path against `root`. Absolute paths are left alone.
    pub fn rebase(&mut self, root: &Path) {
        let paths = self
            .math_class
            .iter_mut()
            .chain(&mut self.text_operator)
            .chain(&mut self.glyph_list)
            .chain(std::iter::once(&mut self.unicode_data))
            .chain(&mut self.symbol_tables)
            .chain(&mut self.alias_tables)
            .chain(&mut self.large_operator_tables);
        for path in paths {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }
}
