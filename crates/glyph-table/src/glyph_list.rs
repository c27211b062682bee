//! Adobe-style glyph lists: `name;code[,code...]`, one glyph per line.

use rustc_hash::FxHashMap;

use crate::code_point::CodePoint;
use crate::source::SourceFile;

#[derive(Debug, Default, Clone)]
pub struct GlyphList {
    glyphs: FxHashMap<String, Vec<CodePoint>>,
}

impl GlyphList {
    /// Read the given lists. If several lists name the same glyph, the first one wins.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a SourceFile>) -> Self {
        let mut glyphs: FxHashMap<String, Vec<CodePoint>> = FxHashMap::default();
        for source in sources {
            for line in source.lines() {
                let text = line.text.trim_end_matches('\r');
                if text.is_empty() || text.starts_with('#') {
                    continue;
                }
                let parsed = text
                    .split_once(';')
                    .filter(|(_, codes)| !codes.contains(';'))
                    .and_then(|(name, codes)| Some((name, CodePoint::parse_list(codes)?)));
                let Some((name, codes)) = parsed else {
                    log::debug!("{}:{}: skipping `{}'", source.name(), line.number, text);
                    continue;
                };
                glyphs.entry(name.to_string()).or_insert(codes);
            }
        }
        Self { glyphs }
    }

    pub fn get(&self, name: &str) -> Option<&[CodePoint]> {
        self.glyphs.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
