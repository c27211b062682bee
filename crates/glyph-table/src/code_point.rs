use std::fmt;

/// A code point as it appears in the slot column of a table.
///
/// This is deliberately not a `char`: the renderer reserves `0xD80D`, a surrogate, as a sentinel
/// and the tables carry it like any other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CodePoint(u32);

impl CodePoint {
    pub const NULL: CodePoint = CodePoint(0);
    /// Sentinel slot of the renderer, emitted as a plain decimal number.
    pub const SENTINEL: CodePoint = CodePoint(0xD80D);

    #[inline]
    pub const fn new(value: u32) -> Self {
        CodePoint(value)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Parse the hexadecimal notation used by the Unicode Database and glyph lists, e.g. `03B1`.
    pub fn from_hex(text: &str) -> Option<Self> {
        if text.is_empty() || text.len() > 8 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(text, 16).ok().map(CodePoint)
    }

    /// Parse a comma-separated list such as `0041,0301`. Fails if any member is invalid.
    pub fn parse_list(text: &str) -> Option<Vec<Self>> {
        text.split(',').map(CodePoint::from_hex).collect()
    }

    #[inline]
    pub fn checked_sub(self, offset: u32) -> Option<Self> {
        self.0.checked_sub(offset).map(CodePoint)
    }
}

impl fmt::Display for CodePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// Write code points the way the slot column does, comma-separated, or `-` if there are none.
pub(crate) struct SlotDisplay<'a>(pub &'a [CodePoint]);

impl fmt::Display for SlotDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.0.split_first() else {
            return f.write_str("-");
        };
        write!(f, "{first}")?;
        for code in rest {
            write!(f, ",{code}")?;
        }
        Ok(())
    }
}
