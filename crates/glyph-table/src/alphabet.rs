//! Mathematical alphanumeric alphabets: `\mathbb`, `\mathfrak`, `\mathscr` and friends.
//!
//! Unicode has most of each alphabet in the Mathematical Alphanumeric Symbols block, which is
//! contiguous per case, plus a few older letters scattered over the Letterlike Symbols block.
//! The extractor therefore produces a `case` line for every letter in the Basic Multilingual
//! Plane and an offset expression for the rest; consecutive letters of a contiguous run share
//! the same offset expression and are coalesced into a single line.

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::code_point::CodePoint;
use crate::emit::{escape_c_form, ucs_c_form};
use crate::unicode_data::UnicodeEntry;

/// A math alphabet, named by the selector used on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum AlphabetStyle {
    BlackboardBold,
    ScriptItalic,
    ScriptBoldItalic,
    FrakturRegular,
    FrakturBold,
    SansSerifRegular,
    SansSerifItalic,
    SansSerifBold,
    SansSerifBoldItalic,
    MonospaceRegular,
    BoldRegular,
    Italic,
    BoldItalic,
}

impl AlphabetStyle {
    /// The style as it appears in Unicode character names.
    pub fn unicode_name(self) -> &'static str {
        match self {
            AlphabetStyle::BlackboardBold => "DOUBLE-STRUCK",
            AlphabetStyle::ScriptItalic => "SCRIPT",
            AlphabetStyle::ScriptBoldItalic => "BOLD SCRIPT",
            AlphabetStyle::FrakturRegular => "FRAKTUR",
            AlphabetStyle::FrakturBold => "BOLD FRAKTUR",
            AlphabetStyle::SansSerifRegular => "SANS-SERIF",
            AlphabetStyle::SansSerifItalic => "SANS-SERIF ITALIC",
            AlphabetStyle::SansSerifBold => "SANS-SERIF BOLD",
            AlphabetStyle::SansSerifBoldItalic => "SANS-SERIF BOLD ITALIC",
            AlphabetStyle::MonospaceRegular => "MONOSPACE",
            AlphabetStyle::BoldRegular => "BOLD",
            AlphabetStyle::Italic => "ITALIC",
            AlphabetStyle::BoldItalic => "BOLD ITALIC",
        }
    }

    /// The older spelling used by the Letterlike Symbols block, e.g. `BLACK-LETTER CAPITAL C`.
    pub fn alternate_name(self) -> &'static str {
        match self {
            AlphabetStyle::FrakturRegular => "BLACK-LETTER",
            AlphabetStyle::FrakturBold => "BOLD BLACK-LETTER",
            _ => self.unicode_name(),
        }
    }

    fn prefixes(self) -> Prefixes {
        let name = self.unicode_name();
        let alternate = self.alternate_name();
        Prefixes {
            capital: format!("MATHEMATICAL {name} CAPITAL "),
            small: format!("MATHEMATICAL {name} SMALL "),
            alternate_capital: format!("{alternate} CAPITAL "),
            alternate_small: format!("{alternate} SMALL "),
            digit: format!("MATHEMATICAL {name} DIGIT "),
        }
    }
}

struct Prefixes {
    capital: String,
    small: String,
    alternate_capital: String,
    alternate_small: String,
    digit: String,
}

/// What `glyphtab unicode` can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeSelector {
    /// Greek letters and named symbols, as a symbol table.
    NamedSymbols,
    Alphabet(AlphabetStyle),
}

impl FromStr for UnicodeSelector {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "lmp1" {
            Ok(UnicodeSelector::NamedSymbols)
        } else {
            s.parse().map(UnicodeSelector::Alphabet)
        }
    }
}

/// The character a math alphabet letter stands in for, e.g. `A` for
/// MATHEMATICAL BOLD CAPITAL A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetMember {
    Capital(char),
    Small(char),
    Digit(char),
}

impl AlphabetMember {
    #[inline]
    pub fn character(self) -> char {
        match self {
            AlphabetMember::Capital(c) | AlphabetMember::Small(c) | AlphabetMember::Digit(c) => c,
        }
    }

    /// The first member of the run this member belongs to.
    #[inline]
    fn origin(self) -> char {
        match self {
            AlphabetMember::Capital(_) => 'A',
            AlphabetMember::Small(_) => 'a',
            AlphabetMember::Digit(_) => '0',
        }
    }
}

/// A single character remainder of a Unicode name, like the `A` of `... CAPITAL A`.
fn single_letter(rest: &str) -> Option<char> {
    let mut chars = rest.chars();
    let letter = chars.next()?;
    chars.next().is_none().then_some(letter)
}

fn digit_word(word: &str) -> Option<char> {
    Some(match word {
        "ZERO" => '0',
        "ONE" => '1',
        "TWO" => '2',
        "THREE" => '3',
        "FOUR" => '4',
        "FIVE" => '5',
        "SIX" => '6',
        "SEVEN" => '7',
        "EIGHT" => '8',
        "NINE" => '9',
        _ => return None,
    })
}

/// All members of the alphabet, in Unicode Database order.
pub fn extract_alphabet(
    entries: &[UnicodeEntry],
    style: AlphabetStyle,
) -> Vec<(AlphabetMember, CodePoint)> {
    let prefixes = style.prefixes();
    let letter = |prefix: &str, name: &str| name.strip_prefix(prefix).and_then(single_letter);
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.name.as_str();
            let member = if let Some(c) = letter(&prefixes.capital, name)
                .or_else(|| letter(&prefixes.alternate_capital, name))
            {
                AlphabetMember::Capital(c.to_ascii_uppercase())
            } else if let Some(c) = letter(&prefixes.small, name)
                .or_else(|| letter(&prefixes.alternate_small, name))
            {
                AlphabetMember::Small(c.to_ascii_lowercase())
            } else {
                AlphabetMember::Digit(name.strip_prefix(&prefixes.digit).and_then(digit_word)?)
            };
            Some((member, entry.code))
        })
        .collect()
}

/// One line of the generated `switch`: a `case` for a BMP code point, otherwise an offset from
/// the start of the member's run.
pub fn alphabet_line(member: AlphabetMember, code: CodePoint) -> String {
    if code.value() < 0x10000 {
        let mut buf = [0u8; 4];
        let character = member.character().encode_utf8(&mut buf);
        return format!(
            "case '{}': _glyph = {}; break;",
            escape_c_form(character),
            ucs_c_form(code)
        );
    }
    let origin = member.origin();
    let offset = u32::from(member.character()).saturating_sub(u32::from(origin));
    let base = code.checked_sub(offset).unwrap_or(code);
    format!(
        "_glyph = {} + (_code[0] - '{}');",
        ucs_c_form(base),
        origin
    )
}

/// The generated lines for an alphabet, with runs of identical lines coalesced.
pub fn alphabet_lines(members: &[(AlphabetMember, CodePoint)]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for &(member, code) in members {
        let line = alphabet_line(member, code);
        if lines.last() != Some(&line) {
            lines.push(line);
        }
    }
    lines
}
