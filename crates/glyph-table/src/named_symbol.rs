//! Control sequences derived from Unicode character names: Greek letters and a few symbols
//! whose TeX name can be read off their Unicode name.

use std::borrow::Cow;

use crate::MathClass;
use crate::macro_package::ClassTable;
use crate::symbol_table::SymbolRecord;
use crate::unicode_data::UnicodeEntry;

static FIXED_NAMES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "LEFTWARDS HARPOON WITH BARB UPWARDS" => r"\leftharpoonup",
    "LEFTWARDS HARPOON WITH BARB DOWNWARDS" => r"\leftharpoondown",
    "RIGHTWARDS HARPOON WITH BARB UPWARDS" => r"\rightharpoonup",
    "RIGHTWARDS HARPOON WITH BARB DOWNWARDS" => r"\rightharpoondown",
    "LEFTWARDS ARROW WITH HOOK" => r"\hookleftarrow",
    "RIGHTWARDS ARROW WITH HOOK" => r"\hookrightarrow",
    "STAR OPERATOR" => r"\star",
    "PARTIAL DIFFERENTIAL" => r"\partial",
    "SCRIPT SMALL L" => r"\ell",
    "SCRIPT CAPITAL P" => r"\wp",
    "DAGGER" => r"\dagger",
    "DOUBLE DAGGER" => r"\ddagger",
    "SECTION SIGN" => r"\S",
    "PILCROW SIGN" => r"\P",
    "LATIN SMALL LETTER D WITH STROKE" => r"\dbar",
};

const CAPITAL: &str = "GREEK CAPITAL LETTER ";
const SMALL: &str = "GREEK SMALL LETTER ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSymbol {
    pub control_sequence: String,
    pub entry: UnicodeEntry,
    pub greek: bool,
}

impl NamedSymbol {
    /// Greek letters and `\dbar` also have an upright variant, `\upalpha` and so on.
    fn has_upright_variant(&self) -> bool {
        self.greek || self.control_sequence == r"\dbar"
    }
}

pub fn named_symbols(entries: &[UnicodeEntry]) -> Vec<NamedSymbol> {
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.name.as_str();
            let greek = name.starts_with("GREEK ") && !name.contains(" WITH ");
            let control_sequence = if greek {
                greek_control_sequence(name)
            } else {
                symbol_control_sequence(name)
            }?;
            Some(NamedSymbol {
                control_sequence,
                entry: entry.clone(),
                greek,
            })
        })
        .collect()
}

fn greek_control_sequence(name: &str) -> Option<String> {
    let name = normalize_greek_name(name);
    if let Some(letter) = name.strip_prefix(CAPITAL) {
        let mut control_sequence = format!("\\{}", capitalize(letter));
        if let Some(rest) = control_sequence.strip_prefix(r"\Var") {
            control_sequence = format!("\\Var{}", capitalize(rest));
        }
        Some(control_sequence)
    } else {
        name.strip_prefix(SMALL)
            .map(|letter| format!("\\{}", letter.to_lowercase()))
    }
}

/// Bring the irregular Greek names into the `GREEK CAPITAL/SMALL LETTER X` shape, using the
/// `VAR` prefix for the variant forms the way TeX names them.
fn normalize_greek_name(name: &str) -> Cow<'_, str> {
    match name {
        "GREEK KAI SYMBOL" | "GREEK LETTER YOT" => Cow::Borrowed(name),
        "GREEK SMALL LETTER EPSILON" => Cow::Owned(format!("{SMALL}VAREPSILON")),
        "GREEK LUNATE EPSILON SYMBOL" => Cow::Owned(format!("{SMALL}EPSILON")),
        "GREEK SMALL LETTER FINAL SIGMA" => Cow::Owned(format!("{SMALL}VARSIGMA")),
        "GREEK SMALL LETTER PHI" => Cow::Owned(format!("{SMALL}VARPHI")),
        "GREEK LETTER ARCHAIC KOPPA" => Cow::Owned(format!("{CAPITAL}VARKOPPA")),
        "GREEK SMALL LETTER ARCHAIC KOPPA" => Cow::Owned(format!("{SMALL}VARKOPPA")),
        _ => {
            if let Some(letter) = name
                .strip_prefix("GREEK ")
                .and_then(|rest| rest.strip_suffix(" SYMBOL"))
                .filter(|letter| !letter.is_empty() && !letter.contains(' '))
            {
                if matches!(letter, "PHI" | "KAI") {
                    Cow::Owned(format!("{SMALL}{letter}"))
                } else {
                    Cow::Owned(format!("{SMALL}VAR{letter}"))
                }
            } else if let Some(letter) = name
                .strip_prefix("GREEK LETTER ")
                .filter(|letter| !letter.contains(' '))
            {
                Cow::Owned(format!("{CAPITAL}{letter}"))
            } else {
                Cow::Borrowed(name)
            }
        }
    }
}

fn symbol_control_sequence(name: &str) -> Option<String> {
    if let Some(sign) = name
        .strip_prefix("MUSIC ")
        .and_then(|rest| rest.strip_suffix(" SIGN"))
    {
        return Some(format!("\\{}", sign.to_lowercase()));
    }
    if matches!(name, "SMILE" | "FROWN") {
        return Some(format!("\\{}", name.to_lowercase()));
    }
    if let Some(letter) = name.strip_prefix("LATIN SMALL LETTER DOTLESS ")
        && letter.len() == 1
    {
        return Some(format!("\\{}math", letter.to_lowercase()));
    }
    FIXED_NAMES.get(name).map(|name| name.to_string())
}

/// First character upper case, the rest lower case.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Table rows for the named symbols. The class comes from the macro packages; a Greek letter
/// they do not know is an italic `Ord`, anything else stays unclassified.
pub fn named_symbol_records(symbols: &[NamedSymbol], classes: &ClassTable) -> Vec<SymbolRecord> {
    let mut records = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let (math_class, upright) = match classes.get(&symbol.control_sequence) {
            Some(class) => (Some(class), true),
            None if symbol.greek => (Some(MathClass::Ord), false),
            None => (None, true),
        };
        records.push(SymbolRecord {
            slot: vec![symbol.entry.code],
            math_class,
            upright,
            control_sequence: symbol.control_sequence.clone(),
        });
        if symbol.has_upright_variant() {
            records.push(SymbolRecord {
                slot: vec![symbol.entry.code],
                math_class,
                upright: true,
                control_sequence: format!("\\up{}", &symbol.control_sequence[1..]),
            });
        }
    }
    records
}
