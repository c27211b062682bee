use strum_macros::{Display, EnumString, IntoStaticStr};

/// The nine TeX math classes (Knuth 1986, pp. 154f.).
///
/// The discriminants are the class digits used by `\mathcode`, `\mathchardef` and friends, so
/// `MathClass::from_digit` is the inverse of `as u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MathClass {
    /// `\mathord`
    Ord = 0,
    /// `\mathop`
    Op,
    /// `\mathbin`
    Bin,
    /// `\mathrel`
    Rel,
    /// `\mathopen`
    Open,
    /// `\mathclose`
    Close,
    /// `\mathpunct`
    Punct,
    /// `\mathalpha`, i.e. an ordinary symbol that follows the current math family.
    Alpha,
    /// Active math character (`"8000`).
    Active,
}

impl MathClass {
    /// The class encoded by a single decimal digit, as found in the leading position of a TeX
    /// math code.
    pub fn from_digit(digit: u8) -> Option<Self> {
        Some(match digit {
            b'0' => MathClass::Ord,
            b'1' => MathClass::Op,
            b'2' => MathClass::Bin,
            b'3' => MathClass::Rel,
            b'4' => MathClass::Open,
            b'5' => MathClass::Close,
            b'6' => MathClass::Punct,
            b'7' => MathClass::Alpha,
            b'8' => MathClass::Active,
            _ => return None,
        })
    }

    /// Parse a LaTeX class command such as `\mathord` or `\mathalpha`.
    pub fn from_latex_command(command: &str) -> Option<Self> {
        let suffix = command.strip_prefix(r"\math")?;
        let mut chars = suffix.chars();
        let first = chars.next()?;
        let capitalized: String = first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect();
        capitalized.parse().ok()
    }

    /// `Ord` and `Alpha` only differ in whether the symbol follows the current family, so a
    /// redefinition between the two is not a conflict.
    pub fn is_equivalent(self, other: MathClass) -> bool {
        self == other || (self.is_ordinary() && other.is_ordinary())
    }

    #[inline]
    fn is_ordinary(self) -> bool {
        matches!(self, MathClass::Ord | MathClass::Alpha)
    }

    /// The atom type constant of the rendering library.
    pub fn atom_type(self) -> &'static str {
        match self {
            MathClass::Ord | MathClass::Alpha => "atom_t::TYPE_ORD",
            MathClass::Op => "atom_t::TYPE_OP",
            MathClass::Bin => "atom_t::TYPE_BIN",
            MathClass::Rel => "atom_t::TYPE_REL",
            MathClass::Open => "atom_t::TYPE_OPEN",
            MathClass::Close => "atom_t::TYPE_CLOSE",
            MathClass::Punct => "atom_t::TYPE_PUNCT",
            MathClass::Active => "atom_t::TYPE_ACTIVE",
        }
    }
}
