//! Recognizers for the TeX declaration forms that carry symbol information.
//!
//! Each recognizer looks at one logical line and either returns the declaration it found or
//! [`Declaration::NoMatch`]. Most lines of a macro package are not declarations, so `NoMatch` is
//! not an error.

use std::borrow::Cow;

use memchr::memmem;

use crate::MathClass;
use crate::source::tex_strip;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration<'source> {
    NoMatch,
    /// `\mathcode`, `\mathchardef`, `\newsymbol`, `\def...{\delimiter"...}`,
    /// `\DeclareMathSymbol` or `\DeclareMathDelimiter`.
    MathClass {
        name: Cow<'source, str>,
        class: MathClass,
    },
    /// `\let\to=\from` or `\global\let\to\from`.
    Alias {
        to: Cow<'source, str>,
        from: Cow<'source, str>,
    },
    /// `\def\name{\mathop{\rm text}...}`, optionally followed by `\nolimits`.
    Operator {
        name: &'source str,
        text: &'source str,
        no_limits: bool,
    },
}

/// Recognize a math class declaration.
///
/// Continuation clauses (`\let...` or `\def...` following a declaration on the same line) are
/// removed before the line is classified.
pub fn recognize_math_class(line: &str) -> Declaration<'_> {
    let line = strip_continuation(strip_continuation(tex_strip(line), r"\let"), r"\def");
    math_class_declaration(line).unwrap_or(Declaration::NoMatch)
}

fn math_class_declaration(line: &str) -> Option<Declaration<'_>> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let (name, class): (Cow<'_, str>, MathClass) = if line.starts_with(r"\mathcode") {
        if line.starts_with(r"\mathcode`\^^") || memmem::find(bytes, br"\string").is_some() {
            return None;
        }
        // \mathcode`\+="202B
        let name = line.get(11..12)?;
        let class = MathClass::from_digit(*bytes.get(14)?)?;
        let name = if matches!(name, "_" | "{" | "}") {
            Cow::Owned(format!("\\{name}"))
        } else {
            Cow::Borrowed(name)
        };
        (name, class)
    } else if line.starts_with(r"\mathchardef") {
        if line.starts_with(r"\mathchardef\@") {
            return None;
        }
        // \mathchardef\alpha="010B, or \mathchardef\x="13A with an implied class 0
        if bytes.get(len.checked_sub(4)?) == Some(&b'"') {
            (Cow::Borrowed(line.get(12..len.checked_sub(5)?)?), MathClass::Ord)
        } else {
            let class = MathClass::from_digit(bytes[len - 4])?;
            (Cow::Borrowed(line.get(12..len.checked_sub(6)?)?), class)
        }
    } else if line.starts_with(r"\newsymbol") {
        // \newsymbol\boxdot 1200: family digit, class digit, two-digit position
        let class = MathClass::from_digit(*bytes.get(len.checked_sub(3)?)?)?;
        (Cow::Borrowed(line.get(10..len.checked_sub(5)?)?), class)
    } else if line.starts_with(r"\def") && memmem::find(bytes, br#"{\delimiter""#).is_some() {
        // \def\langle{\delimiter"426830A }
        let marker = len.checked_sub(9)?;
        if bytes[marker] == b'"' {
            (Cow::Borrowed(line.get(4..len.checked_sub(20)?)?), MathClass::Ord)
        } else {
            let class = MathClass::from_digit(bytes[marker])?;
            (Cow::Borrowed(line.get(4..len.checked_sub(21)?)?), class)
        }
    } else if let Some(inner) = line.strip_prefix(r"\DeclareMathSymbol{") {
        declare_arguments(inner)?
    } else if let Some(inner) = line.strip_prefix(r"\DeclareMathDelimiter{") {
        declare_arguments(inner)?
    } else {
        return None;
    };
    if name.is_empty() {
        return None;
    }
    Some(Declaration::MathClass { name, class })
}

/// Split `name}{\mathclass}{...}` into the name and its class.
fn declare_arguments(inner: &str) -> Option<(Cow<'_, str>, MathClass)> {
    let inner = inner.strip_suffix('}')?;
    // The first `}` followed by `{`, so that `\}` survives as a name.
    let (end, _) = inner
        .match_indices('}')
        .find(|&(idx, _)| inner[idx + 1..].trim_start_matches(' ').starts_with('{'))?;
    let name = &inner[..end];
    let rest = inner[end + 1..].trim_start_matches(' ').strip_prefix('{')?;
    let command = rest.split_once('}').map_or(rest, |(command, _)| command);
    let class = MathClass::from_latex_command(command)?;
    Some((Cow::Borrowed(name), class))
}

/// Cut a line before the first `pattern` that does not start the line, along with the spaces
/// leading up to it.
fn strip_continuation<'a>(line: &'a str, pattern: &str) -> &'a str {
    match memmem::find_iter(line.as_bytes(), pattern.as_bytes()).find(|&idx| idx > 0) {
        Some(idx) => {
            let kept = line[..idx].trim_end_matches(' ');
            if kept.is_empty() { &line[..idx] } else { kept }
        }
        None => line,
    }
}

/// Recognize a `\let` alias. Lines containing `@` (internal macros) never match, and an alias
/// to `\undefined` is an undefinition rather than an alias.
pub fn recognize_alias(line: &str) -> Declaration<'_> {
    let line = tex_strip(line);
    if line.contains('@') {
        return Declaration::NoMatch;
    }
    let alias = if line.starts_with(r"\let\") && line.contains(r"=\") {
        let mut parts = line.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(to), Some(from), None) => Some((
                Cow::Borrowed(to[4..].trim_matches(' ')),
                Cow::Borrowed(from.trim_matches(' ')),
            )),
            _ => None,
        }
    } else if line.starts_with(r"\global\let\") {
        let parts: Vec<&str> = line.split('\\').collect();
        match parts.as_slice() {
            [_, _, _, to, from] => Some((
                Cow::Owned(format!("\\{}", to.trim_matches(' '))),
                Cow::Owned(format!("\\{}", from.trim_matches(' '))),
            )),
            _ => None,
        }
    } else {
        None
    };
    match alias {
        Some((to, from)) if from != r"\undefined" && to.len() > 1 && from.len() > 1 => {
            Declaration::Alias { to, from }
        }
        _ => Declaration::NoMatch,
    }
}

const OPERATOR_MARKERS: [&str; 2] = [r"{\mathop{\rm ", r"{\mathop{\operator@font "];

/// Recognize a text operator such as `\def\sin{\mathop{\rm sin}\nolimits}`.
pub fn recognize_operator(line: &str) -> Declaration<'_> {
    let line = tex_strip(line);
    for marker in OPERATOR_MARKERS {
        let Some(idx) = memmem::find(line.as_bytes(), marker.as_bytes()) else {
            continue;
        };
        let (head, body) = (&line[..idx], &line[idx + marker.len()..]);
        let Some(name) = head.strip_prefix(r"\def") else {
            return Declaration::NoMatch;
        };
        let no_limits = memmem::find(body.as_bytes(), br"\nolimits").is_some();
        let text = body.split_once('}').map_or(body, |(text, _)| text);
        if name.is_empty() || text.is_empty() {
            return Declaration::NoMatch;
        }
        return Declaration::Operator {
            name,
            text,
            no_limits,
        };
    }
    Declaration::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_of(line: &str) -> Option<(String, MathClass)> {
        match recognize_math_class(line) {
            Declaration::MathClass { name, class } => Some((name.into_owned(), class)),
            _ => None,
        }
    }

    #[test]
    fn mathcode() {
        assert_eq!(class_of(r#"\mathcode`\+="202B"#), Some(("+".into(), MathClass::Bin)));
        assert_eq!(class_of(r#"\mathcode`\_="8000"#), Some((r"\_".into(), MathClass::Active)));
        assert_eq!(class_of(r#"\mathcode`\^^@="2201"#), None);
        assert_eq!(class_of(r#"\mathcode`\'="8000 \string"#), None);
    }

    #[test]
    fn mathchardef() {
        assert_eq!(
            class_of(r#"\mathchardef\alpha="710B"#),
            Some((r"\alpha".into(), MathClass::Alpha))
        );
        assert_eq!(
            class_of(r#"\mathchardef\ldotp="613A % ldot as a punctuation mark"#),
            Some((r"\ldotp".into(), MathClass::Punct))
        );
        assert_eq!(
            class_of(r#"\mathchardef\Gamma="100"#),
            Some((r"\Gamma".into(), MathClass::Ord))
        );
        assert_eq!(class_of(r#"\mathchardef\@tempa="2201"#), None);
    }

    #[test]
    fn mathchardef_with_continuation() {
        assert_eq!(
            class_of(r#"\mathchardef\intop="1352 \def\int{\intop\nolimits}"#),
            Some((r"\intop".into(), MathClass::Op))
        );
        assert_eq!(
            class_of(r#"\mathchardef\ne="3236 \let\neq=\ne"#),
            Some((r"\ne".into(), MathClass::Rel))
        );
    }

    #[test]
    fn newsymbol() {
        assert_eq!(
            class_of(r"\newsymbol\boxdot 1200"),
            Some((r"\boxdot".into(), MathClass::Bin))
        );
        assert_eq!(
            class_of(r"\newsymbol\digamma 207A"),
            Some((r"\digamma".into(), MathClass::Ord))
        );
    }

    #[test]
    fn delimiter_definitions() {
        assert_eq!(
            class_of(r#"\def\langle{\delimiter"426830A }"#),
            Some((r"\langle".into(), MathClass::Open))
        );
        assert_eq!(
            class_of(r#"\def\vert{\delimiter"026A30C }"#),
            Some((r"\vert".into(), MathClass::Ord))
        );
        assert_eq!(
            class_of(r#"\def\backslash{\delimiter"26E30F }"#),
            Some((r"\backslash".into(), MathClass::Ord))
        );
    }

    #[test]
    fn declare_math_symbol() {
        assert_eq!(
            class_of(r"\DeclareMathSymbol{\alpha}{\mathord}{letters}{'013}"),
            Some((r"\alpha".into(), MathClass::Ord))
        );
        assert_eq!(
            class_of(r#"\DeclareMathSymbol{+}{\mathbin}{operators}{"2B}"#),
            Some(("+".into(), MathClass::Bin))
        );
        assert_eq!(
            class_of(r#"\DeclareMathSymbol{\Gamma}{\mathalpha}{operators}{"00}"#),
            Some((r"\Gamma".into(), MathClass::Alpha))
        );
        assert_eq!(
            class_of(r#"\DeclareMathSymbol{\square}  {\mathord}{AMSa}{"03}"#),
            Some((r"\square".into(), MathClass::Ord))
        );
        assert_eq!(class_of(r#"\DeclareMathSymbol{\a}{\mathaccent}{x}{"00}"#), None);
        assert_eq!(
            class_of(r"\DeclareMathSymbol{\alpha}{\mathord}{letters}"),
            Some((r"\alpha".into(), MathClass::Ord))
        );
    }

    #[test]
    fn declare_math_delimiter() {
        assert_eq!(
            class_of(r#"\DeclareMathDelimiter{\langle}{\mathopen}{symbols}{"68}{largesymbols}{"0A}"#),
            Some((r"\langle".into(), MathClass::Open))
        );
        assert_eq!(
            class_of(r#"\DeclareMathDelimiter{\}}{\mathclose}{symbols}{"67}{largesymbols}{"09}"#),
            Some((r"\}".into(), MathClass::Close))
        );
        assert_eq!(
            class_of(r#"\DeclareMathDelimiter{\{} {\mathopen}{symbols}{"66}{largesymbols}{"08}"#),
            Some((r"\{".into(), MathClass::Open))
        );
    }

    #[test]
    fn other_lines_do_not_match() {
        assert_eq!(recognize_math_class(r"\def\foo{bar}"), Declaration::NoMatch);
        assert_eq!(recognize_math_class("% \\mathchardef\\x=\"0101"), Declaration::NoMatch);
        assert_eq!(recognize_math_class(""), Declaration::NoMatch);
        assert_eq!(recognize_math_class(r#"\mathchardef"#), Declaration::NoMatch);
    }

    #[test]
    fn let_aliases() {
        assert_eq!(
            recognize_alias(r"\let\neq=\ne"),
            Declaration::Alias {
                to: Cow::Borrowed(r"\neq"),
                from: Cow::Borrowed(r"\ne"),
            }
        );
        assert_eq!(
            recognize_alias(r"\global\let\restriction\upharpoonright"),
            Declaration::Alias {
                to: Cow::Owned(r"\restriction".to_string()),
                from: Cow::Owned(r"\upharpoonright".to_string()),
            }
        );
    }

    #[test]
    fn ignored_aliases() {
        assert_eq!(recognize_alias(r"\let\bbbk=\undefined"), Declaration::NoMatch);
        assert_eq!(recognize_alias(r"\let\@tempa=\relax"), Declaration::NoMatch);
        assert_eq!(recognize_alias(r"\let\a=\b \let\c=\d"), Declaration::NoMatch);
        assert_eq!(recognize_alias(r"\let\x\y"), Declaration::NoMatch);
    }

    #[test]
    fn text_operators() {
        assert_eq!(
            recognize_operator(r"\def\sin{\mathop{\rm sin}\nolimits}"),
            Declaration::Operator {
                name: r"\sin",
                text: "sin",
                no_limits: true,
            }
        );
        assert_eq!(
            recognize_operator(r"\def\lim{\mathop{\operator@font lim}}"),
            Declaration::Operator {
                name: r"\lim",
                text: "lim",
                no_limits: false,
            }
        );
        assert_eq!(
            recognize_operator(r"\def\liminf{\mathop{\operator@font lim\,inf}}"),
            Declaration::Operator {
                name: r"\liminf",
                text: r"lim\,inf",
                no_limits: false,
            }
        );
        assert_eq!(
            recognize_operator(r"\newcommand\foo{\mathop{\rm foo}}"),
            Declaration::NoMatch
        );
    }
}
