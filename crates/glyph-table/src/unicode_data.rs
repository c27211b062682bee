use crate::code_point::CodePoint;
use crate::source::SourceFile;

/// Number of fields in a row of `UnicodeData.txt`.
const FIELD_COUNT: usize = 15;

/// The two fields of a Unicode Database row that the extractors look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeEntry {
    pub code: CodePoint,
    pub name: String,
}

/// Read `UnicodeData.txt`. Rows that do not have exactly 15 fields are ignored.
pub fn read_unicode_data(source: &SourceFile) -> Vec<UnicodeEntry> {
    let entries: Vec<UnicodeEntry> = source
        .lines()
        .filter_map(|line| {
            let text = line.text.trim_end_matches('\r');
            let mut fields = text.split(';');
            let (code, name) = (fields.next()?, fields.next()?);
            if fields.count() + 2 != FIELD_COUNT {
                return None;
            }
            let Some(code) = CodePoint::from_hex(code) else {
                log::debug!("{}:{}: bad code point `{}'", source.name(), line.number, code);
                return None;
            };
            Some(UnicodeEntry {
                code,
                name: name.to_string(),
            })
        })
        .collect();
    log::debug!("{}: {} entries", source.name(), entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_complete_rows() {
        let source = SourceFile::from_text(
            "UnicodeData.txt",
            "03B1;GREEK SMALL LETTER ALPHA;Ll;0;L;;;;;N;;;0391;;0391\n\
             03B2;GREEK SMALL LETTER BETA;Ll;0;L\n\
             \n\
             1D400;MATHEMATICAL BOLD CAPITAL A;Lu;0;L;<font> 0041;;;;N;;;;;\n",
        );
        let entries = read_unicode_data(&source);
        assert_eq!(
            entries,
            [
                UnicodeEntry {
                    code: CodePoint::new(0x3B1),
                    name: "GREEK SMALL LETTER ALPHA".to_string(),
                },
                UnicodeEntry {
                    code: CodePoint::new(0x1D400),
                    name: "MATHEMATICAL BOLD CAPITAL A".to_string(),
                },
            ]
        );
    }
}
