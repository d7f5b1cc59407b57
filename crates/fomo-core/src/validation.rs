//! Input checks applied before data reaches the engines or the store.

use crate::error::CoreError;

/// Parse a manual position supplied as text. Blank input means "no position".
pub fn parse_position(raw: Option<&str>) -> Result<Option<i64>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| {
            CoreError::InvalidInput(format!("Position must be an integer, got '{}'", value))
        }),
    }
}

/// A recurrence interval must be a positive integer; omitted means 1.
pub fn validate_interval(interval: Option<i64>) -> Result<u32, CoreError> {
    match interval {
        None => Ok(1),
        Some(n) if n >= 1 => u32::try_from(n).map_err(|_| {
            CoreError::InvalidInput(format!("Repeat interval {} is too large", n))
        }),
        Some(n) => Err(CoreError::InvalidInput(format!(
            "Repeat interval must be a positive integer, got {}",
            n
        ))),
    }
}

/// Positions below 1 (or none at all) park the task at 0.
pub fn normalize_move_position(position: Option<i64>) -> i64 {
    match position {
        Some(p) if p >= 1 => p,
        _ => 0,
    }
}

pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidInput("Title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Turn a short-id prefix into a `LIKE` pattern over the uppercase hex form
/// of a task id. Dashes are ignored; anything else must be a hex digit.
pub fn short_id_pattern(short_id: &str) -> Result<String, CoreError> {
    let mut pattern = String::with_capacity(short_id.len() + 1);
    for c in short_id.chars().filter(|c| *c != '-') {
        if !c.is_ascii_hexdigit() {
            return Err(CoreError::InvalidInput(format!(
                "Short ID may only contain hexadecimal digits, got '{}'",
                short_id
            )));
        }
        pattern.push(c.to_ascii_uppercase());
    }
    if pattern.is_empty() {
        return Err(CoreError::InvalidInput("Short ID cannot be empty".to_string()));
    }
    pattern.push('%');
    Ok(pattern)
}

/// Lowercase ASCII slug: letters, digits and `_` are
/// kept, runs of whitespace and `-` become one dash, all other characters
/// are dropped, and leading or trailing `-`/`_` are trimmed.
pub fn slugify(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii() {
            folded.push(c);
        } else if c.is_whitespace() {
            folded.push(' ');
        } else if let Some(base) = fold_diacritic(c) {
            folded.push_str(base);
        }
    }

    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        }
    }
    slug.trim_matches(|c: char| c == '-' || c == '_').to_string()
}

// Accented Latin letters folded to their base letters; anything else is dropped.
fn fold_diacritic(c: char) -> Option<&'static str> {
    let base = match c.to_lowercase().next()? {
        'ą' | 'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' => "a",
        'æ' => "ae",
        'ć' | 'č' | 'ç' | 'ĉ' | 'ċ' => "c",
        'ď' | 'đ' => "d",
        'ę' | 'é' | 'è' | 'ê' | 'ë' | 'ě' | 'ē' | 'ė' => "e",
        'ğ' | 'ĝ' | 'ġ' | 'ģ' => "g",
        'ĥ' => "h",
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ł' | 'ĺ' | 'ľ' | 'ļ' => "l",
        'ń' | 'ñ' | 'ň' | 'ņ' => "n",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ř' | 'ŗ' => "r",
        'ś' | 'š' | 'ş' | 'ŝ' | 'ș' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'ț' => "t",
        'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'ū' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some(" 4 "), Some(4))]
    #[case(Some("-2"), Some(-2))]
    fn test_parse_position(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(parse_position(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_position_rejects_text() {
        assert!(matches!(
            parse_position(Some("third")),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[rstest]
    #[case(None, Some(1))]
    #[case(Some(1), Some(1))]
    #[case(Some(14), Some(14))]
    #[case(Some(0), None)]
    #[case(Some(-3), None)]
    fn test_validate_interval(#[case] input: Option<i64>, #[case] expected: Option<u32>) {
        assert_eq!(validate_interval(input).ok(), expected);
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some(0), 0)]
    #[case(Some(-5), 0)]
    #[case(Some(1), 1)]
    #[case(Some(7), 7)]
    fn test_normalize_move_position(#[case] input: Option<i64>, #[case] expected: i64) {
        assert_eq!(normalize_move_position(input), expected);
    }

    #[rstest]
    #[case("Porządki domowe", "porzadki-domowe")]
    #[case("  Work / Side projects!", "work-side-projects")]
    #[case("Todo", "todo")]
    #[case("???", "")]
    #[case("foo.bar", "foobar")]
    #[case("a_b", "a_b")]
    #[case("_private_", "private")]
    #[case("Řeřicha a šťovík", "rericha-a-stovik")]
    #[case("Straße", "strasse")]
    #[case("- dashes -- and   spaces -", "dashes-and-spaces")]
    #[case("日本語 list", "list")]
    fn test_slugify(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name), expected);
    }

    #[rstest]
    #[case("0192", "0192%")]
    #[case("01-9a", "019A%")]
    #[case("abcdef", "ABCDEF%")]
    fn test_short_id_pattern(#[case] short_id: &str, #[case] expected: &str) {
        assert_eq!(short_id_pattern(short_id).unwrap(), expected);
    }

    #[rstest]
    #[case("%%")]
    #[case("__")]
    #[case("01%")]
    #[case("zz")]
    #[case("--")]
    fn test_short_id_pattern_rejects_non_hex(#[case] short_id: &str) {
        assert!(matches!(
            short_id_pattern(short_id),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
