use crate::gradschool::tools::merge::stringify::natural_text;
use crate::gradschool::tools::model::CellValue;

/// Normalizes a raw join-key cell into the string used for equality.
pub fn normalize_key(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        other => normalize_key_text(&natural_text(other)),
    }
}

/// Normalizes key text: trims it and collapses decimal-formatted integers,
/// so `"11285619.0"` and `"11285619"` compare equal.
///
/// Text without a decimal point is never reinterpreted, which keeps leading
/// zeros such as `"007"` intact.
pub fn normalize_key_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_decimal_formatted(trimmed) {
        if let Ok(parsed) = trimmed.parse::<f64>() {
            let truncated = parsed.trunc();
            if truncated.is_finite() && truncated.abs() < i64::MAX as f64 {
                return (truncated as i64).to_string();
            }
        }
    }
    trimmed.to_string()
}

fn is_decimal_formatted(text: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for ch in text.chars() {
        match ch {
            '.' => dots += 1,
            '0'..='9' => digits += 1,
            _ => return false,
        }
    }
    dots == 1 && digits > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_empty_string() {
        assert_eq!(normalize_key(&CellValue::Empty), "");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            normalize_key(&CellValue::text("  P100 \t")),
            normalize_key(&CellValue::text("P100"))
        );
    }

    #[test]
    fn numeric_representations_share_a_key() {
        let expected = "11285619";
        assert_eq!(normalize_key(&CellValue::text("11285619.0")), expected);
        assert_eq!(normalize_key(&CellValue::text("11285619")), expected);
        assert_eq!(normalize_key(&CellValue::Number(11285619.0)), expected);
    }

    #[test]
    fn fractional_part_is_truncated() {
        assert_eq!(normalize_key_text("42.9"), "42");
        assert_eq!(normalize_key_text("5."), "5");
        assert_eq!(normalize_key_text(".5"), "0");
    }

    #[test]
    fn leading_zeros_survive_without_decimal_point() {
        assert_eq!(normalize_key_text("007"), "007");
    }

    #[test]
    fn non_numeric_text_is_only_trimmed() {
        assert_eq!(normalize_key_text(" 1.2.3 "), "1.2.3");
        assert_eq!(normalize_key_text("-4.0"), "-4.0");
        assert_eq!(normalize_key_text("."), ".");
    }
}
