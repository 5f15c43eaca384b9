//! Line classification over recognition-engine output.
//!
//! Pure functions, no async — easily testable. Takes the unordered text
//! fragments the engine found on a card image and routes each one into
//! numeric-field candidates (identity numbers, dates) or string-field
//! candidates (names, labels), dropping template boilerplate and noise.

use serde::Serialize;

use crate::config::ClassifierRules;

/// Result of classifying one request's recognized lines.
///
/// Field names match the wire contract consumed by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub lines_with_numbers: Vec<String>,
    pub lines_with_strings: Vec<String>,
}

/// Classify recognized text lines in input order.
///
/// Each line lands in at most one of the two output vectors, or nowhere.
/// Total over its input: never fails, and an empty input yields two empty
/// vectors.
pub fn classify<'a, I>(lines: I, rules: &ClassifierRules) -> Classification
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = Classification::default();

    for line in lines {
        if line.chars().any(is_digit_char) {
            classify_numeric(line, rules, &mut result.lines_with_numbers);
        } else {
            classify_string(line, rules, &mut result.lines_with_strings);
        }
    }

    result
}

/// Digit branch: keep 18-digit identifiers verbatim, date-shape anything
/// with at least `date_digits` digits, drop shorter fragments as noise.
fn classify_numeric(line: &str, rules: &ClassifierRules, out: &mut Vec<String>) {
    let digits = extract_digits(line);
    let count = digits.chars().count();

    if count == rules.id_digits {
        out.push(digits);
    } else if count >= rules.date_digits {
        out.push(format_date(digits));
    }
    // 1..date_digits digits: recognition noise, dropped
}

/// String branch: keep lines of at least `min_chars` characters that contain
/// no filter phrase. Lines of exactly `min_chars` are kept only when they
/// equal the configured exception literal (the gender marker).
fn classify_string(line: &str, rules: &ClassifierRules, out: &mut Vec<String>) {
    let chars = line.chars().count();
    if chars < rules.min_chars {
        return;
    }
    if rules.filter_phrases.iter().any(|p| line.contains(p.as_str())) {
        return;
    }
    if chars > rules.min_chars || line == rules.keep_exact {
        out.push(line.to_string());
    }
}

/// Character count of the `YYYYMMDD` shape `format_date` understands.
const DATE_SHAPE_CHARS: usize = 8;

/// True for the decimal digits the engine emits for the configured scripts:
/// ASCII, Arabic-Indic (U+0660..U+0669), and Extended Arabic-Indic
/// (U+06F0..U+06F9).
fn is_digit_char(c: char) -> bool {
    c.is_ascii_digit() || ('\u{0660}'..='\u{0669}').contains(&c) || ('\u{06F0}'..='\u{06F9}').contains(&c)
}

/// The digit subsequence of a line, relative order preserved. Digits keep
/// their original script; Arabic-Indic digits are not transliterated.
fn extract_digits(line: &str) -> String {
    line.chars().filter(|c| is_digit_char(*c)).collect()
}

/// Insert `/` separators into a `YYYYMMDD` digit string, yielding
/// `YYYY/MM/DD`. Digit strings of any other length pass through unchanged —
/// no assumption that longer non-identifier fragments are dates. Positions
/// are counted in characters, so multi-byte digit scripts split correctly.
fn format_date(digits: String) -> String {
    if digits.chars().count() != DATE_SHAPE_CHARS {
        return digits;
    }
    let mut formatted = String::with_capacity(digits.len() + 2);
    for (i, c) in digits.chars().enumerate() {
        if i == 4 || i == 6 {
            formatted.push('/');
        }
        formatted.push(c);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ClassifierRules {
        ClassifierRules::default()
    }

    #[test]
    fn test_identifier_passthrough() {
        let result = classify(["123456789012345678"], &rules());
        assert_eq!(result.lines_with_numbers, vec!["123456789012345678"]);
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_date_normalization() {
        let result = classify(["20010115"], &rules());
        assert_eq!(result.lines_with_numbers, vec!["2001/01/15"]);
    }

    #[test]
    fn test_digits_extracted_from_mixed_line() {
        // The surrounding text is a filter phrase, but filter phrases only
        // apply to the digit-free branch.
        let result = classify(["تاريخ20010115"], &rules());
        assert_eq!(result.lines_with_numbers, vec!["2001/01/15"]);
    }

    #[test]
    fn test_long_non_identifier_digits_pass_raw() {
        // 12 digits: not an identifier, not date-shaped, kept as-is.
        let result = classify(["123456789012"], &rules());
        assert_eq!(result.lines_with_numbers, vec!["123456789012"]);
    }

    #[test]
    fn test_short_numeric_noise_discarded() {
        let result = classify(["ab12", "7"], &rules());
        assert!(result.lines_with_numbers.is_empty());
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_filter_phrase_suppression() {
        let result = classify(["بطاقة التعريف"], &rules());
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_colon_is_a_filter_phrase() {
        let result = classify(["Nom: Benali"], &rules());
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_male_exception_retained() {
        let result = classify(["ذكر"], &rules());
        assert_eq!(result.lines_with_strings, vec!["ذكر"]);
    }

    #[test]
    fn test_other_three_char_line_discarded() {
        let result = classify(["قمر"], &rules());
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_name_line_retained() {
        let result = classify(["AHMED BENALI"], &rules());
        assert_eq!(result.lines_with_strings, vec!["AHMED BENALI"]);
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        let result = classify(lines, &rules());
        assert_eq!(result, Classification::default());
    }

    #[test]
    fn test_order_preserved() {
        let result = classify(
            ["AHMED BENALI", "123456789012345678", "20010115", "وهران"],
            &rules(),
        );
        assert_eq!(
            result.lines_with_numbers,
            vec!["123456789012345678", "2001/01/15"]
        );
        assert_eq!(result.lines_with_strings, vec!["AHMED BENALI", "وهران"]);
    }

    #[test]
    fn test_partition_no_line_in_both_outputs() {
        let lines = ["ذكر", "بطاقة", "20010115", "ab12", "AHMED"];
        let result = classify(lines, &rules());
        let total = result.lines_with_numbers.len() + result.lines_with_strings.len();
        assert!(total <= lines.len());
        for n in &result.lines_with_numbers {
            assert!(!result.lines_with_strings.contains(n));
        }
    }

    #[test]
    fn test_digit_extraction_idempotent() {
        for line in ["a1b2c3", "بطاقة123", "", "987654", "تاريخ٢٠٠١"] {
            let once = extract_digits(line);
            assert_eq!(extract_digits(&once), once);
        }
    }

    #[test]
    fn test_format_date_only_on_exact_length() {
        assert_eq!(format_date("20010115".into()), "2001/01/15");
        assert_eq!(format_date("200101159".into()), "200101159");
    }

    #[test]
    fn test_arabic_indic_date_normalization() {
        // Eastern Arabic digits are decimal digits too; the date shape is
        // split on character positions, not bytes.
        let result = classify(["٢٠٠١٠١١٥"], &rules());
        assert_eq!(result.lines_with_numbers, vec!["٢٠٠١/٠١/١٥"]);
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_arabic_indic_identifier_passthrough() {
        let id = "١٢٣٤٥٦٧٨٩٠١٢٣٤٥٦٧٨";
        let result = classify([id], &rules());
        assert_eq!(result.lines_with_numbers, vec![id]);
    }

    #[test]
    fn test_arabic_indic_noise_discarded() {
        let result = classify(["رقم ١٢"], &rules());
        assert!(result.lines_with_numbers.is_empty());
        assert!(result.lines_with_strings.is_empty());
    }

    #[test]
    fn test_low_date_threshold_passes_short_digits_raw() {
        // A rules file may lower the date-shape gate; fragments shorter than
        // the YYYYMMDD shape must come through unformatted, not panic.
        let mut rules = rules();
        rules.date_digits = 5;
        let result = classify(["12345"], &rules);
        assert_eq!(result.lines_with_numbers, vec!["12345"]);
    }
}
