//! Heuristics for spotting human names.
//!
//! Used to pick a display-name column when a CSV has no recognizable name
//! headers (e.g. a roster whose names live under "Student" or "Guardian").

use pkt_model::{FieldHint, normalize};

/// Number of non-empty values sampled per column.
const SAMPLE_SIZE: usize = 20;
/// Minimum mean value score for a column to qualify.
const MIN_COLUMN_SCORE: f32 = 0.5;

/// Scores how much `value` looks like a person's name, in `[0, 1]`.
///
/// "Jane Doe" scores 1.0, "jane doe" 0.6, "Acme" 0.75; anything with digits
/// or an `@` scores 0.
pub fn score_name_like(value: &str) -> f32 {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('@') || trimmed.chars().any(|c| c.is_ascii_digit())
    {
        return 0.0;
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() > 4 {
        return 0.0;
    }
    let valid_word = |word: &&str| {
        word.chars()
            .all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.'))
            && word.chars().any(char::is_alphabetic)
    };
    if !words.iter().all(valid_word) {
        return 0.0;
    }

    let base = match words.len() {
        2 | 3 => 0.6,
        1 => 0.35,
        _ => 0.3,
    };
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count() as f32
        / words.len() as f32;

    (base + 0.4 * capitalized).min(1.0)
}

/// Picks the column most likely to hold a recipient's display name.
///
/// Columns whose header classifies as email, phone, date, initials or
/// signature are never chosen. Full-name headers get the largest boost.
/// Without data rows the choice falls back to the header hint alone.
/// Ties resolve to the leftmost column.
pub fn pick_display_column(headers: &[String], rows: &[Vec<String>]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, header) in headers.iter().enumerate() {
        let hint = normalize(header).hint;
        let header_bonus = match hint {
            FieldHint::FullName => 0.5,
            FieldHint::FirstName => 0.3,
            FieldHint::LastName => 0.2,
            FieldHint::Unknown => 0.0,
            FieldHint::Email
            | FieldHint::Phone
            | FieldHint::Date
            | FieldHint::Initials
            | FieldHint::Signature => continue,
        };

        let score = if rows.is_empty() {
            if header_bonus == 0.0 {
                continue;
            }
            header_bonus
        } else {
            let samples: Vec<f32> = rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|v| !v.trim().is_empty())
                .take(SAMPLE_SIZE)
                .map(|v| score_name_like(v))
                .collect();
            if samples.is_empty() {
                continue;
            }
            let mean = samples.iter().sum::<f32>() / samples.len() as f32;
            if mean < MIN_COLUMN_SCORE {
                continue;
            }
            mean + header_bonus
        };

        if best.is_none_or(|(_, top)| score > top) {
            best = Some((idx, score));
        }
    }

    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_score_name_like() {
        assert_eq!(score_name_like("Jane Doe"), 1.0);
        assert!((score_name_like("jane doe") - 0.6).abs() < 1e-6);
        assert!((score_name_like("Acme") - 0.75).abs() < 1e-6);
        assert_eq!(score_name_like("jane@example.com"), 0.0);
        assert_eq!(score_name_like("Room 12"), 0.0);
        assert_eq!(score_name_like(""), 0.0);
        assert_eq!(score_name_like("Mary-Kate O'Neil"), 1.0);
    }

    #[test]
    fn test_pick_display_column_by_values() {
        let headers = strings(&["Student", "Email", "Room"]);
        let rows = vec![
            strings(&["Ann Lee", "ann@x.com", "12"]),
            strings(&["Bo Park", "bo@x.com", "14"]),
        ];
        assert_eq!(pick_display_column(&headers, &rows), Some(0));
    }

    #[test]
    fn test_header_hint_breaks_value_tie() {
        let headers = strings(&["Coach", "Guardian Name"]);
        let rows = vec![strings(&["Ms Lee", "Ann Park"])];
        assert_eq!(pick_display_column(&headers, &rows), Some(1));
    }

    #[test]
    fn test_no_rows_uses_header_only() {
        let headers = strings(&["Email", "First Name", "Full Name"]);
        assert_eq!(pick_display_column(&headers, &[]), Some(2));
        assert_eq!(pick_display_column(&strings(&["Email", "Room"]), &[]), None);
    }

    #[test]
    fn test_email_column_never_chosen() {
        let headers = strings(&["Email"]);
        let rows = vec![strings(&["Jane Doe"])];
        assert_eq!(pick_display_column(&headers, &rows), None);
    }
}
