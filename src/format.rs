//! Display formatting helpers shared by the TUI and the one-shot CLI.

use chrono::NaiveDate;

/// Placeholder for absent text fields.
pub const NOT_INFORMED: &str = "Não informado";
/// Placeholder for absent date fields.
pub const DATE_NOT_INFORMED: &str = "Não informada";

/// Characters of object text shown per result row.
pub const OBJECT_EXCERPT_CHARS: usize = 200;
/// Characters of work-plan text shown per result row.
pub const WORK_PLAN_EXCERPT_CHARS: usize = 150;

/// Truncate to at most `max_chars` characters, appending an ellipsis only
/// when something was cut. Counts chars, not bytes, so accented text never
/// splits mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Render an ISO date in Brazilian convention (27/10/2024).
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => DATE_NOT_INFORMED.to_string(),
    }
}

/// Similarity badge for a result row: one decimal place.
pub fn format_score_badge(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Similarity line for the detail view: two decimal places.
pub fn format_score_detail(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

/// Color tier for a similarity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Neutral,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 0.6 {
            ScoreTier::High
        } else if score >= 0.4 {
            ScoreTier::Medium
        } else {
            ScoreTier::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_appends_ellipsis_only_when_cut() {
        let long = "a".repeat(250);
        let shown = truncate_chars(&long, 200);
        assert_eq!(shown.chars().count(), 201);
        assert!(shown.ends_with('…'));
        assert_eq!(&shown[..200], &long[..200]);

        let short = "a".repeat(200);
        assert_eq!(truncate_chars(&short, 200), short);
        assert_eq!(truncate_chars("abc", 200), "abc");
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // 5 chars, 10 bytes; a byte-based cut at 4 would panic.
        let text = "ççççç";
        assert_eq!(truncate_chars(text, 4), "çççç…");
        assert_eq!(truncate_chars(text, 5), text);
    }

    #[test]
    fn dates_render_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 27);
        assert_eq!(format_date(date), "27/10/2024");
        assert_eq!(format_date(None), "Não informada");
    }

    #[test]
    fn score_formats() {
        assert_eq!(format_score_badge(0.825), "82.5%");
        assert_eq!(format_score_detail(0.825), "82.50%");
        assert_eq!(format_score_badge(1.0), "100.0%");
    }

    #[test]
    fn score_tiers() {
        assert_eq!(ScoreTier::for_score(0.95), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(0.6), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(0.59), ScoreTier::Medium);
        assert_eq!(ScoreTier::for_score(0.4), ScoreTier::Medium);
        assert_eq!(ScoreTier::for_score(0.39), ScoreTier::Neutral);
    }
}
