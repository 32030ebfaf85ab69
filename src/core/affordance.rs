use rust_decimal::Decimal;

pub const LOADING_TEXT: &str = "Adding items to bag";
pub const COMPLETED_TEXT: &str = "Items added to bag";

/// Texts for the button that triggers a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAffordance {
    pub default_text: String,
    pub loading_text: &'static str,
    pub completed_text: &'static str,
}

impl CommitAffordance {
    pub fn for_count(count: usize) -> Self {
        Self {
            default_text: commit_label(count),
            loading_text: LOADING_TEXT,
            completed_text: COMPLETED_TEXT,
        }
    }
}

pub fn commit_label(count: usize) -> String {
    match count {
        0 | 1 => "Add to bag".to_string(),
        2 => "Add both to bag".to_string(),
        _ => "Add all three to bag".to_string(),
    }
}

/// `None` when there is nothing worth showing (total of zero or less).
pub fn format_total(total: Decimal, currency_symbol: &str) -> Option<String> {
    if total <= Decimal::ZERO {
        return None;
    }
    Some(format!("{}{:.2}", currency_symbol, total.round_dp(2)))
}
