use std::fmt;

/// Output-size tier for a summary, chosen from the transcript word count so
/// that short inputs never reserve an oversized completion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryBudget {
    Small,
    Medium,
    Large,
}

impl SummaryBudget {
    /// Roughly: under 10 minutes of speech, 10-60 minutes, longer.
    pub fn from_word_count(words: usize) -> Self {
        if words < 1200 {
            SummaryBudget::Small
        } else if words < 6000 {
            SummaryBudget::Medium
        } else {
            SummaryBudget::Large
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self {
            SummaryBudget::Small => 500,
            SummaryBudget::Medium => 1000,
            SummaryBudget::Large => 1500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryBudget::Small => "small",
            SummaryBudget::Medium => "medium",
            SummaryBudget::Large => "large",
        }
    }
}

impl fmt::Display for SummaryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
