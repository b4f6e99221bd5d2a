//! Intent extraction from free-text questions.
//!
//! Turns a question string (plus optional caller context) into a
//! structured [`Intent`] by keyword and pattern matching. Matching is
//! case-insensitive and needs no access to the dataset.
//!
//! Grouping and metric selection run against ordered rule tables so the
//! priority between overlapping phrases ("by mandate" vs "by mandate
//! name") is explicit rather than an accident of branch order.

use chrono::{Local, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::dates::last_quarter;
use crate::models::{Dimension, Intent, Metric, UserContext};

/// Grouping phrases in priority order; first match wins.
const GROUP_RULES: &[(&str, Dimension)] = &[
    ("by fund type", Dimension::FundType),
    ("by wholesaler", Dimension::Wholesaler),
    ("by advisor", Dimension::Advisor),
    // Also covers "by mandate name".
    ("by mandate", Dimension::MandateName),
];

/// Metric keywords in priority order; first match wins, purchases is the
/// fallback when nothing matches.
const METRIC_RULES: &[(&str, Metric)] = &[
    ("redemption", Metric::Redemptions),
    ("purchase", Metric::Purchases),
    ("asset", Metric::Assets),
];

/// Phrases that select the previous completed calendar quarter.
const WINDOW_PHRASES: &[&str] = &["last quarter", "past quarter"];

/// Phrases that request a monthly time series.
const TREND_PHRASES: &[&str] = &["trend", "over time", "by month"];

/// Extractor for structured query intents.
///
/// Holds the reference date that anchors relative time windows, so
/// extraction is a pure function of the question, the context, and the
/// extractor itself.
pub struct IntentExtractor {
    today: NaiveDate,
    rvp_mention: Regex,
}

impl Default for IntentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentExtractor {
    /// Create an extractor anchored to the current local date.
    pub fn new() -> Self {
        Self::with_reference_date(Local::now().date_naive())
    }

    /// Create an extractor with a specific reference date.
    pub fn with_reference_date(today: NaiveDate) -> Self {
        Self {
            today,
            // A region-owner mention: the literal token "rvp" followed by
            // one alphabetic token. Runs against the lower-cased question.
            rvp_mention: Regex::new(r"rvp\s+([a-z]+)").expect("static pattern compiles"),
        }
    }

    /// Extract the structured intent of a question.
    ///
    /// Rules fire independently: a question can set a filter, a window,
    /// a grouping, and a trend flag all at once.
    pub fn extract(&self, question: &str, context: Option<&UserContext>) -> Intent {
        let q = question.to_lowercase();

        let rvp = self.extract_rvp(&q, context);

        let window = if WINDOW_PHRASES.iter().any(|p| q.contains(p)) {
            Some(last_quarter(self.today))
        } else {
            None
        };

        let group_by = GROUP_RULES
            .iter()
            .find(|(phrase, _)| q.contains(phrase))
            .map(|(_, dimension)| *dimension);

        let metric = METRIC_RULES
            .iter()
            .find(|(keyword, _)| q.contains(keyword))
            .map(|(_, metric)| *metric)
            .unwrap_or(Metric::Purchases);

        let wants_trend = TREND_PHRASES.iter().any(|p| q.contains(p));

        let intent = Intent {
            rvp,
            window,
            group_by,
            metric,
            wants_trend,
        };
        debug!(?intent, "extracted intent");
        intent
    }

    /// Resolve the region-owner filter. A mention in the question wins
    /// over the caller context.
    fn extract_rvp(&self, lowercased: &str, context: Option<&UserContext>) -> Option<String> {
        if let Some(captures) = self.rvp_mention.captures(lowercased) {
            return Some(title_case(&captures[1]));
        }
        context
            .and_then(|ctx| ctx.rvp.as_deref())
            .filter(|rvp| !rvp.is_empty())
            .map(str::to_string)
    }
}

/// Upper-case the first letter of a single word, lower-case the rest.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
