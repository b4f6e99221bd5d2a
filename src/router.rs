//! Question routing.
//!
//! Composes the intent extractor, the data source, and the aggregation
//! engine behind a single `ask` call: one request in, one answer out.

use tracing::debug;

use crate::data::{DataError, DataSource};
use crate::engine;
use crate::intent::IntentExtractor;
use crate::models::{Answer, AskRequest};

/// Routes questions to the aggregation engine.
///
/// The snapshot provider is injected, so the router owns no dataset
/// state of its own; each request fetches whatever the source currently
/// returns and evaluates against it.
pub struct QueryRouter<S> {
    source: S,
    extractor: IntentExtractor,
}

impl<S: DataSource> QueryRouter<S> {
    /// Create a router over a snapshot source, anchored to today.
    pub fn new(source: S) -> Self {
        Self::with_extractor(source, IntentExtractor::new())
    }

    /// Create a router with a specific extractor (fixed reference dates
    /// in tests).
    pub fn with_extractor(source: S, extractor: IntentExtractor) -> Self {
        Self { source, extractor }
    }

    /// Answer one question.
    ///
    /// Fails only if the snapshot cannot be acquired or parsed; every
    /// question shape produces an answer.
    pub fn ask(&self, request: &AskRequest) -> Result<Answer, DataError> {
        let intent = self
            .extractor
            .extract(&request.question, request.user_context.as_ref());
        let snapshot = self.source.snapshot()?;
        debug!(rows = snapshot.len(), question = %request.question, "evaluating");
        Ok(engine::evaluate(&intent, &snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SalesRecord, UserContext};
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct StaticSource(Arc<Vec<SalesRecord>>);

    impl DataSource for StaticSource {
        fn snapshot(&self) -> Result<Arc<Vec<SalesRecord>>, DataError> {
            Ok(Arc::clone(&self.0))
        }
    }

    fn record(date: (i32, u32, u32), redemptions: f64, fund_type: &str, owner: &str) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            purchases: 100.0,
            redemptions,
            assets: 1_000.0,
            wholesaler: "Apex Partners".to_string(),
            advisor: "J. Morgan".to_string(),
            mandate_name: "Core Growth".to_string(),
            fund_type: fund_type.to_string(),
            region_owner: owner.to_string(),
        }
    }

    fn router() -> QueryRouter<StaticSource> {
        let source = StaticSource(Arc::new(vec![
            record((2024, 1, 10), 40.0, "Equity", "Alice"),
            record((2024, 2, 12), 15.0, "Balanced", "Alice"),
            record((2024, 2, 20), 99.0, "Equity", "Bob"),
        ]));
        let extractor =
            IntentExtractor::with_reference_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        QueryRouter::with_extractor(source, extractor)
    }

    #[test]
    fn test_ask_scenario_rvp_breakdown() {
        let request = AskRequest::new("redemptions for rvp alice by fund type")
            .with_context(UserContext::default());
        let answer = router().ask(&request).unwrap();

        match answer {
            Answer::Chart {
                title,
                labels,
                datasets,
            } => {
                assert_eq!(title, "Redemptions for RVP Alice by Fund Type");
                assert_eq!(labels, vec!["Equity", "Balanced"]);
                assert_eq!(datasets[0].label, "redemptions");
                assert_eq!(datasets[0].data, vec![40.0, 15.0]);
            }
            other => panic!("expected chart answer, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_wholesaler_breakdown_is_chart_typed() {
        let answer = router()
            .ask(&AskRequest::new("purchases by wholesaler"))
            .unwrap();
        assert!(matches!(answer, Answer::Chart { .. }));
    }

    #[test]
    fn test_ask_context_supplies_filter() {
        let request = AskRequest::new("total redemptions").with_context(UserContext {
            rvp: Some("Bob".to_string()),
            ..UserContext::default()
        });
        let answer = router().ask(&request).unwrap();

        match answer {
            Answer::Text { title, text } => {
                assert_eq!(title, "Redemptions for RVP Bob");
                assert_eq!(text, "Redemptions = 99.00");
            }
            other => panic!("expected text answer, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_unrecognized_question_sums_purchases() {
        let answer = router().ask(&AskRequest::new("how is it going")).unwrap();
        match answer {
            Answer::Text { title, text } => {
                assert_eq!(title, "Purchases");
                assert_eq!(text, "Purchases = 300.00");
            }
            other => panic!("expected text answer, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_last_quarter_filters_window() {
        // Reference 2024-05-15 puts last quarter at 2024-01-01..2024-03-31;
        // all fixture rows fall inside it.
        let answer = router()
            .ask(&AskRequest::new("purchases last quarter"))
            .unwrap();
        match answer {
            Answer::Text { title, text } => {
                assert_eq!(title, "Purchases (Last Quarter)");
                assert_eq!(text, "Purchases = 300.00");
            }
            other => panic!("expected text answer, got {:?}", other),
        }
    }
}
