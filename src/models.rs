//! Data models for the sales question answering pipeline.
//!
//! This module contains all the core data structures used throughout
//! the application for representing dataset rows, query intents, and
//! the response contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::dates::DateWindow;

/// One observation in the sales dataset snapshot.
///
/// Every row carries a well-formed date, three non-negative flow amounts,
/// and five short identifying dimension strings. The engine trusts the
/// source for those invariants and does not re-validate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Observation date (ISO `YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Gross purchase amount.
    pub purchases: f64,
    /// Gross redemption amount.
    pub redemptions: f64,
    /// Assets under management on the observation date.
    pub assets: f64,
    /// Wholesaler responsible for the sale.
    pub wholesaler: String,
    /// Advisor of record.
    pub advisor: String,
    /// Mandate the flow belongs to.
    pub mandate_name: String,
    /// Fund type bucket (equity, fixed income, ...).
    pub fund_type: String,
    /// Region owner. Legacy snapshots label this column `rvp`.
    #[serde(alias = "rvp")]
    pub region_owner: String,
}

/// Aggregatable metric column of a [`SalesRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Purchases,
    Redemptions,
    Assets,
}

impl Metric {
    /// Read this metric's value from a record.
    pub fn value(&self, record: &SalesRecord) -> f64 {
        match self {
            Metric::Purchases => record.purchases,
            Metric::Redemptions => record.redemptions,
            Metric::Assets => record.assets,
        }
    }

    /// Lower-case column name, used as the chart series label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Purchases => "purchases",
            Metric::Redemptions => "redemptions",
            Metric::Assets => "assets",
        }
    }

    /// Title-cased name for display titles.
    pub fn title(&self) -> &'static str {
        match self {
            Metric::Purchases => "Purchases",
            Metric::Redemptions => "Redemptions",
            Metric::Assets => "Assets",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimension column a breakdown can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    FundType,
    Wholesaler,
    Advisor,
    MandateName,
}

impl Dimension {
    /// Read this dimension's value from a record.
    pub fn value<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            Dimension::FundType => &record.fund_type,
            Dimension::Wholesaler => &record.wholesaler,
            Dimension::Advisor => &record.advisor,
            Dimension::MandateName => &record.mandate_name,
        }
    }

    /// Snake-case column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::FundType => "fund_type",
            Dimension::Wholesaler => "wholesaler",
            Dimension::Advisor => "advisor",
            Dimension::MandateName => "mandate_name",
        }
    }

    /// Display name with underscores replaced by spaces and each word
    /// title-cased, as it appears in answer titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dimension::FundType => "Fund Type",
            Dimension::Wholesaler => "Wholesaler",
            Dimension::Advisor => "Advisor",
            Dimension::MandateName => "Mandate Name",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured aggregation request inferred from one question.
///
/// Constructed fresh per request by the intent extractor and discarded
/// after the answer is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    /// Region-owner filter value, from question text or caller context.
    pub rvp: Option<String>,
    /// Closed date window the rows must fall in.
    pub window: Option<DateWindow>,
    /// Breakdown dimension. Takes precedence over `wants_trend`.
    pub group_by: Option<Dimension>,
    /// Metric to aggregate. Defaults to purchases.
    pub metric: Metric,
    /// Whether the question asked for a monthly time series.
    pub wants_trend: bool,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            rvp: None,
            window: None,
            group_by: None,
            metric: Metric::Purchases,
            wants_trend: false,
        }
    }
}

/// Caller-supplied context accompanying a question.
///
/// Only `rvp` is interpreted today; other keys are preserved so callers
/// can round-trip their own context objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserContext {
    /// Region owner the caller is scoped to (e.g. from a session).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rvp: Option<String>,
    /// Unrecognized context keys, carried but ignored.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A question plus optional caller context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Free-text analytic question.
    pub question: String,
    /// Optional caller context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<UserContext>,
}

impl AskRequest {
    /// Build a request from a bare question with no context.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            user_context: None,
        }
    }

    /// Attach a caller context.
    pub fn with_context(mut self, context: UserContext) -> Self {
        self.user_context = Some(context);
        self
    }
}

/// One named numeric series of a chart answer, aligned to its labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
}

/// Response contract: exactly one shape per answer.
///
/// `Table` is reserved for tabular answers; the router does not produce
/// it today but downstream consumers already match on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Answer {
    Text {
        title: String,
        text: String,
    },
    Chart {
        title: String,
        labels: Vec<String>,
        datasets: Vec<Series>,
    },
    Table {
        title: String,
        table: Vec<serde_json::Map<String, serde_json::Value>>,
    },
}

impl Answer {
    /// The display title common to every answer shape.
    #[allow(dead_code)] // Utility accessor (variants carry their titles)
    pub fn title(&self) -> &str {
        match self {
            Answer::Text { title, .. } => title,
            Answer::Chart { title, .. } => title,
            Answer::Table { title, .. } => title,
        }
    }
}
