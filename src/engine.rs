//! Aggregation engine.
//!
//! Evaluates a structured [`Intent`] against a dataset snapshot:
//! filter -> time window -> grouping -> metric, producing one [`Answer`].
//! The snapshot is only ever borrowed immutably, so any number of
//! concurrent evaluations can share one snapshot safely.

use std::collections::BTreeMap;

use crate::dates::month_key;
use crate::models::{Answer, Dimension, Intent, SalesRecord, Series};

/// Evaluate an intent against the snapshot.
///
/// Stages run in fixed order: region-owner filter, date window, then one
/// of grouped breakdown / monthly trend / scalar sum. A grouping request
/// takes precedence over a trend request. Empty row sets are not errors;
/// they produce a zero scalar or an empty series.
pub fn evaluate(intent: &Intent, snapshot: &[SalesRecord]) -> Answer {
    let rows: Vec<&SalesRecord> = snapshot
        .iter()
        .filter(|record| match intent.rvp.as_deref() {
            Some(rvp) => record.region_owner.eq_ignore_ascii_case(rvp),
            None => true,
        })
        .filter(|record| match intent.window {
            Some(window) => window.contains(record.date),
            None => true,
        })
        .collect();

    let title = build_title(intent);

    if let Some(dimension) = intent.group_by {
        return grouped_breakdown(intent, dimension, &rows, title);
    }

    if intent.wants_trend {
        return monthly_trend(intent, &rows, title);
    }

    let total: f64 = rows.iter().map(|r| intent.metric.value(r)).sum();
    let text = format!("{} = {}", intent.metric.title(), format_amount(total));
    Answer::Text { title, text }
}

/// Compose the display title from the intent fields, in fixed order.
fn build_title(intent: &Intent) -> String {
    let mut parts = vec![intent.metric.title().to_string()];
    if let Some(ref rvp) = intent.rvp {
        parts.push(format!("for RVP {}", rvp));
    }
    if intent.window.is_some() {
        parts.push("(Last Quarter)".to_string());
    }
    if let Some(dimension) = intent.group_by {
        parts.push(format!("by {}", dimension.display_name()));
    }
    parts.join(" ")
}

/// Sum the metric per dimension value, sorted descending by sum.
///
/// Sums accumulate in a `BTreeMap` so that equal sums fall back to label
/// order and the output is deterministic.
fn grouped_breakdown(
    intent: &Intent,
    dimension: Dimension,
    rows: &[&SalesRecord],
    title: String,
) -> Answer {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in rows {
        *sums.entry(dimension.value(record)).or_default() += intent.metric.value(record);
    }

    let mut groups: Vec<(&str, f64)> = sums.into_iter().collect();
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let labels = groups.iter().map(|(label, _)| label.to_string()).collect();
    let data = groups.iter().map(|(_, sum)| round2(*sum)).collect();

    Answer::Chart {
        title,
        labels,
        datasets: vec![Series {
            label: intent.metric.as_str().to_string(),
            data,
        }],
    }
}

/// Sum the metric per calendar month, in chronological order.
///
/// Buckets are exactly the distinct months present in the rows; months
/// with no observations are not filled in.
fn monthly_trend(intent: &Intent, rows: &[&SalesRecord], title: String) -> Answer {
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for record in rows {
        *buckets.entry(month_key(record.date)).or_default() += intent.metric.value(record);
    }

    let labels = buckets.keys().cloned().collect();
    let data = buckets.values().map(|sum| round2(*sum)).collect();

    Answer::Chart {
        title: format!("{} (Monthly)", title),
        labels,
        datasets: vec![Series {
            label: intent.metric.as_str().to_string(),
            data,
        }],
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an amount with thousands separators and two decimals,
/// e.g. `1234567.891` -> `"1,234,567.89"`.
fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
