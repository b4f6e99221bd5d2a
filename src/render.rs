//! Answer rendering.
//!
//! Shapes an [`Answer`] for its destination: the JSON response contract
//! for machine consumers, or a plain terminal rendering (scalar line,
//! horizontal bar chart, record listing) for humans.

use anyhow::Result;

use crate::models::Answer;

/// Width of the widest bar in a terminal chart.
const BAR_WIDTH: usize = 40;

/// Encode an answer as pretty-printed JSON.
pub fn to_json(answer: &Answer) -> Result<String> {
    Ok(serde_json::to_string_pretty(answer)?)
}

/// Render an answer for the terminal.
pub fn to_terminal(answer: &Answer) -> String {
    match answer {
        Answer::Text { title, text } => format!("{}\n  {}\n", title, text),
        Answer::Chart {
            title,
            labels,
            datasets,
        } => render_chart(title, labels, datasets),
        Answer::Table { title, table } => render_table(title, table),
    }
}

fn render_chart(title: &str, labels: &[String], datasets: &[crate::models::Series]) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');

    let Some(series) = datasets.first() else {
        output.push_str("  (no data)\n");
        return output;
    };
    if series.data.is_empty() {
        output.push_str("  (no data)\n");
        return output;
    }

    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let max_value = series.data.iter().cloned().fold(f64::MIN, f64::max);

    for (label, value) in labels.iter().zip(&series.data) {
        let bar_len = if max_value > 0.0 {
            ((value / max_value) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        output.push_str(&format!(
            "  {:<label_width$}  {} {:.2}\n",
            label,
            "█".repeat(bar_len),
            value,
        ));
    }

    output
}

fn render_table(
    title: &str,
    table: &[serde_json::Map<String, serde_json::Value>],
) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');

    if table.is_empty() {
        output.push_str("  (no rows)\n");
        return output;
    }

    for row in table {
        let cells: Vec<String> = row
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        output.push_str(&format!("  {}\n", cells.join("  ")));
    }

    output
}
