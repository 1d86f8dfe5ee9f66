//! ASCII table formatting for composition summaries
//!
//! Renders category/count/percentage rows as an ASCII table using the
//! [`tabled`] crate, for the plain-text summaries written next to the
//! composition charts.

use tabled::{Table, Tabled};

/// One category of a composition group with its count and share.
#[derive(Debug, Clone, Tabled)]
pub struct CompositionRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl CompositionRow {
    /// Creates a row with the percentage formatted against `total`.
    pub fn new(category: String, count: u64, total: u64) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", (count as f64 / total as f64) * 100.0)
        };

        Self {
            category,
            count,
            percentage,
        }
    }
}

/// Formats composition rows as an ASCII table with an optional title.
pub fn format_composition_table(rows: &[CompositionRow], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No data available".to_string();
    }

    let table = Table::new(rows).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}
