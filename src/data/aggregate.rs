//! The fixed catalog of aggregates the dashboard renders.
//!
//! Every function here is a pure read over a [`FilteredView`]. None of them
//! panics or divides by zero on an empty or single-record view: degenerate
//! cases come back as 0, an empty table, or `None` ("undefined").

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::filter::FilteredView;
use super::model::{CategoryColumn, NumericColumn};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Sum of `Total` over the view; 0 when the view is empty.
pub fn total_sum(view: &FilteredView) -> f64 {
    view.records().map(|r| r.total).sum()
}

/// Sum of `gross income` over the view; 0 when the view is empty.
pub fn gross_income_sum(view: &FilteredView) -> f64 {
    view.records().map(|r| r.gross_income).sum()
}

/// Number of transactions in the view.
pub fn transaction_count(view: &FilteredView) -> usize {
    view.len()
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Daily sales totals in ascending date order.
///
/// The series is sparse: days with no matching transaction are absent, not
/// zero-filled.
pub fn daily_totals(view: &FilteredView) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for rec in view.records() {
        *by_date.entry(rec.date).or_insert(0.0) += rec.total;
    }
    by_date.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Single-key grouped sums
// ---------------------------------------------------------------------------

/// Sum a numeric column per distinct value of a categorical column, sorted
/// descending on the sum (the canonical presentation order).
///
/// Sparse: category values with no record in the view are omitted.
pub fn grouped_sum(
    view: &FilteredView,
    key: CategoryColumn,
    value: NumericColumn,
) -> Vec<(String, f64)> {
    let mut table: BTreeMap<String, f64> = BTreeMap::new();
    for rec in view.records() {
        *table.entry(key.value(rec).to_string()).or_insert(0.0) += value.value(rec);
    }
    let mut rows: Vec<(String, f64)> = table.into_iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

/// Total sales per product line, best-selling first.
pub fn by_product_line(view: &FilteredView) -> Vec<(String, f64)> {
    grouped_sum(view, CategoryColumn::ProductLine, NumericColumn::Total)
}

/// Gross income per branch, highest first.
pub fn by_branch(view: &FilteredView) -> Vec<(String, f64)> {
    grouped_sum(view, CategoryColumn::Branch, NumericColumn::GrossIncome)
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of one group, rounded to 2 decimals for display.
///
/// `std` is the sample standard deviation (n − 1 denominator) and is `None`
/// for a single-record group, where the statistic is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub q3: f64,
    pub max: f64,
}

/// Describe the `Total` spend per customer type. Groups absent from the view
/// are absent from the table; an empty view yields an empty table.
pub fn describe_by_customer_type(view: &FilteredView) -> BTreeMap<String, Describe> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for rec in view.records() {
        groups
            .entry(rec.customer_type.as_str().to_string())
            .or_default()
            .push(rec.total);
    }
    groups
        .into_iter()
        .map(|(k, values)| (k, describe(values)))
        .collect()
}

fn describe(mut values: Vec<f64>) -> Describe {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n < 2 {
        None
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some(round2((ss / (n - 1) as f64).sqrt()))
    };
    Describe {
        count: n,
        mean: round2(mean),
        median: round2(quantile(&values, 0.5)),
        std,
        min: round2(values[0]),
        q1: round2(quantile(&values, 0.25)),
        q3: round2(quantile(&values, 0.75)),
        max: round2(values[n - 1]),
    }
}

/// Linear-interpolation quantile over pre-sorted values (the pandas default
/// method). `values` must be non-empty.
fn quantile(values: &[f64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return values[lo];
    }
    let frac = pos - lo as f64;
    values[lo] + frac * (values[hi] - values[lo])
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient between two numeric columns of the view.
///
/// `None` when the coefficient is undefined: fewer than 2 records, or either
/// column has zero variance. Never NaN.
pub fn pearson(view: &FilteredView, a: NumericColumn, b: NumericColumn) -> Option<f64> {
    let x: Vec<f64> = view.records().map(|r| a.value(r)).collect();
    let y: Vec<f64> = view.records().map(|r| b.value(r)).collect();
    pearson_slices(&x, &y)
}

fn pearson_slices(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let var_x = n * sum_x2 - sum_x * sum_x;
    let var_y = n * sum_y2 - sum_y * sum_y;
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((n * sum_xy - sum_x * sum_y) / (var_x * var_y).sqrt())
}

/// Pairwise Pearson coefficients over a fixed column list.
///
/// Entry `[i][j]` correlates `columns[i]` with `columns[j]`. Self-pairs are
/// exactly `Some(1.0)` unless the column has zero variance, in which case the
/// whole row/column is `None`.
pub fn correlation_matrix(
    view: &FilteredView,
    columns: &[NumericColumn],
) -> Vec<Vec<Option<f64>>> {
    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| view.records().map(|r| col.value(r)).collect())
        .collect();

    (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| {
                    if i == j {
                        // Undefined under zero variance, else 1 by definition.
                        pearson_slices(&series[i], &series[j]).map(|_| 1.0)
                    } else {
                        pearson_slices(&series[i], &series[j])
                    }
                })
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dense tables
// ---------------------------------------------------------------------------

/// A dense two-key grouped sum: one row per branch, one column per product
/// line, over the **full observed domains** of the underlying store. Cells
/// with no matching record hold 0, so a stacked-bar consumer always sees
/// every segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_keys: Vec<String>,
    pub col_keys: Vec<String>,
    /// `values[row][col]`, aligned with `row_keys` / `col_keys`.
    pub values: Vec<Vec<f64>>,
}

impl CrossTab {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_keys.iter().position(|k| k == row)?;
        let c = self.col_keys.iter().position(|k| k == col)?;
        Some(self.values[r][c])
    }
}

/// Gross income summed by `(branch, product line)`, dense over both domains.
pub fn gross_income_by_branch_and_product(view: &FilteredView) -> CrossTab {
    let dataset = view.dataset();
    let row_keys: Vec<String> = dataset.domain(CategoryColumn::Branch).iter().cloned().collect();
    let col_keys: Vec<String> = dataset
        .domain(CategoryColumn::ProductLine)
        .iter()
        .cloned()
        .collect();

    let mut values = vec![vec![0.0; col_keys.len()]; row_keys.len()];
    for rec in view.records() {
        // Both keys come from the store's own domains, so lookup cannot miss.
        let r = row_keys.iter().position(|k| *k == rec.branch);
        let c = col_keys.iter().position(|k| *k == rec.product_line);
        if let (Some(r), Some(c)) = (r, c) {
            values[r][c] += rec.gross_income;
        }
    }

    CrossTab {
        row_keys,
        col_keys,
        values,
    }
}

/// Transactions per payment method, dense over the full observed payment
/// domain (zero counts included so the chart can label an empty bar).
pub fn payment_counts(view: &FilteredView) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = view
        .dataset()
        .domain(CategoryColumn::Payment)
        .iter()
        .map(|m| (m.clone(), 0))
        .collect();
    for rec in view.records() {
        if let Some(entry) = counts.iter_mut().find(|(m, _)| m == rec.payment.as_str()) {
            entry.1 += 1;
        }
    }
    counts
}
