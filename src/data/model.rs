use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Closed categorical domains
// ---------------------------------------------------------------------------

/// Customer segmentation recorded at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    Member,
    Normal,
}

impl CustomerType {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerType::Member => "Member",
            CustomerType::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Payment {
    Cash,
    CreditCard,
    Ewallet,
}

impl Payment {
    pub fn as_str(self) -> &'static str {
        match self {
            Payment::Cash => "Cash",
            Payment::CreditCard => "Credit card",
            Payment::Ewallet => "Ewallet",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record – one transaction (one row of the source CSV)
// ---------------------------------------------------------------------------

/// A single sales transaction with a fixed, statically-typed schema.
///
/// `total`, `cogs` and `gross_income` are trusted as recorded; the data layer
/// never re-derives or cross-checks their arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    /// Time of sale. Present in the source but unused by any aggregate.
    pub time: Option<NaiveTime>,
    pub branch: String,
    pub city: String,
    pub customer_type: CustomerType,
    pub gender: Gender,
    pub product_line: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub tax: f64,
    pub total: f64,
    pub payment: Payment,
    pub cogs: f64,
    pub gross_income: f64,
    pub rating: f64,
    /// Calendar month name, materialized from `date` at load time.
    pub month: String,
}

/// English month name for a date, e.g. "January".
pub fn month_name(date: NaiveDate) -> String {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES[date.month0() as usize].to_string()
}

// ---------------------------------------------------------------------------
// Column selectors – typed replacements for stringly-keyed column access
// ---------------------------------------------------------------------------

/// A categorical column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryColumn {
    Branch,
    City,
    CustomerType,
    Gender,
    ProductLine,
    Payment,
    Month,
}

impl CategoryColumn {
    pub const ALL: [CategoryColumn; 7] = [
        CategoryColumn::Branch,
        CategoryColumn::City,
        CategoryColumn::CustomerType,
        CategoryColumn::Gender,
        CategoryColumn::ProductLine,
        CategoryColumn::Payment,
        CategoryColumn::Month,
    ];

    /// Project a record onto this column.
    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            CategoryColumn::Branch => &record.branch,
            CategoryColumn::City => &record.city,
            CategoryColumn::CustomerType => record.customer_type.as_str(),
            CategoryColumn::Gender => record.gender.as_str(),
            CategoryColumn::ProductLine => &record.product_line,
            CategoryColumn::Payment => record.payment.as_str(),
            CategoryColumn::Month => &record.month,
        }
    }

    /// Human-readable column label for the UI.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryColumn::Branch => "Branch",
            CategoryColumn::City => "City",
            CategoryColumn::CustomerType => "Customer type",
            CategoryColumn::Gender => "Gender",
            CategoryColumn::ProductLine => "Product line",
            CategoryColumn::Payment => "Payment",
            CategoryColumn::Month => "Month",
        }
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A numeric column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    UnitPrice,
    Quantity,
    Tax,
    Total,
    Cogs,
    GrossIncome,
    Rating,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 7] = [
        NumericColumn::UnitPrice,
        NumericColumn::Quantity,
        NumericColumn::Tax,
        NumericColumn::Total,
        NumericColumn::Cogs,
        NumericColumn::GrossIncome,
        NumericColumn::Rating,
    ];

    pub fn value(&self, record: &Record) -> f64 {
        match self {
            NumericColumn::UnitPrice => record.unit_price,
            NumericColumn::Quantity => record.quantity as f64,
            NumericColumn::Tax => record.tax,
            NumericColumn::Total => record.total,
            NumericColumn::Cogs => record.cogs,
            NumericColumn::GrossIncome => record.gross_income,
            NumericColumn::Rating => record.rating,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumericColumn::UnitPrice => "Unit price",
            NumericColumn::Quantity => "Quantity",
            NumericColumn::Tax => "Tax 5%",
            NumericColumn::Total => "Total",
            NumericColumn::Cogs => "cogs",
            NumericColumn::GrossIncome => "gross income",
            NumericColumn::Rating => "Rating",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded record store
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
///
/// Loaded once, never mutated afterwards; filters and aggregates only ever
/// read from it, so a shared reference is all they need.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    /// For each categorical column the sorted set of distinct observed values.
    domains: BTreeMap<CategoryColumn, BTreeSet<String>>,
    /// Observed (min, max) transaction dates; `None` for an empty dataset.
    date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl Dataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut domains: BTreeMap<CategoryColumn, BTreeSet<String>> = CategoryColumn::ALL
            .iter()
            .map(|col| (*col, BTreeSet::new()))
            .collect();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            for col in CategoryColumn::ALL {
                domains
                    .get_mut(&col)
                    .expect("all columns pre-seeded")
                    .insert(col.value(rec).to_string());
            }
            date_bounds = Some(match date_bounds {
                None => (rec.date, rec.date),
                Some((min, max)) => (min.min(rec.date), max.max(rec.date)),
            });
        }

        Dataset {
            records,
            domains,
            date_bounds,
        }
    }

    /// All records in load order. The order is stable across calls.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names of the fixed record schema, in display order.
    pub fn columns() -> impl Iterator<Item = &'static str> {
        CategoryColumn::ALL
            .iter()
            .map(|c| c.label())
            .chain(NumericColumn::ALL.iter().map(|c| c.label()))
            .chain(["Date", "Time"])
    }

    /// Distinct observed values of a categorical column.
    pub fn domain(&self, column: CategoryColumn) -> &BTreeSet<String> {
        &self.domains[&column]
    }

    /// Observed (min, max) transaction dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate, branch: &str, product: &str, total: f64) -> Record {
        Record {
            date,
            time: None,
            branch: branch.to_string(),
            city: "Yangon".to_string(),
            customer_type: CustomerType::Member,
            gender: Gender::Female,
            product_line: product.to_string(),
            unit_price: total,
            quantity: 1,
            tax: 0.0,
            total,
            payment: Payment::Cash,
            cogs: total,
            gross_income: total,
            rating: 7.0,
            month: month_name(date),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_is_materialized_from_date() {
        assert_eq!(month_name(date(2019, 1, 5)), "January");
        assert_eq!(month_name(date(2019, 12, 31)), "December");
    }

    #[test]
    fn domains_and_date_bounds_reflect_observed_values() {
        let ds = Dataset::from_records(vec![
            record(date(2019, 1, 5), "A", "Health and beauty", 100.0),
            record(date(2019, 3, 2), "B", "Food and beverages", 50.0),
            record(date(2019, 1, 6), "A", "Health and beauty", 30.0),
        ]);

        let branches: Vec<&String> = ds.domain(CategoryColumn::Branch).iter().collect();
        assert_eq!(branches, ["A", "B"]);

        let months: Vec<&String> = ds.domain(CategoryColumn::Month).iter().collect();
        assert_eq!(months, ["January", "March"]);

        assert_eq!(ds.date_bounds(), Some((date(2019, 1, 5), date(2019, 3, 2))));
    }

    #[test]
    fn empty_dataset_has_empty_domains_and_no_bounds() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.domain(CategoryColumn::Payment).is_empty());
        assert_eq!(ds.date_bounds(), None);
    }

    #[test]
    fn schema_lists_every_column_once() {
        let cols: Vec<&str> = Dataset::columns().collect();
        assert_eq!(cols.len(), 16);
        assert!(cols.contains(&"Product line"));
        assert!(cols.contains(&"gross income"));
        assert!(cols.contains(&"Date"));
    }

    #[test]
    fn record_order_is_preserved() {
        let ds = Dataset::from_records(vec![
            record(date(2019, 2, 1), "B", "Sports and travel", 10.0),
            record(date(2019, 1, 1), "A", "Health and beauty", 20.0),
        ]);
        assert_eq!(ds.records()[0].branch, "B");
        assert_eq!(ds.records()[1].branch, "A");
    }
}
