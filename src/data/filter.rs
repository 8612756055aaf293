use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CategoryColumn, Dataset, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum InvalidFilterError {
    #[error("invalid date range: {min} is after {max}")]
    ReversedRange { min: NaiveDate, max: NaiveDate },
}

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// An inclusive date interval, closed on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    min: NaiveDate,
    max: NaiveDate,
}

impl DateRange {
    /// Well-ordered bounds are checked here so a reversed range never reaches
    /// the filter engine.
    pub fn new(min: NaiveDate, max: NaiveDate) -> Result<Self, InvalidFilterError> {
        if min > max {
            return Err(InvalidFilterError::ReversedRange { min, max });
        }
        Ok(DateRange { min, max })
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }
}

/// Declarative filter state: which values are admitted per column.
///
/// Semantics per column:
/// * column absent from `categories` → no restriction
/// * non-empty set → record passes iff its value is in the set
/// * **empty set → excludes every record.** The "nothing selected means show
///   all" convention some UIs want is a presentation-layer policy; the engine
///   keeps the literal contract. The sidebar instead seeds every column with
///   its full domain (see [`init_filter_spec`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive date window; `None` admits every date.
    pub date_range: Option<DateRange>,
    /// Per-column selected values.
    pub categories: BTreeMap<CategoryColumn, BTreeSet<String>>,
}

impl FilterSpec {
    /// A specification with no restrictions at all.
    pub fn unrestricted() -> Self {
        FilterSpec::default()
    }

    /// Selected values for a column, creating an empty entry on demand.
    pub fn selection_mut(&mut self, column: CategoryColumn) -> &mut BTreeSet<String> {
        self.categories.entry(column).or_default()
    }

    /// Whether a single record satisfies every predicate (logical AND).
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(record.date) {
                return false;
            }
        }
        for (column, selected) in &self.categories {
            if !selected.contains(column.value(record)) {
                return false;
            }
        }
        true
    }
}

/// Initialise a [`FilterSpec`] with everything selected: the observed date
/// bounds and the full domain of every categorical column. This is the UI
/// default state ("no exclusions yet").
pub fn init_filter_spec(dataset: &Dataset) -> FilterSpec {
    let date_range = dataset
        .date_bounds()
        .map(|(min, max)| DateRange { min, max });
    let categories = CategoryColumn::ALL
        .iter()
        .map(|col| (*col, dataset.domain(*col).clone()))
        .collect();
    FilterSpec {
        date_range,
        categories,
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Indices of records that pass all predicates, in store order.
pub fn filtered_indices(dataset: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Apply a filter specification to the store, producing a read-only view.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let indices = filtered_indices(dataset, spec);
    FilteredView { dataset, indices }
}

/// A read-only projection of the store: the records passing a filter pass,
/// in original store order. Borrowing keeps the store shareable between
/// sessions; the view owns only its index list.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Rebuild a view from cached indices (the UI keeps indices per frame).
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        FilteredView {
            dataset,
            indices: indices.to_vec(),
        }
    }

    /// The underlying store. Dense aggregates read the full observed domains
    /// from here even when the view itself is empty.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Records in the view, preserving store order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.indices.iter().map(move |&i| &self.dataset.records()[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{month_name, CustomerType, Gender, Payment, Record};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, branch: &str, product: &str, total: f64) -> Record {
        Record {
            date: d,
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
            month: month_name(d),
        }
    }

    /// §8 scenario store: two January days, branches A and B.
    fn store() -> Dataset {
        Dataset::from_records(vec![
            record(date(2019, 1, 5), "A", "Health and beauty", 100.0),
            record(date(2019, 1, 5), "B", "Food and beverages", 50.0),
            record(date(2019, 1, 6), "A", "Health and beauty", 30.0),
        ])
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let err = DateRange::new(date(2019, 1, 6), date(2019, 1, 5)).unwrap_err();
        assert!(matches!(err, InvalidFilterError::ReversedRange { .. }));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let range = DateRange::new(date(2019, 1, 5), date(2019, 1, 6)).unwrap();
        assert!(range.contains(date(2019, 1, 5)));
        assert!(range.contains(date(2019, 1, 6)));
        assert!(!range.contains(date(2019, 1, 7)));
    }

    #[test]
    fn date_and_branch_predicates_combine_with_and() {
        let ds = store();
        let mut spec = FilterSpec::unrestricted();
        spec.date_range = Some(DateRange::new(date(2019, 1, 5), date(2019, 1, 5)).unwrap());
        spec.selection_mut(CategoryColumn::Branch)
            .insert("A".to_string());

        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 1);
        let rec = view.records().next().unwrap();
        assert_eq!(rec.total, 100.0);
        assert_eq!(rec.branch, "A");
    }

    #[test]
    fn absent_column_means_no_restriction() {
        let ds = store();
        let view = apply(&ds, &FilterSpec::unrestricted());
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn empty_selection_excludes_everything() {
        let ds = store();
        let mut spec = FilterSpec::unrestricted();
        spec.selection_mut(CategoryColumn::Gender); // empty set

        // Other predicates admitting everything do not rescue it.
        spec.selection_mut(CategoryColumn::Branch)
            .extend(["A".to_string(), "B".to_string()]);

        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn filtering_preserves_store_order() {
        let ds = store();
        let mut spec = FilterSpec::unrestricted();
        spec.selection_mut(CategoryColumn::Branch)
            .insert("A".to_string());

        let view = apply(&ds, &spec);
        assert_eq!(view.indices(), &[0, 2]);
        let totals: Vec<f64> = view.records().map(|r| r.total).collect();
        assert_eq!(totals, [100.0, 30.0]);
    }

    #[test]
    fn apply_is_idempotent() {
        let ds = store();
        let mut spec = FilterSpec::unrestricted();
        spec.date_range = Some(DateRange::new(date(2019, 1, 5), date(2019, 1, 5)).unwrap());
        spec.selection_mut(CategoryColumn::ProductLine)
            .insert("Health and beauty".to_string());

        let once = apply(&ds, &spec);
        let narrowed = Dataset::from_records(once.records().cloned().collect());
        let twice = apply(&narrowed, &spec);

        let a: Vec<&Record> = once.records().collect();
        let b: Vec<&Record> = twice.records().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn init_filter_spec_selects_full_domains_and_bounds() {
        let ds = store();
        let spec = init_filter_spec(&ds);

        let range = spec.date_range.unwrap();
        assert_eq!(range.min(), date(2019, 1, 5));
        assert_eq!(range.max(), date(2019, 1, 6));
        assert_eq!(spec.categories[&CategoryColumn::Branch].len(), 2);

        // The default spec admits every record.
        assert_eq!(apply(&ds, &spec).len(), 3);
    }

    #[test]
    fn month_filter_uses_the_materialized_column() {
        let ds = Dataset::from_records(vec![
            record(date(2019, 1, 5), "A", "Health and beauty", 100.0),
            record(date(2019, 2, 5), "A", "Health and beauty", 40.0),
        ]);

        let mut spec = FilterSpec::unrestricted();
        spec.selection_mut(CategoryColumn::Month)
            .insert("February".to_string());
        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records().next().unwrap().total, 40.0);
    }
}
