use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, init_filter_spec, FilterSpec, FilteredView};
use crate::data::model::{CategoryColumn, Dataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Dashboard sections, mirrored in the sidebar radio group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Overview,
    Customers,
    Branches,
    Correlations,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Customers,
        Section::Branches,
        Section::Correlations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Customers => "Customers",
            Section::Branches => "Branches & Payments",
            Section::Correlations => "Correlations",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<Dataset>,

    /// Current filter selections. The sidebar seeds every column with its
    /// full domain, so "nothing unchecked" shows everything; the engine
    /// itself treats an empty set as "exclude all".
    pub filters: FilterSpec,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Which dashboard section is shown in the central panel.
    pub section: Section,

    /// Stable colours for product-line chart segments.
    pub product_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    /// Ingest a newly loaded dataset and initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = init_filter_spec(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.product_colors = Some(ColorMap::new(dataset.domain(CategoryColumn::ProductLine)));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` after a filter change. One synchronous
    /// pass per interaction; no incremental diffing.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
    }

    /// The current filtered view, rebuilt from the cached indices.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, &self.visible_indices))
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: CategoryColumn, value: &str) {
        let selected = self.filters.selection_mut(column);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values of a column.
    pub fn select_all(&mut self, column: CategoryColumn) {
        if let Some(ds) = &self.dataset {
            let all = ds.domain(column).clone();
            self.filters.categories.insert(column, all);
            self.refilter();
        }
    }

    /// Deselect all values of a column (hides every record).
    pub fn select_none(&mut self, column: CategoryColumn) {
        self.filters.selection_mut(column).clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    const SAMPLE: &str = "\
Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total,Date,Time,Payment,cogs,gross income,Rating
A,Yangon,Member,Female,Health and beauty,74.69,7,26.14,548.97,1/5/2019,13:08,Ewallet,522.83,26.14,9.1
B,Mandalay,Normal,Male,Food and beverages,15.28,5,3.82,80.22,1/6/2019,10:29,Cash,76.4,3.82,9.6";

    #[test]
    fn set_dataset_seeds_full_selection() {
        let ds = load_reader(SAMPLE.as_bytes()).unwrap();
        let mut state = AppState::default();
        state.set_dataset(ds);

        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.view().unwrap().len(), 2);
    }

    #[test]
    fn toggling_a_value_off_narrows_the_view() {
        let ds = load_reader(SAMPLE.as_bytes()).unwrap();
        let mut state = AppState::default();
        state.set_dataset(ds);

        state.toggle_filter_value(CategoryColumn::Branch, "B");
        assert_eq!(state.visible_indices, vec![0]);

        state.toggle_filter_value(CategoryColumn::Branch, "B");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn select_none_hides_everything_and_select_all_restores() {
        let ds = load_reader(SAMPLE.as_bytes()).unwrap();
        let mut state = AppState::default();
        state.set_dataset(ds);

        state.select_none(CategoryColumn::Gender);
        assert!(state.visible_indices.is_empty());

        state.select_all(CategoryColumn::Gender);
        assert_eq!(state.visible_indices.len(), 2);
    }
}
