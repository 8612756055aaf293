use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateRange;
use crate::data::model::CategoryColumn;
use crate::state::{AppState, Section};

// ---------------------------------------------------------------------------
// Left side panel – sections + filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: section selector and segmentation filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sections");
    for section in Section::ALL {
        ui.selectable_value(&mut state.section, section, section.label());
    }
    ui.separator();

    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let domains: Vec<(CategoryColumn, std::collections::BTreeSet<String>)> = CategoryColumn::ALL
        .iter()
        .map(|col| (*col, dataset.domain(*col).clone()))
        .collect();
    let date_bounds = dataset.date_bounds();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range pickers ----
            if let (Some((lo, hi)), Some(range)) = (date_bounds, state.filters.date_range) {
                ui.strong("Date range");
                let mut min = range.min();
                let mut max = range.max();
                let mut changed = false;

                ui.horizontal(|ui: &mut Ui| {
                    ui.label("from");
                    changed |= ui
                        .add(DatePickerButton::new(&mut min).id_salt("date_min"))
                        .changed();
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("to");
                    changed |= ui
                        .add(DatePickerButton::new(&mut max).id_salt("date_max"))
                        .changed();
                });

                if changed {
                    min = min.clamp(lo, hi);
                    max = max.clamp(lo, hi);
                    match DateRange::new(min, max) {
                        Ok(range) => {
                            state.filters.date_range = Some(range);
                            state.status_message = None;
                        }
                        Err(e) => state.status_message = Some(e.to_string()),
                    }
                    state.refilter();
                }
                ui.separator();
            }

            // ---- Per-column filter widgets (collapsible) ----
            for (col, all_values) in &domains {
                let selected = state.filters.selection_mut(*col);

                // Show count of selected / total in the header
                let header_text =
                    format!("{}  ({}/{})", col.label(), selected.len(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.label())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(*col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(*col);
                            }
                        });

                        // Re-borrow after potential mutation from All/None
                        let selected = state.filters.selection_mut(*col);
                        let mut dirty = false;

                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val).changed() {
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                                dirty = true;
                            }
                        }
                        if dirty {
                            state.refilter();
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} transactions loaded, {} in view",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        let result = crate::data::loader::load_csv(&path)
            .with_context(|| format!("loading {}", path.display()));
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} transactions spanning {:?}",
                    dataset.len(),
                    dataset.date_bounds()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
