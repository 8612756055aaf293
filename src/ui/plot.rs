use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::data::aggregate;
use crate::data::filter::FilteredView;
use crate::data::model::NumericColumn;
use crate::state::{AppState, Section};

/// Numeric columns shown in the correlation heat grid, in display order.
const CORRELATION_COLUMNS: [NumericColumn; 7] = NumericColumn::ALL;

// ---------------------------------------------------------------------------
// Central panel dispatch
// ---------------------------------------------------------------------------

/// Render the active dashboard section in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales CSV to explore it  (File → Open…)");
        });
        return;
    };

    metrics_row(ui, &view);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.section {
            Section::Overview => overview(ui, &view),
            Section::Customers => customers(ui, &view),
            Section::Branches => branches(ui, state, &view),
            Section::Correlations => correlations(ui, &view),
        });
}

/// Headline metrics shown above every section.
fn metrics_row(ui: &mut Ui, view: &FilteredView) {
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total sales", format!("${:.2}", aggregate::total_sum(view)));
        metric(
            ui,
            "Gross income",
            format!("${:.2}", aggregate::gross_income_sum(view)),
        );
        metric(
            ui,
            "Transactions",
            aggregate::transaction_count(view).to_string(),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(label);
            ui.strong(RichText::new(value).size(18.0));
        });
    });
}

// ---------------------------------------------------------------------------
// Section 1: Overview
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, view: &FilteredView) {
    ui.heading("Daily sales totals");
    let series = aggregate::daily_totals(view);
    let labels: Vec<String> = series.iter().map(|(d, _)| d.to_string()).collect();
    let points: PlotPoints = series
        .iter()
        .enumerate()
        .map(|(i, (_, total))| [i as f64, *total])
        .collect();

    Plot::new("daily_totals")
        .height(260.0)
        .y_axis_label("Total")
        .x_axis_formatter(move |mark, _range| {
            labels
                .get(mark.value.round() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::LIGHT_BLUE).width(2.0));
        });

    ui.add_space(12.0);
    ui.heading("Sales by product line");
    let rows = aggregate::by_product_line(view);
    let labels: Vec<String> = rows.iter().map(|(name, _)| name.clone()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (name, sum))| Bar::new(i as f64, *sum).name(name).width(0.7))
        .collect();

    Plot::new("by_product_line")
        .height(260.0)
        .x_axis_formatter(move |mark, _range| {
            labels
                .get(mark.value.round() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(70, 130, 180)));
        });
}

// ---------------------------------------------------------------------------
// Section 2: Customers
// ---------------------------------------------------------------------------

fn customers(ui: &mut Ui, view: &FilteredView) {
    ui.heading("Customer rating distribution");
    rating_histogram(ui, view);

    ui.add_space(12.0);
    ui.heading("Spend by customer type");
    let stats = aggregate::describe_by_customer_type(view);
    if stats.is_empty() {
        ui.label("No transactions in the current selection.");
        return;
    }

    egui::Grid::new("describe_table")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for header in [
                "Customer type",
                "Count",
                "Mean",
                "Median",
                "Std dev",
                "Min",
                "Q1",
                "Q3",
                "Max",
            ] {
                ui.strong(header);
            }
            ui.end_row();

            for (group, d) in &stats {
                ui.label(group);
                ui.label(d.count.to_string());
                ui.label(format!("{:.2}", d.mean));
                ui.label(format!("{:.2}", d.median));
                match d.std {
                    Some(std) => ui.label(format!("{std:.2}")),
                    None => ui.label(RichText::new("insufficient data").italics()),
                };
                ui.label(format!("{:.2}", d.min));
                ui.label(format!("{:.2}", d.q1));
                ui.label(format!("{:.2}", d.q3));
                ui.label(format!("{:.2}", d.max));
                ui.end_row();
            }
        });
}

/// Fixed-bin histogram over the rating column. Binning is a chart concern,
/// so it lives here rather than in the aggregate catalog.
fn rating_histogram(ui: &mut Ui, view: &FilteredView) {
    const BINS: usize = 40;
    let ratings: Vec<f64> = view.records().map(|r| r.rating).collect();
    if ratings.is_empty() {
        ui.label("No transactions in the current selection.");
        return;
    }

    let min = ratings.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = ratings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let width = ((max - min) / BINS as f64).max(f64::EPSILON);

    let mut counts = [0usize; BINS];
    for r in &ratings {
        let bin = (((r - min) / width) as usize).min(BINS - 1);
        counts[bin] += 1;
    }

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Bar::new(min + (i as f64 + 0.5) * width, count as f64).width(width))
        .collect();

    Plot::new("rating_histogram")
        .height(220.0)
        .x_axis_label("Rating")
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(70, 130, 180)));
        });
}

// ---------------------------------------------------------------------------
// Section 3: Branches & Payments
// ---------------------------------------------------------------------------

fn branches(ui: &mut Ui, state: &AppState, view: &FilteredView) {
    ui.heading("Gross income by branch and product line");
    let tab = aggregate::gross_income_by_branch_and_product(view);
    let branch_labels = tab.row_keys.clone();

    // One stacked bar per branch; every product-line segment is present even
    // at zero height, which is why the cross-tab is dense.
    let mut charts: Vec<BarChart> = Vec::new();
    let mut offsets = vec![0.0f64; tab.row_keys.len()];
    for (c, product) in tab.col_keys.iter().enumerate() {
        let color = state
            .product_colors
            .as_ref()
            .map(|cm| cm.color_for(product))
            .unwrap_or(Color32::GRAY);
        let bars: Vec<Bar> = tab
            .values
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let bar = Bar::new(r as f64, row[c])
                    .name(product)
                    .base_offset(offsets[r])
                    .width(0.6)
                    .fill(color);
                offsets[r] += row[c];
                bar
            })
            .collect();
        charts.push(BarChart::new(bars).name(product).color(color));
    }

    Plot::new("branch_product_stack")
        .height(280.0)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| {
            branch_labels
                .get(mark.value.round() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    ui.add_space(12.0);
    ui.heading("Gross income by branch");
    egui::Grid::new("branch_table")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Branch");
            ui.strong("Gross income");
            ui.end_row();
            for (branch, income) in aggregate::by_branch(view) {
                ui.label(branch);
                ui.label(format!("{income:.2}"));
                ui.end_row();
            }
        });

    ui.add_space(12.0);
    ui.heading("Payment methods");
    let counts = aggregate::payment_counts(view);
    let labels: Vec<String> = counts.iter().map(|(m, _)| m.clone()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (method, count))| Bar::new(i as f64, *count as f64).name(method).width(0.6))
        .collect();

    Plot::new("payment_counts")
        .height(220.0)
        .y_axis_label("Transactions")
        .x_axis_formatter(move |mark, _range| {
            labels
                .get(mark.value.round() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(244, 167, 185)));
        });
}

// ---------------------------------------------------------------------------
// Section 4: Correlations
// ---------------------------------------------------------------------------

fn correlations(ui: &mut Ui, view: &FilteredView) {
    ui.heading("Cost of goods vs gross income");
    let points: PlotPoints = view
        .records()
        .map(|r| [r.cogs, r.gross_income])
        .collect();

    Plot::new("cogs_vs_income")
        .height(260.0)
        .x_axis_label("cogs")
        .y_axis_label("gross income")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.5)
                    .color(Color32::from_rgb(70, 130, 180)),
            );
        });

    let r_label = match aggregate::pearson(view, NumericColumn::Cogs, NumericColumn::GrossIncome) {
        Some(r) => format!("Pearson r = {r:.2}"),
        None => "Pearson r undefined (too few records or zero variance)".to_string(),
    };
    ui.label(r_label);

    ui.add_space(12.0);
    ui.heading("Numeric correlation matrix");
    let matrix = aggregate::correlation_matrix(view, &CORRELATION_COLUMNS);

    egui::Grid::new("correlation_matrix")
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in CORRELATION_COLUMNS {
                ui.strong(col.label());
            }
            ui.end_row();

            for (i, row) in matrix.iter().enumerate() {
                ui.strong(CORRELATION_COLUMNS[i].label());
                for cell in row {
                    match cell {
                        Some(r) => {
                            ui.label(RichText::new(format!("{r:.2}")).color(corr_color(*r)))
                        }
                        None => ui.label(RichText::new("–").weak()),
                    };
                }
                ui.end_row();
            }
        });
}

/// Blue for negative, red for positive, grey near zero.
fn corr_color(r: f64) -> Color32 {
    let t = (r.clamp(-1.0, 1.0) + 1.0) / 2.0;
    let red = (60.0 + 180.0 * t) as u8;
    let blue = (240.0 - 180.0 * t) as u8;
    Color32::from_rgb(red, 120, blue)
}
