use std::ops::RangeInclusive;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::data::aggregate::Aggregates;
use crate::data::model::ResaleDataset;
use crate::state::AppState;

/// Rows shown in the matching-transactions preview.
const PREVIEW_ROWS: usize = 20;

const CHART_HEIGHT: f32 = 260.0;
const ACCENT: Color32 = Color32::LIGHT_BLUE;

// ---------------------------------------------------------------------------
// Central panel – metrics, preview table, charts
// ---------------------------------------------------------------------------

/// Render the central dashboard panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a resale dataset to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            metric_row(ui, &state.aggregates);
            ui.separator();

            preview_table(ui, dataset, &state.visible_indices);
            ui.separator();

            ui.columns(2, |cols| {
                avg_price_chart(&mut cols[0], state);
                flat_type_chart(&mut cols[1], &state.aggregates);
            });
            ui.separator();

            monthly_trend_chart(ui, &state.aggregates);
        });
}

// ---------------------------------------------------------------------------
// Key metrics
// ---------------------------------------------------------------------------

fn metric_row(ui: &mut Ui, aggregates: &Aggregates) {
    ui.columns(4, |cols| {
        metric(
            &mut cols[0],
            "Transactions",
            group_thousands(aggregates.transactions as i64),
        );
        metric(
            &mut cols[1],
            "Average price",
            format_price(aggregates.average_price),
        );
        metric(
            &mut cols[2],
            "Median price",
            format_price(aggregates.median_price),
        );
        metric(
            &mut cols[3],
            "Median floor area",
            format_area(aggregates.median_floor_area),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).heading());
    });
}

/// `$1,234,567`, or a placeholder on an empty view.
fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(v.round() as i64)),
        None => "N/A".to_string(),
    }
}

fn format_area(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1} sqm"),
        None => "N/A".to_string(),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    let joined = groups.join(",");
    if n < 0 {
        format!("-{joined}")
    } else {
        joined
    }
}

// ---------------------------------------------------------------------------
// Preview table
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, dataset: &ResaleDataset, indices: &[usize]) {
    ui.strong(format!("Matching transactions (first {PREVIEW_ROWS})"));
    if indices.is_empty() {
        ui.weak("no matching transactions");
        return;
    }

    ScrollArea::horizontal()
        .id_salt("preview_table_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("preview_table")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for header in ["month", "town", "flat_type", "resale_price", "floor_area_sqm"]
                    {
                        ui.strong(header);
                    }
                    for column in &dataset.extra_columns {
                        ui.strong(column);
                    }
                    ui.end_row();

                    for &i in indices.iter().take(PREVIEW_ROWS) {
                        let tx = &dataset.rows[i];
                        ui.label(tx.month.format("%Y-%m").to_string());
                        ui.label(&tx.town);
                        ui.label(&tx.flat_type);
                        ui.label(format!("{:.0}", tx.resale_price));
                        ui.label(format!("{:.1}", tx.floor_area_sqm));
                        for column in &dataset.extra_columns {
                            ui.label(tx.extra.get(column).map(String::as_str).unwrap_or(""));
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Top towns by mean resale price, one coloured bar per town.
fn avg_price_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Average resale price by town");
    let table = &state.aggregates.avg_price_by_town;
    if table.is_empty() {
        ui.weak("no data");
        return;
    }

    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, (town, avg))| {
            Bar::new(i as f64, *avg)
                .name(town)
                .fill(state.town_colors.color_for(town))
                .width(0.6)
        })
        .collect();
    let names: Vec<String> = table.iter().map(|(town, _)| town.clone()).collect();

    Plot::new("avg_price_by_town")
        .height(CHART_HEIGHT)
        .y_axis_label("average price (S$)")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_tick(&names, mark.value)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Transaction counts per flat type.
fn flat_type_chart(ui: &mut Ui, aggregates: &Aggregates) {
    ui.strong("Transactions by flat type");
    let table = &aggregates.tx_by_flat_type;
    if table.is_empty() {
        ui.weak("no data");
        return;
    }

    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, (flat_type, count))| {
            Bar::new(i as f64, *count as f64)
                .name(flat_type)
                .fill(ACCENT)
                .width(0.6)
        })
        .collect();
    let names: Vec<String> = table.iter().map(|(flat_type, _)| flat_type.clone()).collect();

    Plot::new("tx_by_flat_type")
        .height(CHART_HEIGHT)
        .y_axis_label("transactions")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_tick(&names, mark.value)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Median resale price over time, with a marker per month.
fn monthly_trend_chart(ui: &mut Ui, aggregates: &Aggregates) {
    ui.strong("Monthly median resale price");
    let series = &aggregates.median_price_by_month;
    if series.is_empty() {
        ui.weak("no data");
        return;
    }

    let coords: Vec<[f64; 2]> = series
        .iter()
        .map(|(month, median)| [days_since_epoch(*month) as f64, *median])
        .collect();
    let line = Line::new(PlotPoints::from(coords.clone()))
        .color(ACCENT)
        .width(2.0);
    let markers = Points::new(PlotPoints::from(coords)).color(ACCENT).radius(2.5);

    Plot::new("median_price_by_month")
        .height(CHART_HEIGHT)
        .x_axis_label("month")
        .y_axis_label("median price (S$)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            match date_from_days(mark.value) {
                Some(date) => date.format("%Y-%m").to_string(),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(line);
            plot_ui.points(markers);
        });
}

/// Label integer positions with their category name, everything else blank.
fn category_tick(names: &[String], value: f64) -> String {
    let i = value.round();
    if (value - i).abs() > 0.01 || i < 0.0 {
        return String::new();
    }
    names.get(i as usize).cloned().unwrap_or_default()
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    (date - NaiveDate::default()).num_days()
}

fn date_from_days(value: f64) -> Option<NaiveDate> {
    let delta = chrono::Duration::try_days(value.round() as i64)?;
    NaiveDate::default().checked_add_signed(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(420_000), "420,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn empty_view_renders_placeholders() {
        assert_eq!(format_price(None), "N/A");
        assert_eq!(format_area(None), "N/A");
        assert_eq!(format_price(Some(419_999.6)), "$420,000");
        assert_eq!(format_area(Some(92.34)), "92.3 sqm");
    }

    #[test]
    fn category_ticks_label_only_integer_positions() {
        let names = vec!["BEDOK".to_string(), "CLEMENTI".to_string()];
        assert_eq!(category_tick(&names, 0.0), "BEDOK");
        assert_eq!(category_tick(&names, 1.002), "CLEMENTI");
        assert_eq!(category_tick(&names, 0.5), "");
        assert_eq!(category_tick(&names, 5.0), "");
        assert_eq!(category_tick(&names, -1.0), "");
    }

    #[test]
    fn epoch_day_round_trip() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(date_from_days(days_since_epoch(date) as f64), Some(date));
    }
}
