use std::collections::BTreeSet;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::FilterCriteria;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= category_filter(ui, "Town", &dataset.towns, &mut state.criteria.towns);
            changed |= category_filter(
                ui,
                "Flat type",
                &dataset.flat_types,
                &mut state.criteria.flat_types,
            );
            ui.separator();

            changed |= price_controls(ui, dataset.price_bounds, &mut state.criteria.price_range);
            ui.separator();

            changed |= date_controls(ui, dataset.month_bounds, &mut state.criteria);
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.criteria = FilterCriteria::unrestricted(&dataset);
                changed = true;
            }
        });

    // Recompute the view only when a widget actually moved.
    if changed {
        state.refilter();
    }
}

/// Collapsible checkbox multiselect over one categorical column.
/// An empty selection means "no restriction".
fn category_filter(
    ui: &mut Ui,
    label: &str,
    values: &[String],
    selected: &mut BTreeSet<String>,
) -> bool {
    let mut changed = false;

    let header_text = format!("{label}  ({}/{})", selected.len(), values.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(values.iter().cloned());
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for value in values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                    changed = true;
                }
            }
        });

    changed
}

/// Min/max sliders over the inclusive resale price bound, clamped to the
/// dataset's observed extremes and kept well-formed (min ≤ max).
fn price_controls(ui: &mut Ui, bounds: (f64, f64), range: &mut (f64, f64)) -> bool {
    ui.strong("Resale price");

    let (lo_bound, hi_bound) = bounds;
    let min_changed = ui
        .add(
            egui::Slider::new(&mut range.0, lo_bound..=hi_bound)
                .text("min")
                .step_by(10_000.0)
                .integer(),
        )
        .changed();
    if min_changed {
        range.1 = range.1.max(range.0);
    }

    let max_changed = ui
        .add(
            egui::Slider::new(&mut range.1, lo_bound..=hi_bound)
                .text("max")
                .step_by(10_000.0)
                .integer(),
        )
        .changed();
    if max_changed {
        range.0 = range.0.min(range.1);
    }

    min_changed || max_changed
}

/// Month-range pickers. Each endpoint can be cleared individually; the
/// filter stage only runs once both are set again.
fn date_controls(ui: &mut Ui, bounds: (NaiveDate, NaiveDate), criteria: &mut FilterCriteria) -> bool {
    ui.strong("Month range");

    let mut changed = false;
    changed |= date_endpoint(ui, "from", bounds.0, &mut criteria.date_start);
    changed |= date_endpoint(ui, "to", bounds.1, &mut criteria.date_end);

    let partial = criteria.date_bounds().is_none()
        && (criteria.date_start.is_some() || criteria.date_end.is_some());
    if partial {
        ui.label(RichText::new("month filter inactive until both endpoints are set").weak());
    }

    changed
}

fn date_endpoint(ui: &mut Ui, label: &str, default: NaiveDate, slot: &mut Option<NaiveDate>) -> bool {
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        match slot {
            Some(date) => {
                changed |= ui.add(DatePickerButton::new(date).id_salt(label)).changed();
                if ui.small_button("clear").clicked() {
                    *slot = None;
                    changed = true;
                }
            }
            None => {
                if ui.small_button("set…").clicked() {
                    *slot = Some(default);
                    changed = true;
                }
            }
        }
    });

    changed
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

        if let Some(dataset) = &state.dataset {
            ui.label(format!(
                "{} transactions loaded, {} matching",
                dataset.len(),
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
        .set_title("Open resale data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_cached(&path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} transactions from {}",
                    dataset.len(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                // Keep the current dataset; the load either fully succeeds
                // or changes nothing.
                log::error!("failed to load {}: {e:#}", path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
