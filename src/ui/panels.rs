use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use rankings_explorer::data::export::ExportFormat;
use rankings_explorer::data::model::{Focus, Size};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Any widget change triggers one refilter.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let regions = dataset.regions.clone();
    let countries = dataset.countries.clone();
    let sizes = dataset.sizes.clone();
    let focuses = dataset.focuses.clone();

    let before = state.controls.clone();
    let controls = &mut state.controls;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Search");
            ui.add(
                egui::TextEdit::singleline(&mut controls.search)
                    .hint_text("Try 'London', 'Technology', ..."),
            );
            ui.add_space(6.0);

            ui.strong("Geography");
            choice_combo(ui, "region", "All Regions", &mut controls.region, &regions, |r| r.clone());
            choice_combo(ui, "country", "All Countries", &mut controls.country, &countries, |c| {
                c.clone()
            });
            ui.add_space(6.0);

            ui.strong("Institution");
            choice_combo(ui, "size", "All Sizes", &mut controls.size, &sizes, |s: &Size| {
                s.label().to_string()
            });
            ui.checkbox(&mut controls.include_private, "Include private universities");
            ui.checkbox(&mut controls.include_public, "Include public universities");
            ui.add_space(6.0);

            ui.checkbox(&mut controls.advanced, RichText::new("Advanced filters").strong());
            if controls.advanced {
                ui.add(
                    egui::Slider::new(&mut controls.min_ar_score, 0.0..=100.0)
                        .text("Min. academic reputation"),
                );
                choice_combo(ui, "focus", "All Focus Areas", &mut controls.focus, &focuses, |f: &Focus| {
                    f.label().to_string()
                });
            }
            ui.add_space(10.0);

            if ui.button("Reset to default").clicked() {
                *controls = Default::default();
            }
        });

    if state.controls != before {
        state.refilter();
    }
}

/// A "no constraint" entry followed by one entry per option.
fn choice_combo<T: Clone + PartialEq>(
    ui: &mut Ui,
    id: &str,
    all_label: &str,
    current: &mut Option<T>,
    options: &[T],
    label: impl Fn(&T) -> String,
) {
    let selected_text = current.as_ref().map_or_else(|| all_label.to_string(), &label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .width(190.0)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(current, None, all_label);
            for opt in options {
                ui.selectable_value(current, Some(opt.clone()), label(opt));
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
            ui.add_enabled_ui(state.dataset.is_some(), |ui: &mut Ui| {
                ui.menu_button("Export filtered", |ui: &mut Ui| {
                    for format in ExportFormat::ALL {
                        if ui.button(format.label()).clicked() {
                            state.export_format = format;
                            save_file_dialog(state);
                            ui.close_menu();
                        }
                    }
                });
            });
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} universities loaded, {} match",
                ds.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open rankings data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn save_file_dialog(state: &mut AppState) {
    let ext = state.export_format.extension();
    let file = rfd::FileDialog::new()
        .set_title("Export filtered universities")
        .set_file_name(format!("filtered_universities.{ext}"))
        .add_filter(state.export_format.label(), &[ext])
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
