use eframe::egui::{self, RichText, Ui};

use crate::state::AppState;
use crate::ui::table::{format_score, records_table};

/// Headline figures over the whole dataset.
pub fn overview(ui: &mut Ui, state: &AppState) {
    let ov = &state.overview;
    ui.heading("Dashboard Overview");
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total universities", ov.total.to_string());
        metric(ui, "Global average score", format_score(ov.mean_overall));
        metric(
            ui,
            "Top performing institution",
            ov.top_institution.clone().unwrap_or_else(|| "N/A".into()),
        );
    });
}

/// Statistics of the current filtered selection.
pub fn filtered_summary(ui: &mut Ui, state: &AppState) {
    let s = &state.summary;
    ui.heading(format!("{} Universities Match Your Criteria", s.count));
    if s.count == 0 {
        ui.label("No match found. Try broader regions, all sizes, both institution types or an empty search.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Peak score", format_score(s.max));
        metric(ui, "Average score", format_score(s.mean));
        metric(ui, "Minimum score", format_score(s.min));
    });
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "World-class (95+)", s.tiers.excellent.to_string());
        metric(ui, "Excellent (85-95)", s.tiers.good.to_string());
        metric(ui, "Strong (<85)", s.tiers.average.to_string());
        if s.unscored > 0 {
            metric(ui, "Unscored", s.unscored.to_string());
        }
    });

    egui::CollapsingHeader::new(RichText::new("Filtered universities").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| records_table(ui, "filtered_table", &state.filtered));
}

/// Threshold slider over the unfiltered dataset.
pub fn elite_explorer(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dynamic Performance Analysis");
    let mut threshold = state.elite_threshold;
    ui.add(egui::Slider::new(&mut threshold, 80.0..=100.0).text("Minimum overall score"));
    if threshold != state.elite_threshold {
        state.set_elite_threshold(threshold);
    }

    if state.elite.is_empty() {
        ui.label(format!("No universities found with scores above {threshold:.0} points."));
        return;
    }
    ui.label(format!(
        "{} universities exceed the {threshold:.0}-point threshold",
        state.elite.len()
    ));
    records_table(ui, "elite_table", &state.elite);
}

fn metric(ui: &mut Ui, title: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.small(title);
            ui.label(RichText::new(value).strong().size(16.0));
        });
    });
}
