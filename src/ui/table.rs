use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use rankings_explorer::data::model::{Record, ScoreField};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Record table
// ---------------------------------------------------------------------------

/// Scrollable table of records with the identity fields and headline scores.
pub fn records_table(ui: &mut Ui, id: &str, records: &[Record]) {
    let scores = [ScoreField::Overall, ScoreField::Ar, ScoreField::Er, ScoreField::Eo];

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(260.0)
            .column(Column::auto().at_least(220.0).clip(true))
            .columns(Column::auto().at_least(80.0), 4)
            .columns(Column::auto().at_least(60.0), scores.len())
            .header(20.0, |mut header| {
                for title in ["Institution", "Country/Territory", "Region", "Size", "Status"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
                for field in scores {
                    header.col(|ui| {
                        ui.strong(field.column().trim_end_matches(" SCORE"));
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    let rec = &records[row.index()];
                    for text in [&rec.name, &rec.country, &rec.region, &rec.size, &rec.status] {
                        row.col(|ui| {
                            ui.label(text.as_deref().unwrap_or("–"));
                        });
                    }
                    for field in scores {
                        row.col(|ui| {
                            ui.label(format_score(rec.score(field)));
                        });
                    }
                });
            });
    });
}

pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "–".to_string(), |s| format!("{s:.1}"))
}
