use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RankingsExplorerApp {
    pub state: AppState,
}

impl RankingsExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RankingsExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: statistics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a rankings file to start  (File → Open…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    summary::overview(ui, &self.state);
                    ui.separator();
                    summary::filtered_summary(ui, &self.state);
                    ui.separator();

                    ui.heading("Global Regional Performance Analysis");
                    plot::main_chart(ui, &mut self.state);
                    ui.separator();

                    ui.heading("Elite Performers Spotlight");
                    plot::top_chart(ui, &self.state);
                    ui.separator();

                    ui.heading("Research Excellence Analysis");
                    plot::research_chart(ui, &self.state);
                    ui.separator();

                    summary::elite_explorer(ui, &mut self.state);
                });
        });
    }
}
