use std::path::Path;

use eframe::egui::{self, Context, RichText, Vec2};

use crate::paper::GraphData;

use super::ViewModel;
use super::graph::GraphView;

mod details;

impl ViewModel {
    pub(super) fn new(data: GraphData) -> Self {
        Self {
            view: GraphView::new(data),
            search: String::new(),
            search_match_cache: None,
            pan: Vec2::ZERO,
            zoom: 0.5,
            physics_running: true,
            dragging: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(super) fn show(
        &mut self,
        ctx: &Context,
        papers_path: &Path,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("paper-orbit");
                ui.separator();
                ui.label(format!(
                    "{} papers, {} links",
                    self.view.data.node_count(),
                    self.view.data.link_count()
                ));
                ui.separator();
                ui.label(format!(
                    "drawn: {} / {}",
                    self.visible_node_count, self.visible_edge_count
                ));
                ui.separator();
                ui.label(
                    RichText::new(papers_path.display().to_string())
                        .small()
                        .weak(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if is_reloading {
                        ui.spinner();
                        ui.label("Reloading...");
                    } else if ui.button("Reload").clicked() {
                        *reload_requested = true;
                    }
                    if self.view.focus.focus_mode() {
                        ui.label(RichText::new("focus mode").strong());
                    }
                });
            });
        });

        egui::SidePanel::left("controls")
            .default_width(230.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.label("Search titles");
        let response = ui.text_edit_singleline(&mut self.search);
        if response.changed() {
            self.search_match_cache = None;
        }
        if !self.search.trim().is_empty() && ui.small_button("Clear").clicked() {
            self.search.clear();
            self.search_match_cache = None;
        }

        ui.separator();
        ui.checkbox(&mut self.physics_running, "Run physics");
        if ui.button("Reheat layout").clicked() {
            self.view.sim.reheat();
        }
        ui.label(
            RichText::new(format!("energy: {:.3}", self.view.sim.alpha()))
                .small()
                .weak(),
        );

        ui.separator();
        ui.label("Forces");
        ui.add(
            egui::Slider::new(&mut self.view.sim.repulsion_scale, 0.25..=4.0).text("repulsion"),
        );
        ui.add(egui::Slider::new(&mut self.view.sim.link_scale, 0.25..=4.0).text("link pull"));
        ui.add(
            egui::Slider::new(&mut self.view.sim.velocity_decay, 0.05..=0.9).text("friction"),
        );

        ui.separator();
        ui.label(
            RichText::new(
                "Left-drag moves a node, click focuses it.\n\
                 Right-drag pans, scroll zooms.\n\
                 Esc or a background click exits focus.",
            )
            .small()
            .weak(),
        );
    }
}
