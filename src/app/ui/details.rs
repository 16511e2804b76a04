use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use super::super::focus::InputEvent;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.heading("Paper details");
        ui.separator();

        let Some(selected) = self.view.focus.selected() else {
            ui.label(
                RichText::new("Click a node to inspect the paper and its connections.")
                    .small()
                    .weak(),
            );
            return;
        };
        let Some(node) = self.view.data.nodes.get(selected) else {
            return;
        };

        ui.label(RichText::new(&node.title).strong());
        ui.label(RichText::new(format!("PMC ID: {}", node.pmc_id)).small());
        if !node.link.is_empty() {
            ui.hyperlink_to("View article", &node.link);
        }

        ui.add_space(6.0);
        ui.label("Keywords");
        ui.horizontal_wrapped(|ui| {
            for keyword in &node.keywords {
                ui.label(RichText::new(keyword).small().monospace());
            }
        });

        // Neighbor rows are collected before drawing so that a click can
        // mutate the focus state without borrowing the graph data.
        let mut related = self
            .view
            .link_ends
            .iter()
            .filter_map(|&(source, target, value)| {
                let other = if source == selected {
                    target
                } else if target == selected {
                    source
                } else {
                    return None;
                };
                let title = self.view.data.nodes[other].title.clone();
                Some((other, title, value))
            })
            .collect::<Vec<_>>();
        related.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));

        ui.add_space(6.0);
        ui.label(format!("Linked papers ({})", related.len()));
        let mut jump_to = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, title, value) in &related {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("{value}x")).small().weak());
                    if ui.link(title).clicked() {
                        jump_to = Some(*index);
                    }
                });
            }
        });

        if let Some(index) = jump_to {
            self.view.focus.handle(InputEvent::ClickNode(index));
        }
    }
}
