use std::collections::HashSet;

use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::{circle_visible, screen_to_world};

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 4.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    /// Canvas panning on secondary or middle drag; the primary button is
    /// reserved for node dragging and focus clicks.
    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Closest node under the pointer. Nodes hidden by focus mode are not
    /// hit-testable: they can neither be hovered nor clicked.
    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
        visible_set: Option<&HashSet<usize>>,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        (0..screen_positions.len())
            .filter(|index| visible_set.is_none_or(|visible| visible.contains(index)))
            .filter(|&index| circle_visible(rect, screen_positions[index], screen_radii[index]))
            .filter_map(|index| {
                let distance = screen_positions[index].distance(pointer);
                (distance <= screen_radii[index]).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _distance)| index)
    }
}
