use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::truncate_title;

use super::super::focus::InputEvent;
use super::super::render_utils::{
    circle_visible, edge_visible, node_radius, screen_to_world, world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};
use super::TooltipVisual;

const BACKGROUND: Color32 = Color32::from_rgb(11, 15, 25);
const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(120, 120, 120, 153);
const LABEL_COLOR: Color32 = Color32::from_gray(225);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<HashSet<usize>> {
        if self.view.focus.focus_mode() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(cached.matches.clone());
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .view
            .data
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.title, query).map(|_score| index)
            })
            .collect::<HashSet<_>>();

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: matches.clone(),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        if self.view.data.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No papers with keywords to plot",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            return;
        }

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let mut moving = false;
        if self.physics_running {
            moving = self.view.step();
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let screen_positions = self
            .view
            .sim
            .nodes
            .iter()
            .map(|particle| world_to_screen(rect, pan, zoom, particle.pos))
            .collect::<Vec<_>>();
        let screen_radii = self
            .view
            .data
            .nodes
            .iter()
            .map(|node| (node_radius(node.keyword_count) * zoom).clamp(1.5, 60.0))
            .collect::<Vec<_>>();

        let visible_set = self.view.focus.visible_set(&self.view.neighbors);
        let hovered = Self::hovered_index(
            ui,
            rect,
            &screen_positions,
            &screen_radii,
            visible_set.as_ref(),
        );

        if hovered != self.view.focus.hovered() {
            self.view.focus.handle(InputEvent::PointerLeave);
            if let Some(index) = hovered {
                self.view.focus.handle(InputEvent::PointerEnter(index));
            }
        }
        if hovered.is_some() {
            if let Some(pointer) = ui.input(|input| input.pointer.hover_pos()) {
                self.view.focus.handle(InputEvent::PointerMove(pointer));
            }
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.dragging = Some(index);
            self.view
                .sim
                .drag_start(index, screen_to_world(rect, pan, zoom, pointer));
        }
        if let Some(index) = self.dragging {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                self.view
                    .sim
                    .drag_move(index, screen_to_world(rect, pan, zoom, pointer));
            }
            if response.drag_stopped_by(egui::PointerButton::Primary) {
                self.view.sim.drag_end(index);
                self.dragging = None;
            }
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let event = match hovered {
                Some(index) => InputEvent::ClickNode(index),
                None => InputEvent::ClickBackground,
            };
            self.view.focus.handle(event);
        }
        if ui.input(|input| input.key_pressed(egui::Key::Escape)) {
            self.view.focus.handle(InputEvent::Cancel);
        }

        if moving || self.dragging.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }

        let matches = self.cached_search_matches();
        let scene = self.view.scene(matches.as_ref());

        let mut visible_edge_count = 0usize;
        for link in &scene.links {
            if !link.visible {
                continue;
            }
            let start = world_to_screen(rect, pan, zoom, link.source);
            let end = world_to_screen(rect, pan, zoom, link.target);
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let width = (link.width * zoom).clamp(0.3, 8.0);
            painter.line_segment([start, end], Stroke::new(width, LINK_COLOR));
            visible_edge_count += 1;
        }

        let focus_mode = self.view.focus.focus_mode();
        let mut visible_node_count = 0usize;
        for (index, node) in scene.nodes.iter().enumerate() {
            if !node.visible {
                continue;
            }
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }
            visible_node_count += 1;

            painter.circle_filled(position, radius, node.fill);
            painter.circle_stroke(position, radius, node.stroke);

            let should_label =
                focus_mode || hovered == Some(index) || zoom > 1.0 || radius > 14.0;
            if should_label && !node.label.is_empty() {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.label,
                    FontId::proportional(10.0),
                    LABEL_COLOR,
                );
            }
        }
        self.visible_node_count = visible_node_count;
        self.visible_edge_count = visible_edge_count;

        if focus_mode {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                "Focus mode: Esc or a background click exits",
                FontId::proportional(13.0),
                Color32::from_gray(235),
            );
        }

        if let Some(tooltip) = &scene.tooltip {
            draw_tooltip(&painter, rect, tooltip);
        }
    }
}

fn draw_tooltip(painter: &Painter, rect: Rect, tooltip: &TooltipVisual) {
    let title = painter.layout_no_wrap(
        truncate_title(&tooltip.title, 60),
        FontId::proportional(13.0),
        Color32::from_gray(245),
    );
    let pmc = painter.layout_no_wrap(
        format!("PMC ID: {}", tooltip.pmc_id),
        FontId::proportional(11.0),
        Color32::from_gray(200),
    );
    let keywords = painter.layout_no_wrap(
        truncate_title(&format!("Keywords: {}", tooltip.keywords.join(", ")), 72),
        FontId::proportional(11.0),
        Color32::from_gray(200),
    );

    let width = title.size().x.max(pmc.size().x).max(keywords.size().x) + 16.0;
    let height = title.size().y + pmc.size().y + keywords.size().y + 14.0;

    let mut anchor = tooltip.anchor;
    anchor.x = anchor.x.clamp(rect.left() + 2.0, (rect.right() - width).max(rect.left() + 2.0));
    anchor.y = anchor.y.clamp(rect.top() + 2.0, (rect.bottom() - height).max(rect.top() + 2.0));

    painter.rect_filled(
        Rect::from_min_size(anchor, vec2(width, height)),
        4.0,
        Color32::from_rgba_unmultiplied(24, 30, 42, 240),
    );

    let mut cursor = anchor + vec2(8.0, 5.0);
    painter.galley(cursor, title.clone(), Color32::from_gray(245));
    cursor.y += title.size().y + 2.0;
    painter.galley(cursor, pmc.clone(), Color32::from_gray(200));
    cursor.y += pmc.size().y + 2.0;
    painter.galley(cursor, keywords, Color32::from_gray(200));
}
