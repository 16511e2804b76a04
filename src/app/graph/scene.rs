use std::collections::HashSet;

use eframe::egui::{Color32, Stroke};

use crate::util::truncate_title;

use super::super::render_utils::{blend_color, dim_color, keyword_color, link_width, node_radius};
use super::{GraphView, LinkVisual, NodeVisual, Scene, TooltipVisual};

const LABEL_MAX_CHARS: usize = 30;
const NODE_STROKE: Stroke = Stroke {
    width: 2.0,
    color: Color32::WHITE,
};
const FOCUSED_STROKE: Stroke = Stroke {
    width: 4.0,
    color: Color32::from_rgb(0xff, 0x6b, 0x6b),
};
const SEARCH_MATCH_TINT: Color32 = Color32::from_rgb(103, 196, 255);

impl GraphView {
    /// Assembles the draw instructions for the current tick: world-space
    /// node and link visuals plus an optional tooltip payload. Focus mode
    /// hides everything outside the focused 1-hop neighborhood outright;
    /// links stay visible only when incident to the focused node itself.
    pub(in crate::app) fn scene(&self, search_matches: Option<&HashSet<usize>>) -> Scene {
        let visible_set = self.focus.visible_set(&self.neighbors);
        let focused = self.focus.focused();
        let search_active = search_matches.is_some_and(|matches| !matches.is_empty());

        let nodes = self
            .data
            .nodes
            .iter()
            .zip(&self.sim.nodes)
            .enumerate()
            .map(|(index, (node, particle))| {
                let visible = visible_set
                    .as_ref()
                    .is_none_or(|visible| visible.contains(&index));

                let mut fill = keyword_color(&node.keywords);
                if search_active {
                    let is_match = search_matches.is_some_and(|matches| matches.contains(&index));
                    fill = if is_match {
                        blend_color(fill, SEARCH_MATCH_TINT, 0.68)
                    } else {
                        dim_color(fill, 0.45)
                    };
                }

                NodeVisual {
                    pos: particle.pos,
                    radius: node_radius(node.keyword_count),
                    fill,
                    stroke: if focused == Some(index) {
                        FOCUSED_STROKE
                    } else {
                        NODE_STROKE
                    },
                    visible,
                    label: truncate_title(&node.title, LABEL_MAX_CHARS),
                }
            })
            .collect();

        let links = self
            .link_ends
            .iter()
            .map(|&(source, target, value)| LinkVisual {
                source: self.sim.nodes[source].pos,
                target: self.sim.nodes[target].pos,
                width: link_width(value),
                visible: match focused {
                    Some(focused) => source == focused || target == focused,
                    None => true,
                },
            })
            .collect();

        let tooltip = self.focus.tooltip().and_then(|anchor| {
            self.data.nodes.get(anchor.node).map(|node| TooltipVisual {
                title: node.title.clone(),
                pmc_id: node.pmc_id.clone(),
                keywords: node.keywords.clone(),
                anchor: anchor.pos,
            })
        });

        Scene {
            nodes,
            links,
            tooltip,
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Pos2;

    use crate::paper::{Paper, build_graph};

    use super::super::super::focus::InputEvent;
    use super::*;

    fn paper(id: &str, title: &str, keywords: &[&str]) -> Paper {
        Paper {
            id: id.into(),
            title: title.into(),
            link: String::new(),
            pmc_id: format!("PMC{id}"),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }

    fn star_view() -> GraphView {
        // "hub" links to "a" and "b"; "lone" is isolated.
        GraphView::new(build_graph(&[
            paper("hub", "Hub paper", &["x", "y"]),
            paper("a", "Alpha paper", &["x"]),
            paper("b", "Beta paper", &["y"]),
            paper("lone", "Lone paper", &["z"]),
        ]))
    }

    #[test]
    fn unfocused_scene_shows_everything() {
        let view = star_view();
        let scene = view.scene(None);

        assert_eq!(scene.nodes.len(), 4);
        assert_eq!(scene.links.len(), 2);
        assert!(scene.nodes.iter().all(|node| node.visible));
        assert!(scene.links.iter().all(|link| link.visible));
        assert!(scene.tooltip.is_none());
    }

    #[test]
    fn focus_hides_everything_outside_the_neighborhood() {
        let mut view = star_view();
        let hub = view.index_by_id["hub"];
        let lone = view.index_by_id["lone"];
        view.focus.handle(InputEvent::ClickNode(hub));

        let scene = view.scene(None);
        assert!(scene.nodes[hub].visible);
        assert!(scene.nodes[view.index_by_id["a"]].visible);
        assert!(scene.nodes[view.index_by_id["b"]].visible);
        assert!(!scene.nodes[lone].visible);
        assert!(scene.links.iter().all(|link| link.visible));
    }

    #[test]
    fn focusing_a_leaf_hides_links_not_incident_to_it() {
        let mut view = star_view();
        let leaf = view.index_by_id["a"];
        view.focus.handle(InputEvent::ClickNode(leaf));

        let scene = view.scene(None);
        let visible_links = scene.links.iter().filter(|link| link.visible).count();
        assert_eq!(visible_links, 1);
    }

    #[test]
    fn focused_node_gets_the_distinct_outline() {
        let mut view = star_view();
        let hub = view.index_by_id["hub"];
        view.focus.handle(InputEvent::ClickNode(hub));

        let scene = view.scene(None);
        assert_eq!(scene.nodes[hub].stroke.width, 4.0);
        assert_ne!(scene.nodes[hub].stroke.color, Color32::WHITE);
        let neighbor = view.index_by_id["a"];
        assert_eq!(scene.nodes[neighbor].stroke.width, 2.0);
    }

    #[test]
    fn long_titles_are_truncated_for_labels() {
        let view = GraphView::new(build_graph(&[paper(
            "1",
            "An exceptionally verbose title that keeps going well past thirty characters",
            &["x"],
        )]));
        let scene = view.scene(None);
        assert_eq!(scene.nodes[0].label.chars().count(), LABEL_MAX_CHARS + 3);
        assert!(scene.nodes[0].label.ends_with("..."));
    }

    #[test]
    fn hover_produces_a_tooltip_with_paper_details() {
        let mut view = star_view();
        let hub = view.index_by_id["hub"];
        view.focus.handle(InputEvent::PointerEnter(hub));
        view.focus.handle(InputEvent::PointerMove(Pos2::new(200.0, 120.0)));

        let scene = view.scene(None);
        let tooltip = scene.tooltip.expect("hover tooltip");
        assert_eq!(tooltip.title, "Hub paper");
        assert_eq!(tooltip.pmc_id, "PMChub");
        assert_eq!(tooltip.keywords, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn search_matches_are_tinted_and_the_rest_dimmed() {
        let view = star_view();
        let matches = HashSet::from([view.index_by_id["a"]]);
        let scene = view.scene(Some(&matches));

        let plain = view.scene(None);
        let a = view.index_by_id["a"];
        let b = view.index_by_id["b"];
        assert_ne!(scene.nodes[a].fill, plain.nodes[a].fill);
        assert_ne!(scene.nodes[b].fill, plain.nodes[b].fill);
        assert_ne!(scene.nodes[a].fill, scene.nodes[b].fill);
    }
}
