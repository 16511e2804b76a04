use std::collections::HashMap;

use crate::paper::GraphData;

use super::super::focus::FocusState;
use super::super::sim::Simulation;
use super::GraphView;

impl GraphView {
    pub(in crate::app) fn new(data: GraphData) -> Self {
        let mut index_by_id = HashMap::with_capacity(data.nodes.len());
        for (index, node) in data.nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        // The builder guarantees both endpoints exist; a link that still
        // names an unknown id is dropped rather than allowed to panic
        // later in the draw pass.
        let mut link_ends = Vec::with_capacity(data.links.len());
        let mut dropped = 0usize;
        for link in &data.links {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(&link.source),
                index_by_id.get(&link.target),
            ) else {
                dropped += 1;
                continue;
            };
            if source == target {
                dropped += 1;
                continue;
            }
            link_ends.push((source, target, link.value));
        }
        if dropped > 0 {
            log::warn!("dropped {dropped} links with unknown or self-referencing endpoints");
        }

        let mut neighbors = vec![Vec::new(); data.nodes.len()];
        for &(source, target, _value) in &link_ends {
            neighbors[source].push(target);
            neighbors[target].push(source);
        }

        let sim = Simulation::new(&data.nodes, &link_ends);
        let focus = FocusState::new(data.nodes.len());

        Self {
            data,
            index_by_id,
            neighbors,
            link_ends,
            sim,
            focus,
        }
    }

    pub(in crate::app) fn step(&mut self) -> bool {
        self.sim.step()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use crate::paper::{GraphLink, build_graph};

    use super::super::super::focus::InputEvent;
    use super::*;

    fn fixture_data() -> GraphData {
        let papers = [
            crate::paper::Paper {
                id: "1".into(),
                title: "First".into(),
                link: String::new(),
                pmc_id: "PMC1".into(),
                keywords: vec!["a".into(), "b".into()],
            },
            crate::paper::Paper {
                id: "2".into(),
                title: "Second".into(),
                link: String::new(),
                pmc_id: "PMC2".into(),
                keywords: vec!["b".into(), "c".into()],
            },
            crate::paper::Paper {
                id: "3".into(),
                title: "Third".into(),
                link: String::new(),
                pmc_id: "PMC3".into(),
                keywords: vec!["d".into()],
            },
        ];
        build_graph(&papers)
    }

    #[test]
    fn adjacency_mirrors_the_links() {
        let view = GraphView::new(fixture_data());
        assert_eq!(view.link_ends, vec![(0, 1, 1)]);
        assert_eq!(view.neighbors[0], vec![1]);
        assert_eq!(view.neighbors[1], vec![0]);
        assert!(view.neighbors[2].is_empty());
    }

    #[test]
    fn links_with_unknown_endpoints_are_dropped() {
        let mut data = fixture_data();
        data.links.push(GraphLink {
            source: "1".into(),
            target: "ghost".into(),
            value: 2,
        });
        data.links.push(GraphLink {
            source: "2".into(),
            target: "2".into(),
            value: 1,
        });

        let view = GraphView::new(data);
        assert_eq!(view.link_ends, vec![(0, 1, 1)]);
    }

    #[test]
    fn a_new_batch_replaces_all_runtime_state() {
        let mut view = GraphView::new(fixture_data());
        view.sim.drag_start(0, vec2(100.0, 100.0));
        view.focus.handle(InputEvent::ClickNode(1));
        assert!(view.focus.focus_mode());

        let replacement = GraphView::new(fixture_data());
        assert!(replacement.sim.nodes.iter().all(|node| node.pin.is_none()));
        assert!(!replacement.focus.focus_mode());
    }
}
