use std::collections::HashMap;

use eframe::egui::{Color32, Pos2, Stroke, Vec2};

use crate::paper::GraphData;

use super::focus::FocusState;
use super::sim::Simulation;

mod build;
mod interaction;
mod scene;
mod view;

/// One graph batch end to end: the immutable graph data, its index maps,
/// the particle simulation, and the focus controller. A new paper batch
/// replaces the whole aggregate, so simulation or focus state never
/// leaks across batches.
pub(super) struct GraphView {
    pub data: GraphData,
    pub index_by_id: HashMap<String, usize>,
    /// Per-node 1-hop adjacency over `data.nodes` indices.
    pub neighbors: Vec<Vec<usize>>,
    /// Links resolved to `(source, target, value)` index triples.
    pub link_ends: Vec<(usize, usize, usize)>,
    pub sim: Simulation,
    pub focus: FocusState,
}

/// Per-node draw instruction, in world coordinates.
pub(super) struct NodeVisual {
    pub pos: Vec2,
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Stroke,
    pub visible: bool,
    pub label: String,
}

pub(super) struct LinkVisual {
    pub source: Vec2,
    pub target: Vec2,
    pub width: f32,
    pub visible: bool,
}

pub(super) struct TooltipVisual {
    pub title: String,
    pub pmc_id: String,
    pub keywords: Vec<String>,
    pub anchor: Pos2,
}

pub(super) struct Scene {
    pub nodes: Vec<NodeVisual>,
    pub links: Vec<LinkVisual>,
    pub tooltip: Option<TooltipVisual>,
}
