use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::paper::{GraphData, build_graph, load_paper_set};

mod focus;
mod graph;
mod render_utils;
mod sim;
mod ui;

use graph::GraphView;

pub struct PaperOrbitApp {
    papers_path: PathBuf,
    graph_size: usize,
    state: AppState,
    reload_rx: Option<Receiver<Result<GraphData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<GraphData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    view: GraphView,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    pan: Vec2,
    zoom: f32,
    physics_running: bool,
    dragging: Option<usize>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct SearchMatchCache {
    query: String,
    matches: HashSet<usize>,
}

impl PaperOrbitApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, papers_path: PathBuf, graph_size: usize) -> Self {
        let state = Self::start_load(papers_path.clone(), graph_size);
        Self {
            papers_path,
            graph_size,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(papers_path: PathBuf, graph_size: usize) -> Receiver<Result<GraphData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_paper_set(&papers_path, graph_size)
                .map(|papers| build_graph(&papers))
                .map_err(|error| format!("{error:#}"));
            if let Ok(graph) = &result {
                log::info!(
                    "built paper graph: {} nodes, {} links",
                    graph.node_count(),
                    graph.link_count()
                );
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(papers_path: PathBuf, graph_size: usize) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(papers_path, graph_size),
        }
    }
}

impl eframe::App for PaperOrbitApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading paper network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the paper set");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition =
                            Some(Self::start_load(self.papers_path.clone(), self.graph_size));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.papers_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        self.papers_path.clone(),
                        self.graph_size,
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            // The whole view model is replaced: no simulation
                            // or focus state survives into the new batch.
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
