mod load;
mod model;
mod similarity;

pub use load::load_paper_set;
pub use model::{GraphData, GraphLink, GraphNode, Paper};
pub use similarity::build_graph;
