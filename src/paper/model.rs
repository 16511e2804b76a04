#[derive(Clone, Debug)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub link: String,
    pub pmc_id: String,
    pub keywords: Vec<String>,
}

/// One graph vertex per paper. `keywords` is deduplicated (first
/// occurrence wins) and `keyword_count` is the size of that set.
#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub link: String,
    pub pmc_id: String,
    pub keywords: Vec<String>,
    pub keyword_count: usize,
}

/// Unordered paper pair weighted by shared-keyword count. `value >= 1`
/// always holds: pairs with nothing in common produce no link at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: usize,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
