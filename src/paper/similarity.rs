use std::collections::HashSet;

use super::model::{GraphData, GraphLink, GraphNode, Paper};

fn dedup_keywords(keywords: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(keywords.len());
    keywords
        .iter()
        .filter(|keyword| seen.insert(keyword.as_str()))
        .cloned()
        .collect()
}

fn shared_keyword_count(a: &HashSet<&str>, b: &HashSet<&str>) -> usize {
    if a.len() <= b.len() {
        a.iter().filter(|keyword| b.contains(*keyword)).count()
    } else {
        b.iter().filter(|keyword| a.contains(*keyword)).count()
    }
}

/// Builds the similarity graph for a paper batch: one node per paper and
/// one link per unordered pair sharing at least one keyword, weighted by
/// the shared count. Matching is case-sensitive and exact. The pairwise
/// pass is quadratic; callers bound the batch size before calling.
pub fn build_graph(papers: &[Paper]) -> GraphData {
    let nodes = papers
        .iter()
        .map(|paper| {
            let keywords = dedup_keywords(&paper.keywords);
            GraphNode {
                id: paper.id.clone(),
                title: paper.title.clone(),
                link: paper.link.clone(),
                pmc_id: paper.pmc_id.clone(),
                keyword_count: keywords.len(),
                keywords,
            }
        })
        .collect::<Vec<_>>();

    let keyword_sets = nodes
        .iter()
        .map(|node| node.keywords.iter().map(String::as_str).collect::<HashSet<_>>())
        .collect::<Vec<_>>();

    let mut links = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let shared = shared_keyword_count(&keyword_sets[i], &keyword_sets[j]);
            if shared > 0 {
                links.push(GraphLink {
                    source: nodes[i].id.clone(),
                    target: nodes[j].id.clone(),
                    value: shared,
                });
            }
        }
    }

    GraphData { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, keywords: &[&str]) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Paper {id}"),
            link: format!("https://example.org/{id}"),
            pmc_id: format!("PMC{id}"),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }

    fn link_between<'a>(graph: &'a GraphData, a: &str, b: &str) -> Option<&'a GraphLink> {
        graph.links.iter().find(|link| {
            (link.source == a && link.target == b) || (link.source == b && link.target == a)
        })
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn shared_keywords_become_weighted_links() {
        let papers = [
            paper("1", &["a", "b"]),
            paper("2", &["b", "c"]),
            paper("3", &["d"]),
        ];
        let graph = build_graph(&papers);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.link_count(), 1);
        assert_eq!(link_between(&graph, "1", "2").map(|link| link.value), Some(1));
        assert!(link_between(&graph, "1", "3").is_none());
        assert!(link_between(&graph, "2", "3").is_none());
    }

    #[test]
    fn link_value_counts_the_full_intersection() {
        let papers = [
            paper("a", &["bone", "mice", "microgravity", "iss"]),
            paper("b", &["mice", "iss", "radiation", "microgravity"]),
        ];
        let graph = build_graph(&papers);
        assert_eq!(link_between(&graph, "a", "b").map(|link| link.value), Some(3));
    }

    #[test]
    fn link_value_is_order_independent() {
        let forward = build_graph(&[paper("x", &["a", "b"]), paper("y", &["b"])]);
        let reversed = build_graph(&[paper("y", &["b"]), paper("x", &["a", "b"])]);
        assert_eq!(
            link_between(&forward, "x", "y").map(|link| link.value),
            link_between(&reversed, "x", "y").map(|link| link.value),
        );
    }

    #[test]
    fn no_self_links_and_no_duplicate_pairs() {
        let papers = [
            paper("1", &["a", "b"]),
            paper("2", &["a", "b"]),
            paper("3", &["a"]),
        ];
        let graph = build_graph(&papers);

        let mut seen = std::collections::HashSet::new();
        for link in &graph.links {
            assert_ne!(link.source, link.target);
            assert!(link.value >= 1);
            let key = if link.source < link.target {
                (link.source.clone(), link.target.clone())
            } else {
                (link.target.clone(), link.source.clone())
            };
            assert!(seen.insert(key), "duplicate unordered pair");
        }
        assert_eq!(graph.link_count(), 3);
    }

    #[test]
    fn duplicate_keywords_collapse_for_count_and_value() {
        let papers = [paper("1", &["a", "a", "b"]), paper("2", &["a", "a"])];
        let graph = build_graph(&papers);

        assert_eq!(graph.nodes[0].keyword_count, 2);
        assert_eq!(graph.nodes[1].keyword_count, 1);
        assert_eq!(link_between(&graph, "1", "2").map(|link| link.value), Some(1));
    }

    #[test]
    fn keyword_matching_is_case_sensitive() {
        let graph = build_graph(&[paper("1", &["Mice"]), paper("2", &["mice"])]);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn empty_keyword_set_yields_isolated_node() {
        let graph = build_graph(&[paper("1", &[]), paper("2", &["a"])]);
        assert_eq!(graph.nodes[0].keyword_count, 0);
        assert_eq!(graph.link_count(), 0);
    }
}
