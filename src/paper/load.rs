use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::model::Paper;

#[derive(Clone, Debug, Deserialize)]
struct RawPaper {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "pmcId")]
    pmc_id: String,
    #[serde(default)]
    keywords: Vec<String>,
}

fn parse_paper_payload(raw: &str) -> Result<Vec<RawPaper>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in paper payload")?;

    let entries = match &parsed {
        Value::Object(object) => object
            .get("papers")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("paper payload object has no `papers` array"))?,
        Value::Array(array) => array,
        _ => return Err(anyhow!("unexpected JSON type for paper payload")),
    };

    let mut papers = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for entry in entries {
        match RawPaper::deserialize(entry) {
            Ok(paper) => papers.push(paper),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} malformed paper records");
    }

    if papers.is_empty() && skipped > 0 {
        Err(anyhow!("no parsable paper records in payload"))
    } else {
        Ok(papers)
    }
}

/// Selection policy carried over from the web front-end: rank by keyword
/// count and keep the middle window. The top of the ranking is dominated
/// by catalog-style entries that connect to everything, the bottom by
/// keyword-starved records that connect to nothing.
fn select_middle_slice(mut papers: Vec<Paper>, cap: usize) -> Vec<Paper> {
    papers.sort_by(|a, b| {
        b.keywords
            .len()
            .cmp(&a.keywords.len())
            .then_with(|| a.id.cmp(&b.id))
    });

    if cap == 0 {
        return Vec::new();
    }
    if papers.len() > cap {
        let start = (papers.len() - cap) / 2;
        papers.drain(..start);
        papers.truncate(cap);
    }
    papers
}

/// Reads a paper-set export (either `{ "papers": [...] }` or a bare
/// array), drops unusable records, and applies the middle-slice cap.
pub fn load_paper_set(path: &Path, cap: usize) -> Result<Vec<Paper>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read paper set {}", path.display()))?;

    let raw_papers = parse_paper_payload(&raw)
        .with_context(|| format!("failed to parse paper set {}", path.display()))?;
    let total = raw_papers.len();

    let mut missing_id = 0usize;
    let mut keywordless = 0usize;
    let mut papers = Vec::with_capacity(raw_papers.len());
    for raw_paper in raw_papers {
        if raw_paper.id.is_empty() {
            missing_id += 1;
            continue;
        }
        if raw_paper.keywords.is_empty() {
            keywordless += 1;
            continue;
        }
        papers.push(Paper {
            id: raw_paper.id,
            title: raw_paper.title,
            link: raw_paper.link,
            pmc_id: raw_paper.pmc_id,
            keywords: raw_paper.keywords,
        });
    }

    if missing_id > 0 {
        log::warn!("dropped {missing_id} paper records without an id");
    }

    let papers = select_middle_slice(papers, cap);
    log::info!(
        "paper set {}: {total} records, {keywordless} without keywords, {} selected",
        path.display(),
        papers.len()
    );
    Ok(papers)
}
