use std::io::{self, Write};
use std::path::Path;

use log::{debug, warn};

use montecover_graph::load_graph;
use montecover_mcts::{Mcts, SearchConfig};

use crate::manifest::{load_truth_size, Instance};

// ---------------------------------------------------------------------------
// InstanceReport — one CSV row
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceReport {
    pub idx: usize,
    pub n: usize,
    pub edges: usize,
    pub root_children: usize,
    pub total_nodes: usize,
    /// The driver's final best cover size.
    pub est_cover: usize,
    /// Reference size from the ground-truth file, −1 when absent.
    pub truth_cover: i64,
}

// ---------------------------------------------------------------------------
// run_manifest
// ---------------------------------------------------------------------------

/// Run the search on every manifest instance and collect one row each.
///
/// A failing instance (unreadable or malformed input) is logged and
/// skipped; it never aborts the run. The iteration loop stops early when
/// the tree is exhausted.
pub fn run_manifest(
    instances: &[Instance],
    iterations: u32,
    exploration: f64,
) -> Vec<InstanceReport> {
    let mut reports = Vec::with_capacity(instances.len());

    for (idx, instance) in instances.iter().enumerate() {
        let graph = match load_graph(&instance.input) {
            Ok(graph) => graph,
            Err(err) => {
                warn!("skipping instance {idx}: {err}");
                continue;
            }
        };
        let n = graph.num_vertices();
        let edges = graph.num_edges();

        let mut mcts = Mcts::new(graph, SearchConfig::with_exploration(exploration));
        for _ in 0..iterations {
            if !mcts.run() {
                break;
            }
        }

        let truth_cover = load_truth_size(&instance.output)
            .map_or(-1, |size| size as i64);
        debug!(
            "instance {idx}: n={n} edges={edges} est={} truth={truth_cover}",
            mcts.answer()
        );

        reports.push(InstanceReport {
            idx,
            n,
            edges,
            root_children: mcts.root_children(),
            total_nodes: mcts.total_nodes(),
            est_cover: mcts.answer(),
            truth_cover,
        });
    }
    reports
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

pub fn write_csv(mut out: impl Write, reports: &[InstanceReport]) -> io::Result<()> {
    writeln!(
        out,
        "idx,n,edges,root_children,total_nodes,est_cover,truth_cover"
    )?;
    for r in reports {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            r.idx, r.n, r.edges, r.root_children, r.total_nodes, r.est_cover, r.truth_cover
        )?;
    }
    Ok(())
}

/// Dataset tag: the parent-folder name of the manifest (`data/exact/…` →
/// `exact`), falling back to `dataset`.
pub fn manifest_tag(manifest: &Path) -> String {
    manifest
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "dataset".to_string())
}

pub fn output_file_name(tag: &str, iterations: u32, exploration: f64) -> String {
    format!("mvc_{tag}_iters-{iterations}_exp-{exploration}.csv")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
