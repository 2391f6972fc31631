/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 18/03/2026
Last Modified: 19/10/2026
License: MIT

Notes: Vertex alignment runs in three stages over the chosen polygon
features:

  1. every vertex is rounded and deduplicated into a target vertex index;
  2. every ring is noded against the index, adding a vertex wherever an
     edge passes within tolerance of a target it does not already touch;
  3. the noded geometries (or all of them) are handed to a snap operation
     together with the targets, and its output is applied by correlation id.

Stage 2 and stage 3 edits are proposed in separate edit commands. If stage 3
fails, the stage 2 edits stay buffered in the store and the run reports the
failure.
*/

use crate::batch::check_preconditions;
use crate::feature_store::{EditCommand, FeatureStore, Selection};
use crate::geometry::{FeatureId, Geometry};
use crate::progress::{MessageLevel, ProgressSink, FEATURE_PROGRESS_STEP};
use crate::snap::{SnapInput, SnapOperation};
use boundary_common::algorithms::{
    node_multipolygon, NodingParams, TargetVertexIndex, DEFAULT_DECIMALS, ENDPOINT_EPSILON,
    MAX_DECIMALS,
};
use boundary_common::error::{Error, Result};
use boundary_common::structures::MultiPolygon;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

const NUM_STAGES: usize = 3;
pub const NODING_COMMAND: &str = "Node edges near target vertices (EPSG:4326)";
pub const SNAP_COMMAND: &str = "Snap to target vertices (EPSG:4326)";

/// Which geometries are handed to the snap stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapScope {
    /// Only the features that gained vertices during noding.
    Touched,
    /// Every processed feature.
    All,
}

impl Default for SnapScope {
    fn default() -> Self {
        SnapScope::Touched
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentOptions {
    /// Search and snap distance, in degrees.
    pub tolerance: f64,
    /// Decimal places for rounding target vertices.
    pub decimals: u32,
    pub endpoint_epsilon: f64,
    pub snap_scope: SnapScope,
    /// Noding progress is reported after this many edges.
    pub progress_every: usize,
}

impl Default for AlignmentOptions {
    fn default() -> Self {
        AlignmentOptions {
            tolerance: 0.0001,
            decimals: DEFAULT_DECIMALS,
            endpoint_epsilon: ENDPOINT_EPSILON,
            snap_scope: SnapScope::Touched,
            progress_every: 500,
        }
    }
}

impl AlignmentOptions {
    pub fn new(tolerance: f64) -> AlignmentOptions {
        AlignmentOptions {
            tolerance,
            ..Default::default()
        }
    }

    fn noding_params(&self) -> NodingParams {
        NodingParams {
            tolerance: self.tolerance,
            decimals: self.decimals,
            endpoint_epsilon: self.endpoint_epsilon,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Distinct target vertices.
    pub targets: usize,
    /// Features that gained vertices during noding, in store order.
    pub noded_ids: Vec<FeatureId>,
    /// Vertices inserted during noding.
    pub inserted_vertices: usize,
    /// Features whose geometry the snap stage changed.
    pub snapped: usize,
    /// Empty or non-polygonal features.
    pub skipped: usize,
}

impl AlignmentReport {
    pub fn summary(&self) -> String {
        format!(
            "Finished. Targets: {}. Noded features: {}. Snapped features: {}. Skipped: {}. Edits are NOT saved.",
            self.targets,
            self.noded_ids.len(),
            self.snapped,
            self.skipped
        )
    }
}

/// Aligns the vertices of a set of polygon features so that coincident or
/// nearly coincident boundaries share exact vertices.
pub struct AlignmentEngine<'a> {
    options: AlignmentOptions,
    snapper: &'a dyn SnapOperation,
}

struct WorkItem {
    id: FeatureId,
    original: Geometry,
    geometry: MultiPolygon,
}

impl<'a> AlignmentEngine<'a> {
    pub fn new(options: AlignmentOptions, snapper: &'a dyn SnapOperation) -> AlignmentEngine<'a> {
        AlignmentEngine { options, snapper }
    }

    pub fn options(&self) -> &AlignmentOptions {
        &self.options
    }

    pub fn run(
        &self,
        store: &mut dyn FeatureStore,
        selection: Selection,
        progress: &mut dyn ProgressSink,
    ) -> Result<AlignmentReport> {
        check_preconditions(store, selection)?;
        let mut report = AlignmentReport::default();

        let mut items: Vec<WorkItem> = vec![];
        for (id, geometry) in store.list_features(selection) {
            match geometry.to_multipolygon() {
                Some(mp) => items.push(WorkItem {
                    id,
                    original: geometry,
                    geometry: mp,
                }),
                None => report.skipped += 1,
            }
        }
        if items.len() < 2 {
            return Err(Error::Precondition(
                "Need at least 2 polygon features (selection or layer) to run.".to_string(),
            ));
        }
        if !(self.options.tolerance > 0f64) {
            return Err(Error::invalid_parameter(
                "tolerance",
                self.options.tolerance,
                "must be greater than zero",
            ));
        }
        if self.options.decimals > MAX_DECIMALS {
            return Err(Error::invalid_parameter(
                "decimals",
                self.options.decimals as f64,
                &format!("must be at most {}", MAX_DECIMALS),
            ));
        }

        // Stage 1
        let label = stage_label(1, "Build target vertices");
        let num_items = items.len();
        let index = TargetVertexIndex::from_geometries(
            items.iter().enumerate().map(|(i, item)| {
                if (i + 1) % FEATURE_PROGRESS_STEP == 0 && i + 1 < num_items {
                    progress.report(&label, i + 1, num_items);
                }
                &item.geometry
            }),
            self.options.decimals,
        );
        progress.report(&label, num_items, num_items);
        report.targets = index.len();

        // Stage 2
        let total_segments: usize = items.iter().map(|item| item.geometry.num_segments()).sum();
        if total_segments == 0 {
            return Err(Error::Precondition("No segments found to process.".to_string()));
        }
        let label = stage_label(2, "Node edges near target vertices");
        let params = self.options.noding_params();
        let every = self.options.progress_every.max(1);
        let mut segments_done = 0usize;
        for item in items.iter_mut() {
            let (noded, inserted, segments) = node_multipolygon(&item.geometry, &index, &params);
            if (segments_done + segments) / every > segments_done / every {
                progress.report(&label, (segments_done + segments).min(total_segments), total_segments);
            }
            segments_done += segments;
            if inserted > 0 {
                item.geometry = noded;
                report.noded_ids.push(item.id);
                report.inserted_vertices += inserted;
            }
        }
        progress.report(&label, total_segments, total_segments);
        debug!(
            noded = report.noded_ids.len(),
            inserted = report.inserted_vertices,
            "noding finished"
        );

        if !report.noded_ids.is_empty() {
            let touched: BTreeSet<FeatureId> = report.noded_ids.iter().copied().collect();
            let mut cmd = EditCommand::begin(store, NODING_COMMAND)?;
            for item in items.iter().filter(|item| touched.contains(&item.id)) {
                cmd.propose(item.id, item.original.with_multipolygon(item.geometry.clone()))?;
            }
            cmd.end()?;
        }

        // Stage 3
        let label = stage_label(3, "Snap geometries to target vertices");
        let inputs: Vec<SnapInput> = match self.options.snap_scope {
            SnapScope::Touched => {
                let touched: BTreeSet<FeatureId> = report.noded_ids.iter().copied().collect();
                items
                    .iter()
                    .filter(|item| touched.contains(&item.id))
                    .map(|item| SnapInput {
                        correlation_id: item.id,
                        geometry: item.geometry.clone(),
                    })
                    .collect()
            }
            SnapScope::All => items
                .iter()
                .map(|item| SnapInput {
                    correlation_id: item.id,
                    geometry: item.geometry.clone(),
                })
                .collect(),
        };

        if !inputs.is_empty() {
            let outputs = self
                .snapper
                .snap(&inputs, index.points(), self.options.tolerance)?;
            if outputs.is_empty() {
                return Err(Error::Snap(
                    "the snap operation returned no features".to_string(),
                ));
            }
            let by_id: HashMap<FeatureId, usize> = items
                .iter()
                .enumerate()
                .map(|(i, item)| (item.id, i))
                .collect();
            let sent: BTreeSet<FeatureId> = inputs.iter().map(|s| s.correlation_id).collect();
            for out in &outputs {
                if !sent.contains(&out.correlation_id) {
                    return Err(Error::Snap(format!(
                        "unknown correlation id {} in snap output",
                        out.correlation_id
                    )));
                }
            }

            let mut cmd = EditCommand::begin(store, SNAP_COMMAND)?;
            for (i, out) in outputs.into_iter().enumerate() {
                if (i + 1) % FEATURE_PROGRESS_STEP == 0 && i + 1 < inputs.len() {
                    progress.report(&label, i + 1, inputs.len());
                }
                if out.geometry.is_empty() {
                    continue;
                }
                let item = &items[by_id[&out.correlation_id]];
                if out.geometry != item.geometry {
                    cmd.propose(out.correlation_id, item.original.with_multipolygon(out.geometry))?;
                    report.snapped += 1;
                }
            }
            cmd.end()?;
        }
        progress.report(&label, inputs.len(), inputs.len());

        info!(
            targets = report.targets,
            noded = report.noded_ids.len(),
            snapped = report.snapped,
            skipped = report.skipped,
            "alignment finished"
        );
        progress.notify(MessageLevel::Success, &report.summary());
        Ok(report)
    }
}

fn stage_label(stage: usize, text: &str) -> String {
    format!("Stage {}/{}: {}", stage, NUM_STAGES, text)
}
