/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 16/03/2026
Last Modified: 19/10/2026
License: MIT

Notes: The per-geometry batch runner shared by the densify, simplify,
antimeridian and octagon tools. Geometries are read once, rewritten in
memory, and the changed ones are proposed back to the store inside a
single named edit command.
*/

use crate::feature_store::{EditCommand, FeatureStore, Selection};
use crate::geometry::FeatureId;
use crate::progress::{MessageLevel, ProgressSink, FEATURE_PROGRESS_STEP};
use boundary_common::error::{Error, Result};
use boundary_common::projection::GEOGRAPHIC_CRS;
use boundary_common::structures::MultiPolygon;
use tracing::{debug, info, warn};

/// The outcome of rewriting one geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Rewrite {
    /// No change was necessary.
    Unchanged,
    /// Propose this geometry in place of the original.
    Replace(MultiPolygon),
    /// The geometry cannot be processed; counted as skipped.
    Skip,
}

/// Counts from a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Features read from the store.
    pub total: usize,
    pub modified: usize,
    /// Empty, non-polygonal or unprocessable features.
    pub skipped: usize,
    pub modified_ids: Vec<FeatureId>,
}

impl BatchReport {
    /// The user-facing summary of the run.
    pub fn summary(&self) -> (MessageLevel, String) {
        if self.modified == 0 {
            if self.skipped > 0 {
                (
                    MessageLevel::Warning,
                    format!(
                        "Finished. No geometries changed. Skipped {} feature(s).",
                        self.skipped
                    ),
                )
            } else {
                (
                    MessageLevel::Warning,
                    "Finished. No geometry changes were necessary.".to_string(),
                )
            }
        } else {
            (
                MessageLevel::Success,
                format!(
                    "Finished. Modified {} of {} feature(s). Edits are NOT saved.",
                    self.modified, self.total
                ),
            )
        }
    }
}

/// Checks that the store can be edited, is geographic and that the chosen
/// features are not empty.
pub fn check_preconditions(store: &dyn FeatureStore, selection: Selection) -> Result<()> {
    if store.crs() != GEOGRAPHIC_CRS {
        return Err(Error::Precondition(format!(
            "Layer CRS is {}, expected {}.",
            store.crs(),
            GEOGRAPHIC_CRS
        )));
    }
    if !store.is_editable() {
        return Err(Error::Precondition(
            "Layer is not in edit mode. Enable editing and re-run.".to_string(),
        ));
    }
    let count = match selection {
        Selection::Selected => store.selected_count(),
        Selection::All => store.feature_count(),
    };
    if count == 0 {
        return Err(Error::Precondition(match selection {
            Selection::Selected => "No selected features.".to_string(),
            Selection::All => "The layer contains no features.".to_string(),
        }));
    }
    Ok(())
}

/// Applies `rewrite` to every polygonal feature of the selection and
/// proposes the changed geometries inside an edit command named
/// `command_name`. Geometry types are preserved. Returns the counts; the
/// summary message is sent to `progress`.
pub fn rewrite_features<F>(
    store: &mut dyn FeatureStore,
    selection: Selection,
    command_name: &str,
    progress: &mut dyn ProgressSink,
    mut rewrite: F,
) -> Result<BatchReport>
where
    F: FnMut(FeatureId, &MultiPolygon) -> Result<Rewrite>,
{
    check_preconditions(store, selection)?;
    let features = store.list_features(selection);
    let mut report = BatchReport {
        total: features.len(),
        ..Default::default()
    };
    let mut changed = vec![];
    for (i, (id, geometry)) in features.iter().enumerate() {
        match geometry.to_multipolygon() {
            Some(mp) => match rewrite(*id, &mp)? {
                Rewrite::Replace(new_mp) => {
                    changed.push((*id, geometry.with_multipolygon(new_mp)));
                }
                Rewrite::Unchanged => {}
                Rewrite::Skip => report.skipped += 1,
            },
            None => {
                debug!(id, geometry = %geometry, "skipping non-polygon or empty feature");
                report.skipped += 1;
            }
        }
        if (i + 1) % FEATURE_PROGRESS_STEP == 0 && i + 1 < features.len() {
            progress.report(command_name, i + 1, features.len());
        }
    }
    progress.report(command_name, features.len(), features.len());

    if !changed.is_empty() {
        let mut cmd = EditCommand::begin(store, command_name)?;
        for (id, geometry) in changed {
            cmd.propose(id, geometry)?;
            report.modified_ids.push(id);
        }
        cmd.end()?;
    }
    report.modified = report.modified_ids.len();
    if report.skipped > 0 {
        warn!(skipped = report.skipped, "features skipped");
    }
    info!(
        command = command_name,
        total = report.total,
        modified = report.modified,
        skipped = report.skipped,
        "batch finished"
    );
    let (level, text) = report.summary();
    progress.notify(level, &text);
    Ok(report)
}

/// Runs `f`, reporting any error to the sink, and always tears the sink
/// down afterwards. Failed preconditions are reported as warnings.
pub fn run_guarded<T, F>(progress: &mut dyn ProgressSink, f: F) -> Result<T>
where
    F: FnOnce(&mut dyn ProgressSink) -> Result<T>,
{
    let ret = f(&mut *progress);
    if let Err(e) = &ret {
        let level = match e {
            Error::Precondition(_) => MessageLevel::Warning,
            _ => MessageLevel::Error,
        };
        progress.notify(level, &e.to_string());
    }
    progress.finish();
    ret
}

#[cfg(test)]
mod test {
    use super::{check_preconditions, rewrite_features, run_guarded, BatchReport, Rewrite};
    use crate::feature_store::{FeatureStore, MemoryFeatureStore, Selection};
    use crate::geometry::{Feature, Geometry};
    use crate::progress::{MessageLevel, RecordingProgress};
    use boundary_common::error::Error;
    use boundary_common::structures::{Point2D, Polygon, Ring};

    fn tri(x: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(
            Ring::new(&[
                Point2D::new(x, 0.0),
                Point2D::new(x + 1.0, 0.0),
                Point2D::new(x, 1.0),
                Point2D::new(x, 0.0),
            ]),
            vec![],
        ))
    }

    fn store() -> MemoryFeatureStore {
        let features = vec![
            Feature::new(1, tri(0.0)),
            Feature::new(2, tri(5.0)),
            Feature::new(3, Geometry::Empty),
        ];
        let mut s = MemoryFeatureStore::new(features, "EPSG:4326").unwrap();
        s.start_editing();
        s
    }

    #[test]
    fn test_summary_messages() {
        let r = BatchReport::default();
        assert_eq!(
            r.summary(),
            (MessageLevel::Warning, "Finished. No geometry changes were necessary.".to_string())
        );
        let r = BatchReport { total: 3, skipped: 1, ..Default::default() };
        assert_eq!(r.summary().1, "Finished. No geometries changed. Skipped 1 feature(s).");
        let r = BatchReport { total: 3, modified: 2, ..Default::default() };
        assert_eq!(
            r.summary(),
            (MessageLevel::Success, "Finished. Modified 2 of 3 feature(s). Edits are NOT saved.".to_string())
        );
    }

    #[test]
    fn test_preconditions() {
        let mut s = store();
        assert!(check_preconditions(&s, Selection::All).is_ok());
        assert!(matches!(
            check_preconditions(&s, Selection::Selected),
            Err(Error::Precondition(_))
        ));
        s.stop_editing().unwrap();
        assert!(check_preconditions(&s, Selection::All).is_err());

        let other = MemoryFeatureStore::new(vec![Feature::new(1, tri(0.0))], "EPSG:3857").unwrap();
        let e = check_preconditions(&other, Selection::All).unwrap_err();
        assert_eq!(e.to_string(), "Layer CRS is EPSG:3857, expected EPSG:4326.");
    }

    #[test]
    fn test_rewrite_only_changed() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let report = rewrite_features(&mut s, Selection::All, "Shift", &mut progress, |id, mp| {
            if id == 2 {
                let mut out = mp.clone();
                for r in out.rings_mut() {
                    for v in r.vertices.iter_mut() {
                        v.y += 1.0;
                    }
                }
                Ok(Rewrite::Replace(out))
            } else {
                Ok(Rewrite::Unchanged)
            }
        })
        .unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.modified, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.modified_ids, vec![2]);
        assert!(matches!(s.get_geometry(2), Some(Geometry::Polygon(_))));
        assert_eq!(s.get_geometry(1), Some(tri(0.0)));
        assert_eq!(s.edit_log()[0].name, "Shift");
        assert_eq!(progress.reports, vec![("Shift".to_string(), 3, 3)]);
        assert_eq!(progress.last_message().unwrap().0, MessageLevel::Success);
    }

    #[test]
    fn test_guarded_reports_errors_and_finishes() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let ret = run_guarded(&mut progress, |p| {
            rewrite_features(&mut s, Selection::All, "Fail", p, |_, _| {
                Err(Error::Transform("boom".to_string()))
            })
        });
        assert!(ret.is_err());
        assert_eq!(progress.finished, 1);
        assert_eq!(progress.last_message().unwrap().0, MessageLevel::Error);
        assert!(s.edit_log().is_empty());
        assert!(s.pending_ids().is_empty());
    }

    #[test]
    fn test_guarded_precondition_is_a_warning() {
        let mut s = store();
        s.stop_editing().unwrap();
        let mut progress = RecordingProgress::new();
        let ret = run_guarded(&mut progress, |p| {
            rewrite_features(&mut s, Selection::All, "Noop", p, |_, _| Ok(Rewrite::Unchanged))
        });
        assert!(matches!(ret, Err(Error::Precondition(_))));
        assert_eq!(progress.finished, 1);
        assert_eq!(
            progress.last_message().unwrap(),
            &(
                MessageLevel::Warning,
                "Layer is not in edit mode. Enable editing and re-run.".to_string()
            )
        );
    }

    #[test]
    fn test_progress_reported_every_step() {
        let features: Vec<Feature> = (0..45).map(|i| Feature::new(i, tri(i as f64 * 2.0))).collect();
        let mut s = MemoryFeatureStore::new(features, "EPSG:4326").unwrap();
        s.start_editing();
        let mut progress = RecordingProgress::new();
        rewrite_features(&mut s, Selection::All, "Noop", &mut progress, |_, _| {
            Ok(Rewrite::Unchanged)
        })
        .unwrap();
        let done: Vec<usize> = progress.reports.iter().map(|r| r.1).collect();
        assert_eq!(done, vec![20, 40, 45]);
    }
}
