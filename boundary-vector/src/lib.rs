/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 19/10/2026
License: MIT
*/

// private sub-module defined in other files
pub mod alignment;
pub mod batch;
pub mod feature_store;
pub mod geojson;
pub mod geometry;
pub mod progress;
pub mod snap;

// exports identifiers from private sub-modules in the current module namespace
pub use crate::alignment::{AlignmentEngine, AlignmentOptions, AlignmentReport, SnapScope};
pub use crate::batch::{check_preconditions, rewrite_features, run_guarded, BatchReport, Rewrite};
pub use crate::feature_store::{EditCommand, EditRecord, FeatureStore, MemoryFeatureStore, Selection};
pub use crate::geojson::FeatureCollection;
pub use crate::geometry::{Feature, FeatureId, Geometry};
pub use crate::progress::{
    ConsoleProgress, MessageLevel, ProgressSink, RecordingProgress, FEATURE_PROGRESS_STEP,
};
pub use crate::snap::{ReferencePointSnapper, SnapInput, SnapOperation, SnapOutput};
