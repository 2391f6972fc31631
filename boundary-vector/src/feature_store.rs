/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 04/03/2026
Last Modified: 02/09/2026
License: MIT

Notes: The store owns the features. Processing code reads geometries from
it and proposes replacements inside named edit commands; proposals are
buffered and only reach the feature table on `commit`.
*/

use crate::geojson::FeatureCollection;
use crate::geometry::{Feature, FeatureId, Geometry};
use boundary_common::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Which features a run operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The current selection only.
    Selected,
    /// Every feature in the store.
    All,
}

/// The host feature store seen by the processing code.
pub trait FeatureStore {
    /// True when the store accepts proposed geometries.
    fn is_editable(&self) -> bool;

    /// Authority id of the store's coordinate reference system.
    fn crs(&self) -> &str;

    fn feature_count(&self) -> usize;

    fn selected_count(&self) -> usize;

    /// The (id, geometry) pairs of the chosen features, in store order,
    /// reflecting any buffered proposals.
    fn list_features(&self, selection: Selection) -> Vec<(FeatureId, Geometry)>;

    /// The current geometry of a feature, buffered proposals included.
    fn get_geometry(&self, id: FeatureId) -> Option<Geometry>;

    fn begin_edit_command(&mut self, name: &str) -> Result<()>;

    /// Buffers a replacement geometry. Only valid inside an edit command.
    fn propose_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<()>;

    fn end_edit_command(&mut self) -> Result<()>;
}

/// A closed edit command: its name and the features it touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRecord {
    pub name: String,
    pub feature_ids: Vec<FeatureId>,
}

/// An in-memory feature table with a selection, an edit buffer and a log
/// of closed edit commands.
#[derive(Clone, Debug, Default)]
pub struct MemoryFeatureStore {
    features: Vec<Feature>,
    positions: BTreeMap<FeatureId, usize>,
    crs: String,
    editable: bool,
    selected: BTreeSet<FeatureId>,
    buffer: BTreeMap<FeatureId, Geometry>,
    open_command: Option<EditRecord>,
    edit_log: Vec<EditRecord>,
}

impl MemoryFeatureStore {
    pub fn new(features: Vec<Feature>, crs: &str) -> Result<MemoryFeatureStore> {
        let mut positions = BTreeMap::new();
        for (i, f) in features.iter().enumerate() {
            if positions.insert(f.id, i).is_some() {
                return Err(Error::Edit(format!("duplicate feature id {}", f.id)));
            }
        }
        Ok(MemoryFeatureStore {
            features,
            positions,
            crs: crs.to_string(),
            ..Default::default()
        })
    }

    pub fn from_feature_collection(fc: FeatureCollection) -> Result<MemoryFeatureStore> {
        MemoryFeatureStore::new(fc.features, &fc.crs)
    }

    /// The committed features as a collection. Buffered proposals are not
    /// included.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            name: None,
            crs: self.crs.clone(),
            features: self.features.clone(),
        }
    }

    pub fn start_editing(&mut self) {
        self.editable = true;
    }

    /// Leaves edit mode. Fails while buffered edits remain.
    pub fn stop_editing(&mut self) -> Result<()> {
        if !self.buffer.is_empty() || self.open_command.is_some() {
            return Err(Error::Edit(
                "commit or roll back the buffered edits first".to_string(),
            ));
        }
        self.editable = false;
        Ok(())
    }

    /// Replaces the selection. Unknown ids are ignored.
    pub fn select(&mut self, ids: &[FeatureId]) {
        self.selected = ids
            .iter()
            .copied()
            .filter(|id| self.positions.contains_key(id))
            .collect();
    }

    pub fn select_all(&mut self) {
        self.selected = self.positions.keys().copied().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The ids with a buffered replacement geometry.
    pub fn pending_ids(&self) -> Vec<FeatureId> {
        self.buffer.keys().copied().collect()
    }

    pub fn edit_log(&self) -> &[EditRecord] {
        &self.edit_log
    }

    /// Writes every buffered proposal into the feature table. Returns the
    /// number of features changed.
    pub fn commit(&mut self) -> Result<usize> {
        if self.open_command.is_some() {
            return Err(Error::Edit("an edit command is still open".to_string()));
        }
        let buffer = std::mem::take(&mut self.buffer);
        let n = buffer.len();
        for (id, geometry) in buffer {
            if let Some(&i) = self.positions.get(&id) {
                self.features[i].geometry = geometry;
            }
        }
        debug!(features = n, "committed edits");
        Ok(n)
    }

    /// Discards every buffered proposal and the command log.
    pub fn rollback(&mut self) {
        self.buffer.clear();
        self.open_command = None;
        self.edit_log.clear();
    }
}

impl FeatureStore for MemoryFeatureStore {
    fn is_editable(&self) -> bool {
        self.editable
    }

    fn crs(&self) -> &str {
        &self.crs
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn selected_count(&self) -> usize {
        self.selected.len()
    }

    fn list_features(&self, selection: Selection) -> Vec<(FeatureId, Geometry)> {
        self.features
            .iter()
            .filter(|f| selection == Selection::All || self.selected.contains(&f.id))
            .map(|f| {
                let g = self.buffer.get(&f.id).unwrap_or(&f.geometry);
                (f.id, g.clone())
            })
            .collect()
    }

    fn get_geometry(&self, id: FeatureId) -> Option<Geometry> {
        if let Some(g) = self.buffer.get(&id) {
            return Some(g.clone());
        }
        self.positions
            .get(&id)
            .map(|&i| self.features[i].geometry.clone())
    }

    fn begin_edit_command(&mut self, name: &str) -> Result<()> {
        if !self.editable {
            return Err(Error::Edit("the store is not in edit mode".to_string()));
        }
        if let Some(open) = &self.open_command {
            return Err(Error::Edit(format!(
                "cannot begin '{}' while '{}' is open",
                name, open.name
            )));
        }
        self.open_command = Some(EditRecord {
            name: name.to_string(),
            feature_ids: vec![],
        });
        Ok(())
    }

    fn propose_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<()> {
        if !self.positions.contains_key(&id) {
            return Err(Error::Edit(format!("unknown feature id {}", id)));
        }
        match self.open_command.as_mut() {
            Some(cmd) => {
                cmd.feature_ids.push(id);
                self.buffer.insert(id, geometry);
                Ok(())
            }
            None => Err(Error::Edit(
                "geometries can only be proposed inside an edit command".to_string(),
            )),
        }
    }

    fn end_edit_command(&mut self) -> Result<()> {
        match self.open_command.take() {
            Some(cmd) => {
                debug!(command = %cmd.name, features = cmd.feature_ids.len(), "closed edit command");
                self.edit_log.push(cmd);
                Ok(())
            }
            None => Err(Error::Edit("no edit command is open".to_string())),
        }
    }
}

/// An open edit command. The command is closed when the guard is ended or
/// dropped, whichever comes first, so it never outlives a failed run.
pub struct EditCommand<'a> {
    store: &'a mut dyn FeatureStore,
    open: bool,
}

impl<'a> EditCommand<'a> {
    pub fn begin(store: &'a mut dyn FeatureStore, name: &str) -> Result<EditCommand<'a>> {
        store.begin_edit_command(name)?;
        Ok(EditCommand { store, open: true })
    }

    pub fn propose(&mut self, id: FeatureId, geometry: Geometry) -> Result<()> {
        self.store.propose_geometry(id, geometry)
    }

    pub fn end(mut self) -> Result<()> {
        self.open = false;
        self.store.end_edit_command()
    }
}

impl<'a> Drop for EditCommand<'a> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.store.end_edit_command() {
                warn!(error = %e, "could not close edit command");
            }
        }
    }
}
