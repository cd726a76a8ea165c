//! The fixed set of versions of a model.

use crate::model::Model;
use crate::version::Version;
use folio_types::VersionId;
use std::sync::Arc;

/// Both versions of a model, `changes` first.
#[derive(Debug, Clone)]
pub struct Versions {
    list: Vec<Version>,
}

impl Versions {
    pub fn load(model: &Arc<Model>) -> Self {
        Self {
            list: VersionId::ALL
                .into_iter()
                .map(|id| model.version(id))
                .collect(),
        }
    }

    pub fn get(&self, id: VersionId) -> Option<&Version> {
        self.list.iter().find(|version| version.id() == id)
    }

    pub fn latest(&self) -> Option<&Version> {
        self.get(VersionId::Latest)
    }

    pub fn changes(&self) -> Option<&Version> {
        self.get(VersionId::Changes)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Version> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<'a> IntoIterator for &'a Versions {
    type Item = &'a Version;
    type IntoIter = std::slice::Iter<'a, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
