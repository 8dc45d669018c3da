use std::collections::BTreeSet;

use crate::dataset::{Dataset, SessionRecord};
use crate::schema::ColumnSchema;

/// The user's two inclusion sets from the sidebar multi-selects.
///
/// A row survives filtering only when its therapist AND its therapy type
/// are both members. Page-load defaults include every distinct value, so
/// the first render shows the whole dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSelection {
    pub therapists: BTreeSet<String>,
    pub therapy_types: BTreeSet<String>,
}

impl FilterSelection {
    /// The default selection: every distinct value of both facet
    /// columns.
    pub fn all(dataset: &Dataset, schema: &ColumnSchema) -> Self {
        Self {
            therapists: dataset.distinct_text(&schema.therapist).into_iter().collect(),
            therapy_types: dataset
                .distinct_text(&schema.therapy_type)
                .into_iter()
                .collect(),
        }
    }

    pub fn from_lists<T, Y>(therapists: T, therapy_types: Y) -> Self
    where
        T: IntoIterator<Item = String>,
        Y: IntoIterator<Item = String>,
    {
        Self {
            therapists: therapists.into_iter().collect(),
            therapy_types: therapy_types.into_iter().collect(),
        }
    }
}

/// The filtered row subset for one render cycle. Rebuilt from the
/// dataset on every filter change, never mutated in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredView {
    records: Vec<SessionRecord>,
}

impl FilteredView {
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep the rows whose therapist and therapy type are both selected.
/// An empty selection set on either facet yields an empty view.
pub fn apply(records: &[SessionRecord], selection: &FilterSelection) -> FilteredView {
    let records = records
        .iter()
        .filter(|r| {
            selection.therapists.contains(&r.therapist)
                && selection.therapy_types.contains(&r.therapy_type)
        })
        .cloned()
        .collect();
    FilteredView { records }
}
