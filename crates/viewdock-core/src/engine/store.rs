use crate::core::models::ids::PoseId;
use crate::core::models::pose::PoseRecord;
use std::cmp::Ordering;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Pose id {id} is already present in collection '{store}'")]
    DuplicateId { store: String, id: PoseId },

    #[error("Pose id {id} follows id {previous} in collection '{store}'; ids must increase")]
    IdOutOfOrder {
        store: String,
        id: PoseId,
        previous: PoseId,
    },

    #[error("Unknown score field '{field}' in collection '{store}'")]
    UnknownField { store: String, field: String },

    #[error("No pose with id {id} in collection '{store}'")]
    NotFound { store: String, id: PoseId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// The ordered set of poses loaded from one file under one object name.
///
/// Records are kept in parse order. Sorting only rearranges a view over them, so
/// [`CollectionStore::records`] is stable while [`CollectionStore::iter`] follows
/// the current [`SortKey`].
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    name: String,
    records: Vec<PoseRecord>,
    view: Vec<usize>,
    sort: Option<SortKey>,
    hidden: HashSet<String>,
}

impl CollectionStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_records(
        name: impl Into<String>,
        records: Vec<PoseRecord>,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new(name);
        store.add_all(records)?;
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends `records` in the given order.
    ///
    /// Nothing is added when any incoming id collides with a held record or with
    /// another incoming record, or does not exceed the id before it. An active sort
    /// is reapplied afterwards.
    pub fn add_all(&mut self, records: Vec<PoseRecord>) -> Result<(), StoreError> {
        let mut seen: HashSet<PoseId> = self.records.iter().map(PoseRecord::id).collect();
        let mut previous = self.records.last().map(PoseRecord::id);
        for record in &records {
            let id = record.id();
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId {
                    store: self.name.clone(),
                    id,
                });
            }
            if let Some(previous) = previous.filter(|&previous| id < previous) {
                return Err(StoreError::IdOutOfOrder {
                    store: self.name.clone(),
                    id,
                    previous,
                });
            }
            previous = Some(id);
        }

        let start = self.records.len();
        self.records.extend(records);
        self.view.extend(start..self.records.len());
        if let Some(key) = self.sort.clone() {
            self.apply_sort(&key);
        }
        Ok(())
    }

    /// Orders the view by `field`.
    ///
    /// Records without the field (or holding NaN) come last in both directions;
    /// ties keep parse order.
    pub fn sort_by(&mut self, field: &str, descending: bool) -> Result<(), StoreError> {
        if !self.has_field(field) {
            return Err(self.unknown_field(field));
        }
        let key = SortKey {
            field: field.to_string(),
            descending,
        };
        self.apply_sort(&key);
        self.sort = Some(key);
        Ok(())
    }

    /// Restores parse order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.view = (0..self.records.len()).collect();
    }

    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    /// Records in the current view order.
    pub fn iter(&self) -> impl Iterator<Item = &PoseRecord> {
        self.view.iter().map(|&index| &self.records[index])
    }

    /// Records in parse order, unaffected by sorting.
    pub fn records(&self) -> &[PoseRecord] {
        &self.records
    }

    pub fn ids(&self) -> impl Iterator<Item = PoseId> + '_ {
        self.iter().map(PoseRecord::id)
    }

    pub fn get(&self, id: PoseId) -> Result<&PoseRecord, StoreError> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                store: self.name.clone(),
                id,
            })
    }

    /// Union of score fields over all records, in first-seen order.
    pub fn all_fields(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .flat_map(|record| record.scores().fields())
            .filter(|field| seen.insert(*field))
            .collect()
    }

    /// [`Self::all_fields`] without the fields hidden through
    /// [`Self::set_field_visible`].
    pub fn visible_fields(&self) -> Vec<&str> {
        self.all_fields()
            .into_iter()
            .filter(|field| !self.hidden.contains(*field))
            .collect()
    }

    pub fn set_field_visible(&mut self, field: &str, visible: bool) -> Result<(), StoreError> {
        if !self.has_field(field) {
            return Err(self.unknown_field(field));
        }
        if visible {
            self.hidden.remove(field);
        } else {
            self.hidden.insert(field.to_string());
        }
        Ok(())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.scores().contains(field))
    }

    pub(crate) fn unknown_field(&self, field: &str) -> StoreError {
        StoreError::UnknownField {
            store: self.name.clone(),
            field: field.to_string(),
        }
    }

    fn apply_sort(&mut self, key: &SortKey) {
        self.view = (0..self.records.len()).collect();
        let records = &self.records;
        self.view.sort_by(|&a, &b| {
            let left = records[a].score(&key.field).and_then(|v| v.sort_key());
            let right = records[b].score(&key.field).and_then(|v| v.sort_key());
            match (left, right) {
                (Some(l), Some(r)) if key.descending => r.total_cmp(&l),
                (Some(l), Some(r)) => l.total_cmp(&r),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::format::SourceFormat;
    use crate::core::models::ids::ModelRef;
    use crate::core::models::score::{ScoreSet, ScoreValue};

    fn record(id: u32, scores: &[(&str, ScoreValue)]) -> PoseRecord {
        let scores: ScoreSet = scores
            .iter()
            .map(|(field, value)| (field.to_string(), *value))
            .collect();
        PoseRecord::new(PoseId(id), SourceFormat::Vina, scores, ModelRef::from(PoseId(id)))
    }

    fn affinity(id: u32, value: f64) -> PoseRecord {
        record(id, &[("Affinity", ScoreValue::Real(value))])
    }

    fn ids(store: &CollectionStore) -> Vec<u32> {
        store.ids().map(PoseId::get).collect()
    }

    #[test]
    fn ascending_sort_puts_most_negative_first() {
        let mut store = CollectionStore::from_records(
            "vina",
            vec![affinity(1, -7.2), affinity(2, -8.5), affinity(3, -6.9)],
        )
        .unwrap();

        store.sort_by("Affinity", false).unwrap();
        assert_eq!(ids(&store), vec![2, 1, 3]);
        store.sort_by("Affinity", true).unwrap();
        assert_eq!(ids(&store), vec![3, 1, 2]);
        assert_eq!(
            store.sort_key(),
            Some(&SortKey {
                field: "Affinity".to_string(),
                descending: true
            })
        );
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let mut store = CollectionStore::from_records(
            "mixed",
            vec![
                affinity(1, -5.0),
                record(2, &[("Total", ScoreValue::Real(1.0))]),
                affinity(3, -9.0),
                affinity(4, f64::NAN),
                affinity(5, -7.0),
            ],
        )
        .unwrap();

        store.sort_by("Affinity", false).unwrap();
        assert_eq!(ids(&store), vec![3, 5, 1, 2, 4]);
        store.sort_by("Affinity", true).unwrap();
        assert_eq!(ids(&store), vec![1, 5, 3, 2, 4]);
    }

    #[test]
    fn integer_and_real_values_compare_numerically() {
        let mut store = CollectionStore::from_records(
            "clusters",
            vec![
                record(1, &[("Cluster", ScoreValue::Integer(3))]),
                record(2, &[("Cluster", ScoreValue::Real(1.5))]),
                record(3, &[("Cluster", ScoreValue::Integer(0))]),
            ],
        )
        .unwrap();
        store.sort_by("Cluster", false).unwrap();
        assert_eq!(ids(&store), vec![3, 2, 1]);
    }

    #[test]
    fn sorting_never_changes_parse_order() {
        let mut store = CollectionStore::from_records(
            "vina",
            vec![affinity(1, -7.2), affinity(2, -8.5)],
        )
        .unwrap();
        store.sort_by("Affinity", false).unwrap();
        let parse_order: Vec<_> = store.records().iter().map(|r| r.id().get()).collect();
        assert_eq!(parse_order, vec![1, 2]);

        store.clear_sort();
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.sort_key(), None);
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let mut store = CollectionStore::from_records("vina", vec![affinity(1, -7.2)]).unwrap();
        assert_eq!(
            store.sort_by("Energy", false),
            Err(StoreError::UnknownField {
                store: "vina".to_string(),
                field: "Energy".to_string()
            })
        );
        assert_eq!(store.sort_key(), None);
    }

    #[test]
    fn duplicate_ids_reject_the_whole_batch() {
        let mut store = CollectionStore::from_records("vina", vec![affinity(1, -7.2)]).unwrap();
        let result = store.add_all(vec![affinity(2, -6.0), affinity(1, -5.0)]);
        assert!(matches!(result, Err(StoreError::DuplicateId { id: PoseId(1), .. })));
        assert_eq!(store.len(), 1);

        let result = store.add_all(vec![affinity(3, -6.0), affinity(3, -5.0)]);
        assert!(matches!(result, Err(StoreError::DuplicateId { id: PoseId(3), .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ties_keep_parse_order_after_an_earlier_sort() {
        let scored = |id, a, b| {
            record(
                id,
                &[("A", ScoreValue::Real(a)), ("B", ScoreValue::Real(b))],
            )
        };
        let mut fresh =
            CollectionStore::from_records("ties", vec![scored(1, 1.0, 5.0), scored(2, 2.0, 5.0)])
                .unwrap();
        fresh.sort_by("B", false).unwrap();
        assert_eq!(ids(&fresh), vec![1, 2]);

        let mut resorted = fresh.clone();
        resorted.sort_by("A", true).unwrap();
        assert_eq!(ids(&resorted), vec![2, 1]);
        resorted.sort_by("B", false).unwrap();
        assert_eq!(ids(&resorted), vec![1, 2]);
    }

    #[test]
    fn ids_must_increase_in_parse_order() {
        let mut store = CollectionStore::new("vina");
        let result = store.add_all(vec![affinity(3, -7.2), affinity(1, -8.5)]);
        assert_eq!(
            result,
            Err(StoreError::IdOutOfOrder {
                store: "vina".to_string(),
                id: PoseId(1),
                previous: PoseId(3),
            })
        );
        assert!(store.is_empty());

        store.add_all(vec![affinity(3, -7.2)]).unwrap();
        let result = store.add_all(vec![affinity(2, -6.0)]);
        assert!(matches!(result, Err(StoreError::IdOutOfOrder { id: PoseId(2), .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mixed_format_store_exposes_union_and_sorts_missing_last() {
        let vina = record(
            1,
            &[
                ("Affinity", ScoreValue::Real(-7.2)),
                ("RMSD lb", ScoreValue::Real(0.0)),
            ],
        );
        let pydock = PoseRecord::new(
            PoseId(2),
            SourceFormat::PyDock,
            [
                ("Conf", ScoreValue::Integer(431)),
                ("Total", ScoreValue::Real(-41.3)),
            ]
            .into_iter()
            .collect(),
            ModelRef::from(PoseId(2)),
        );
        let xyz = PoseRecord::new(
            PoseId(3),
            SourceFormat::Xyz,
            ScoreSet::new(),
            ModelRef::from(PoseId(3)),
        );
        let mut store = CollectionStore::from_records("mixed", vec![vina, pydock, xyz]).unwrap();

        assert_eq!(store.visible_fields(), vec!["Affinity", "RMSD lb", "Conf", "Total"]);
        store.sort_by("Total", false).unwrap();
        assert_eq!(ids(&store), vec![2, 1, 3]);
        store.sort_by("Affinity", true).unwrap();
        assert_eq!(ids(&store), vec![1, 2, 3]);

        let text = crate::engine::export::Exporter::default()
            .export_to_string(&store)
            .unwrap();
        assert_eq!(
            text,
            "Affinity,RMSD lb,Conf,Total\n-7.200000,0.000000,,\n,,431,-41.300000\n,,,\n"
        );
    }

    #[test]
    fn added_records_follow_active_sort() {
        let mut store = CollectionStore::from_records("vina", vec![affinity(1, -7.2)]).unwrap();
        store.sort_by("Affinity", false).unwrap();
        store.add_all(vec![affinity(2, -9.0), affinity(3, -1.0)]).unwrap();
        assert_eq!(ids(&store), vec![2, 1, 3]);
    }

    #[test]
    fn get_finds_record_or_reports_not_found() {
        let store = CollectionStore::from_records("vina", vec![affinity(1, -7.2)]).unwrap();
        assert_eq!(store.get(PoseId(1)).unwrap().id(), PoseId(1));
        assert!(matches!(
            store.get(PoseId(9)),
            Err(StoreError::NotFound { id: PoseId(9), .. })
        ));
    }

    #[test]
    fn fields_are_the_first_seen_union_across_formats() {
        let store = CollectionStore::from_records(
            "mixed",
            vec![
                record(
                    1,
                    &[
                        ("Affinity", ScoreValue::Real(-7.0)),
                        ("RMSD lb", ScoreValue::Real(0.0)),
                    ],
                ),
                record(
                    2,
                    &[
                        ("Conf", ScoreValue::Integer(4)),
                        ("Affinity", ScoreValue::Real(-6.0)),
                    ],
                ),
            ],
        )
        .unwrap();
        assert_eq!(store.all_fields(), vec!["Affinity", "RMSD lb", "Conf"]);
    }

    #[test]
    fn hidden_fields_drop_out_of_visible_fields() {
        let mut store = CollectionStore::from_records(
            "vina",
            vec![record(
                1,
                &[
                    ("Affinity", ScoreValue::Real(-7.0)),
                    ("RMSD lb", ScoreValue::Real(0.0)),
                ],
            )],
        )
        .unwrap();

        store.set_field_visible("RMSD lb", false).unwrap();
        assert_eq!(store.visible_fields(), vec!["Affinity"]);
        assert_eq!(store.all_fields(), vec!["Affinity", "RMSD lb"]);

        store.set_field_visible("RMSD lb", true).unwrap();
        assert_eq!(store.visible_fields(), vec!["Affinity", "RMSD lb"]);
        assert!(store.set_field_visible("Total", false).is_err());
    }
}
