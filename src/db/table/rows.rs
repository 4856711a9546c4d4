use serde::Serialize;

use super::row::Record;

/// The ordered records of one table.
///
/// Besides the records themselves the collection remembers `last_id`, the
/// highest ID it has ever handed out or seen. IDs are allocated above it, so
/// deleting the current maximum never frees that ID for reuse.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RowCollection {
    last_id: i64,

    #[serde(rename = "rows")]
    records: Vec<Record>,
}

impl RowCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from stored records and a stored high-water
    /// mark. The mark is raised to cover any larger ID among the records.
    pub fn from_records(records: Vec<Record>, last_id: i64) -> Self {
        let max_seen = records.iter().filter_map(Record::id).max().unwrap_or(0);
        Self {
            last_id: last_id.max(max_seen),
            records,
        }
    }

    /// The ID the next insert will receive, or `None` once `i64::MAX` has
    /// been handed out.
    pub fn next_id(&self) -> Option<i64> {
        self.last_id.max(0).checked_add(1)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: Record) {
        if let Some(id) = record.id() {
            self.last_id = self.last_id.max(id);
        }
        self.records.push(record);
    }

    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.records.retain(keep);
    }
}

impl<'a> IntoIterator for &'a RowCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
