use std::collections::HashMap;

use crate::record::{JobRecord, UNKNOWN};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneTypeKey {
    pub zone: String,
    pub job_type: String,
}

impl ZoneTypeKey {
    pub fn new(zone: impl Into<String>, job_type: impl Into<String>) -> Self {
        ZoneTypeKey {
            zone: zone.into(),
            job_type: job_type.into(),
        }
    }
}

/// Counts every (record, location) pair under (zone, title).
pub fn aggregate<'a, I>(records: I) -> HashMap<ZoneTypeKey, u64>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let mut counts = HashMap::new();
    for record in records {
        let job_type = record.job_type_label();
        for location in &record.locations {
            let zone = location.name.as_deref().unwrap_or(UNKNOWN);
            *counts.entry(ZoneTypeKey::new(zone, job_type)).or_insert(0) += 1;
        }
    }
    counts
}

/// Zone × job type counts with a deterministic row view for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneStats {
    counts: HashMap<ZoneTypeKey, u64>,
}

impl ZoneStats {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        ZoneStats { counts: aggregate(records) }
    }

    pub fn get(&self, zone: &str, job_type: &str) -> u64 {
        self.counts.get(&ZoneTypeKey::new(zone, job_type)).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sorted by zone, then job type.
    pub fn sorted_rows(&self) -> Vec<(&ZoneTypeKey, u64)> {
        let mut rows: Vec<_> = self.counts.iter().map(|(k, v)| (k, *v)).collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}
