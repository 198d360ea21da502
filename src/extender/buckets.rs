use std::collections::BTreeMap;

use crate::container::{ContainerState, QuantityContainer};
use crate::metadata::Uid;
use crate::variable::Variable;

/// Identity of a parameter coordinate for one quantity component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct BucketKey {
    pub series_index: Uid,
    pub quantity_index: Uid,
    pub parameter_ids: Vec<Uid>,
    pub parameter_values: Vec<Variable>,
}

/// Open and sealed containers of one extender session
///
/// Each key has at most one open container. Once it holds `bucket_size`
/// samples it is sealed and moved to the flush queue; the next sample for the
/// same key opens a new container. Bucket ordinals come from one session-wide
/// counter, so they increase per key without a per-key map.
#[derive(Debug)]
pub(crate) struct QuantityBuckets {
    bucket_size: usize,
    open: BTreeMap<BucketKey, QuantityContainer>,
    sealed: Vec<QuantityContainer>,
    next_bucket: u64,
}

impl QuantityBuckets {
    pub fn new(bucket_size: usize) -> Self {
        Self {
            bucket_size: bucket_size.max(1),
            open: BTreeMap::new(),
            sealed: Vec::new(),
            next_bucket: 0,
        }
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Change the bucket size; open containers that are already full get sealed
    pub fn set_bucket_size(&mut self, bucket_size: usize) {
        self.bucket_size = bucket_size.max(1);
        let full: Vec<BucketKey> = self
            .open
            .iter()
            .filter(|(_, container)| container.len() >= self.bucket_size)
            .map(|(key, _)| key.clone())
            .collect();
        for key in full {
            self.seal(&key);
        }
    }

    pub fn append(&mut self, key: BucketKey, value: Variable) {
        let next_bucket = &mut self.next_bucket;
        let container = self.open.entry(key.clone()).or_insert_with(|| {
            let bucket = *next_bucket;
            *next_bucket += 1;
            QuantityContainer::new(
                key.series_index,
                key.quantity_index,
                bucket,
                key.parameter_ids.clone(),
                key.parameter_values.clone(),
            )
        });
        container.append_open(value);
        if container.len() >= self.bucket_size {
            self.seal(&key);
        }
    }

    fn seal(&mut self, key: &BucketKey) {
        if let Some(mut container) = self.open.remove(key) {
            container.seal();
            self.sealed.push(container);
        }
    }

    /// Seal every open container, in key order
    pub fn seal_all(&mut self) {
        let open = std::mem::take(&mut self.open);
        for (_, mut container) in open {
            container.seal();
            self.sealed.push(container);
        }
    }

    pub fn sealed(&self) -> &[QuantityContainer] {
        &self.sealed
    }

    pub fn sealed_len(&self) -> usize {
        self.sealed.len()
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Containers held in memory, open or sealed
    pub fn buffered_len(&self) -> usize {
        self.open.len() + self.sealed.len()
    }

    pub fn clear_sealed(&mut self) {
        debug_assert!(self.sealed.iter().all(|c| c.state() == ContainerState::Sealed));
        self.sealed.clear();
    }

    /// Drop everything buffered for one series
    pub fn discard_series(&mut self, series_index: Uid) {
        self.open.retain(|key, _| key.series_index != series_index);
        self.sealed.retain(|c| c.series_index != series_index);
    }
}
