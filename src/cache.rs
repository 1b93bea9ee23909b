use alloc::{collections::BTreeMap, sync::Arc};

use crate::{
    any::Instance,
    descriptor::{Descriptor, DescriptorId},
    token::Token,
};

/// Records what produced a cached value.
#[derive(Clone)]
pub(crate) struct ActivatedInstance {
    pub(crate) token: Token,
    pub(crate) descriptor: Arc<Descriptor>,
    pub(crate) instance: Instance,
}

/// Per scope-node instance cache. Grow-only, no eviction.
pub(crate) struct Cache {
    map: BTreeMap<DescriptorId, ActivatedInstance>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, id: DescriptorId) -> Option<Instance> {
        self.map.get(&id).map(|record| record.instance.clone())
    }

    #[inline]
    pub(crate) fn insert(&mut self, record: ActivatedInstance) {
        self.map.insert(record.descriptor.id(), record);
    }

    #[inline]
    #[must_use]
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[cfg(test)]
    pub(crate) fn activated(&self) -> impl Iterator<Item = &ActivatedInstance> {
        self.map.values()
    }
}
