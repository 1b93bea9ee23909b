use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};

use crate::{descriptor::Descriptor, token::Token};

/// Immutable-after-construction index from token to the ordered descriptor
/// list registered for it.
///
/// Registration order within a group is the contract for multi-binding
/// results; first-appearance order of distinct tokens is preserved for
/// deterministic iteration.
#[derive(Debug, Default)]
pub struct Registry {
    groups: BTreeMap<Token, Vec<Arc<Descriptor>>>,
    order: Vec<Token>,
}

impl Registry {
    #[must_use]
    pub fn new(descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.register_internal(descriptor);
        }
        registry
    }

    #[inline]
    #[must_use]
    pub fn has(&self, token: &Token) -> bool {
        self.groups.contains_key(token)
    }

    /// Descriptors for a token in registration order. Empty for unknown
    /// tokens, never an error.
    #[must_use]
    pub fn resolve_all(&self, token: &Token) -> &[Arc<Descriptor>] {
        self.groups.get(token).map_or(&[], Vec::as_slice)
    }

    /// Registered tokens in first-appearance order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.order.iter()
    }

    pub(crate) fn register_internal(&mut self, descriptor: Descriptor) {
        let token = descriptor.token().clone();
        let group = self.groups.entry(token.clone()).or_default();
        if group.is_empty() {
            self.order.push(token);
        }
        group.push(Arc::new(descriptor));
    }
}
