use alloc::vec::Vec;
use core::future::Future;

use crate::{
    descriptor::{Dependency, Descriptor, Lifetime},
    errors::InstantiateErrorKind,
    factory::FactoryArgs,
    provider::Provider,
    registry::Registry,
    token::Token,
};

/// Ordered registration builder. Collects descriptors and hands the engine
/// the flat list it is built from; registration order is preserved and is
/// the multi-binding order.
#[derive(Default)]
pub struct ServiceCollection {
    descriptors: Vec<Descriptor>,
}

impl ServiceCollection {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    #[must_use]
    pub fn add_factory<F, Fut, T>(self, token: Token, lifetime: Lifetime, dependencies: Vec<Dependency>, factory: F) -> Self
    where
        F: Fn(FactoryArgs) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<T, InstantiateErrorKind>> + Send + 'static,
        T: Send + Sync + 'static,
    {
        self.add(Descriptor::new(token, lifetime, dependencies, factory))
    }

    #[must_use]
    pub fn add_value<T>(self, token: Token, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.add(Descriptor::value(token, value))
    }

    /// Registers `token` as an alias of `target`, identity preserved.
    #[must_use]
    pub fn add_existing(self, token: Token, target: Token) -> Self {
        self.add(Descriptor::alias(token, target))
    }

    #[must_use]
    pub fn has(&self, token: &Token) -> bool {
        self.descriptors.iter().any(|descriptor| descriptor.token() == token)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    #[must_use]
    pub fn build_provider(self) -> Provider {
        Provider::new(Registry::new(self.descriptors))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::{sync::Arc, vec::Vec};

    use super::ServiceCollection;
    use crate::{
        descriptor::Lifetime,
        errors::InstantiateErrorKind,
        factory::FactoryArgs,
        token::Token,
    };

    struct Config(u8);

    #[test]
    fn test_has() {
        let collection = ServiceCollection::new().add_value(Token::name("config"), Config(1));

        assert!(collection.has(&Token::name("config")));
        assert!(!collection.has(&Token::name("missing")));
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_build_provider_round_trip() {
        let provider = ServiceCollection::new()
            .add_value(Token::name("seed"), Config(3))
            .add_factory(
                Token::of::<Config>(),
                Lifetime::Scoped,
                Vec::new(),
                |_args: FactoryArgs| async { Ok::<_, InstantiateErrorKind>(Config(5)) },
            )
            .add_existing(Token::name("settings"), Token::name("seed"))
            .build_provider();

        let seed = provider.get(&Token::name("seed")).await.unwrap().unwrap();
        let aliased = provider.get(&Token::name("settings")).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&seed, &aliased));
        assert_eq!(seed.downcast::<Config>().unwrap().0, 3);

        let scoped = provider.get(&Token::of::<Config>()).await.unwrap().unwrap();
        assert_eq!(scoped.downcast::<Config>().unwrap().0, 5);
    }
}
