use alloc::{sync::Arc, vec, vec::Vec};
use core::{
    fmt::{self, Debug, Formatter},
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    errors::InstantiateErrorKind,
    factory::{boxed_factory, passthrough_factory, shared_factory, BoxCloneFactory, FactoryArgs},
    token::Token,
};

/// Instance caching granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Never cached, activated fresh on every resolution.
    Transient,
    /// Cached in the scope node that resolved it.
    Scoped,
    /// Cached once, at the root node.
    Singleton,
}

/// One input a factory needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub token: Token,
    /// Requests all registered providers as an ordered collection.
    pub is_multi: bool,
    /// Permits zero matches. Meaningful only when `is_multi` is false.
    pub is_optional: bool,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub fn single(token: Token) -> Self {
        Self {
            token,
            is_multi: false,
            is_optional: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn optional(token: Token) -> Self {
        Self {
            token,
            is_multi: false,
            is_optional: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn multi(token: Token) -> Self {
        Self {
            token,
            is_multi: true,
            is_optional: false,
        }
    }
}

/// Process-unique descriptor identity, used as the cache key so two
/// descriptors registered under the same token never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorId(u64);

impl DescriptorId {
    #[must_use]
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);

        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Registration record binding a token to a lifetime, a dependency list and
/// an async factory. Immutable once built; the unit of activation.
pub struct Descriptor {
    id: DescriptorId,
    token: Token,
    lifetime: Lifetime,
    dependencies: Vec<Dependency>,
    factory: BoxCloneFactory,
}

impl Descriptor {
    pub fn new<F, Fut, T>(token: Token, lifetime: Lifetime, dependencies: Vec<Dependency>, factory: F) -> Self
    where
        F: Fn(FactoryArgs) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<T, InstantiateErrorKind>> + Send + 'static,
        T: Send + Sync + 'static,
    {
        Self::from_parts(token, lifetime, dependencies, boxed_factory(factory))
    }

    /// Constant binding: every resolution yields the same shared instance.
    pub fn value<T>(token: Token, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::from_parts(token, Lifetime::Singleton, Vec::new(), shared_factory(Arc::new(value)))
    }

    /// Redirect binding: resolving `token` yields whatever `target` resolves
    /// to, identity preserved.
    #[must_use]
    pub fn alias(token: Token, target: Token) -> Self {
        Self::from_parts(token, Lifetime::Transient, vec![Dependency::single(target)], passthrough_factory())
    }

    #[must_use]
    pub(crate) fn from_parts(token: Token, lifetime: Lifetime, dependencies: Vec<Dependency>, factory: BoxCloneFactory) -> Self {
        Self {
            id: DescriptorId::next(),
            token,
            lifetime,
            dependencies,
            factory,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    #[inline]
    #[must_use]
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    #[inline]
    #[must_use]
    pub(crate) fn factory(&self) -> BoxCloneFactory {
        self.factory.clone()
    }
}

impl Debug for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("token", &self.token)
            .field("lifetime", &self.lifetime)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::{Descriptor, Lifetime};
    use crate::{
        errors::InstantiateErrorKind,
        factory::FactoryArgs,
        token::Token,
    };

    struct Config;

    #[test]
    fn test_descriptor_ids_are_unique() {
        let first = Descriptor::new(Token::of::<Config>(), Lifetime::Transient, Vec::new(), |_args: FactoryArgs| async {
            Ok::<_, InstantiateErrorKind>(Config)
        });
        let second = Descriptor::new(Token::of::<Config>(), Lifetime::Transient, Vec::new(), |_args: FactoryArgs| async {
            Ok::<_, InstantiateErrorKind>(Config)
        });

        assert_eq!(first.token(), second.token());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_value_descriptor_shape() {
        let descriptor = Descriptor::value(Token::name("config"), 42u8);

        assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
        assert!(descriptor.dependencies().is_empty());
    }

    #[test]
    fn test_alias_descriptor_shape() {
        let target = Token::name("config");
        let descriptor = Descriptor::alias(Token::name("settings"), target.clone());

        assert_eq!(descriptor.lifetime(), Lifetime::Transient);
        assert_eq!(descriptor.dependencies().len(), 1);
        assert_eq!(descriptor.dependencies()[0].token, target);
        assert!(!descriptor.dependencies()[0].is_multi);
        assert!(!descriptor.dependencies()[0].is_optional);
    }
}
