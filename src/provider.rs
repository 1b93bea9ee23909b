use alloc::{
    boxed::Box,
    sync::{Arc, Weak},
    vec::Vec,
};
use anyhow::anyhow;
use parking_lot::Mutex;
use tracing::{debug, error, info_span, Instrument as _};

use crate::{
    any::Instance,
    cache::{ActivatedInstance, Cache},
    context::ResolutionContext,
    descriptor::{Dependency, Descriptor, Lifetime},
    errors::{InstantiateErrorKind, ResolveErrorKind},
    factory::{ArgValue, BoxCloneFactory, FactoryArgs},
    registry::Registry,
    service::{service_fn, BoxCloneService, Service as _},
    token::Token,
    utils::future::BoxFuture,
};

/// One scope node in a resolution tree.
///
/// Cloning is cheap and yields another handle to the same node. Nodes chain
/// off whichever node created them; the root is the ultimate ancestor with
/// no parent. Each node owns a private grow-only cache of the non-transient
/// instances it decided; the registry is shared read-only by the whole tree.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    registry: Arc<Registry>,
    parent: Option<Provider>,
    cache: Mutex<Cache>,
}

impl Provider {
    /// Builds the root node of a new tree.
    ///
    /// The registry additionally receives one synthetic singleton descriptor
    /// under [`Token::Provider`] whose factory hands out the root itself, so
    /// factories can request their resolver for late-bound resolution. The
    /// descriptor captures a weak handle: an unresolved registration never
    /// keeps the root alive on its own.
    #[must_use]
    pub fn new(mut registry: Registry) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<ProviderInner>| {
            registry.register_internal(Descriptor::from_parts(
                Token::Provider,
                Lifetime::Singleton,
                Vec::new(),
                self_factory(weak.clone()),
            ));

            ProviderInner {
                registry: Arc::new(registry),
                parent: None,
                cache: Mutex::new(Cache::new()),
            }
        });

        Self { inner }
    }

    /// Creates a child scope chained off this node.
    #[must_use]
    pub fn create_scope(&self) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry: self.inner.registry.clone(),
                parent: Some(self.clone()),
                cache: Mutex::new(Cache::new()),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn has(&self, token: &Token) -> bool {
        self.inner.registry.has(token)
    }

    /// Resolves exactly one instance for the token.
    ///
    /// Zero registered descriptors yield `Ok(None)`, not an error. More than
    /// one activated value fails with
    /// [`ResolveErrorKind::MultipleInstanceFound`].
    pub async fn get(&self, token: &Token) -> Result<Option<Instance>, ResolveErrorKind> {
        let mut context = ResolutionContext::new();

        async {
            let mut instances = self.resolve_token(&mut context, token).await?;
            match instances.len() {
                0 => Ok(None),
                1 => Ok(instances.pop()),
                found => {
                    let err = ResolveErrorKind::MultipleInstanceFound {
                        token: token.clone(),
                        found,
                    };
                    error!("{}", err);
                    Err(err)
                }
            }
        }
        .instrument(info_span!("get", token = %token))
        .await
    }

    /// Resolves every registered descriptor for the token, in registration
    /// order. Possibly empty, never an error for unknown tokens.
    pub async fn get_all(&self, token: &Token) -> Result<Vec<Instance>, ResolveErrorKind> {
        let mut context = ResolutionContext::new();

        self.resolve_token(&mut context, token)
            .instrument(info_span!("get_all", token = %token))
            .await
    }

    fn resolve_token<'a>(
        &'a self,
        context: &'a mut ResolutionContext,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<Vec<Instance>, ResolveErrorKind>> {
        Box::pin(async move {
            let descriptors = self.inner.registry.resolve_all(token);
            if descriptors.is_empty() {
                debug!(token = %token, "No descriptors registered");
                return Ok(Vec::new());
            }

            if context.is_activating(token) {
                let dependant = match context.current() {
                    Some(dependant) => dependant.clone(),
                    None => token.clone(),
                };
                let err = ResolveErrorKind::CycleDependencyDetected {
                    token: token.clone(),
                    dependant,
                };
                error!("{}", err);
                return Err(err);
            }

            context.mark_as_activating(token.clone());

            // Sequential on purpose: the n-th activation completes, with all
            // of its transitive dependencies, before the (n+1)-th begins.
            // Multi-binding order must not depend on factory latency.
            let mut instances = Vec::with_capacity(descriptors.len());
            for descriptor in descriptors {
                instances.push(self.resolve_descriptor(&mut *context, descriptor).await?);
            }

            context.mark_as_activated(token);

            Ok(instances)
        })
    }

    async fn resolve_descriptor(
        &self,
        context: &mut ResolutionContext,
        descriptor: &Arc<Descriptor>,
    ) -> Result<Instance, ResolveErrorKind> {
        match descriptor.lifetime() {
            Lifetime::Transient => self.activate(context, descriptor).await,
            Lifetime::Scoped => self.resolve_or_activate(context, descriptor).await,
            Lifetime::Singleton => {
                // Singletons activate and cache at the root, however deep
                // the requesting scope is.
                let mut node = self;
                while let Some(parent) = node.inner.parent.as_ref() {
                    node = parent;
                }
                node.resolve_or_activate(context, descriptor).await
            }
        }
    }

    async fn resolve_or_activate(
        &self,
        context: &mut ResolutionContext,
        descriptor: &Arc<Descriptor>,
    ) -> Result<Instance, ResolveErrorKind> {
        let cached = self.inner.cache.lock().get(descriptor.id());
        if let Some(instance) = cached {
            debug!(token = %descriptor.token(), "Found in cache");
            return Ok(instance);
        }

        debug!(token = %descriptor.token(), "Not found in cache");

        let instance = self.activate(context, descriptor).await?;

        self.inner.cache.lock().insert(ActivatedInstance {
            token: descriptor.token().clone(),
            descriptor: descriptor.clone(),
            instance: instance.clone(),
        });

        debug!(token = %descriptor.token(), "Cached");

        Ok(instance)
    }

    async fn activate(&self, context: &mut ResolutionContext, descriptor: &Arc<Descriptor>) -> Result<Instance, ResolveErrorKind> {
        let mut values = Vec::with_capacity(descriptor.dependencies().len());
        for dependency in descriptor.dependencies() {
            values.push(self.resolve_dependency(&mut *context, dependency).await?);
        }

        let mut factory = descriptor.factory();
        match factory.call(FactoryArgs::new(values)).await {
            Ok(instance) => Ok(instance),
            Err(source) => {
                let err = ResolveErrorKind::Factory {
                    token: descriptor.token().clone(),
                    source,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    async fn resolve_dependency(
        &self,
        context: &mut ResolutionContext,
        dependency: &Dependency,
    ) -> Result<ArgValue, ResolveErrorKind> {
        let mut instances = self.resolve_token(&mut *context, &dependency.token).await?;

        if dependency.is_multi {
            return Ok(ArgValue::Many(instances));
        }

        if instances.len() > 1 {
            let err = ResolveErrorKind::MultipleInstanceFound {
                token: dependency.token.clone(),
                found: instances.len(),
            };
            error!("{}", err);
            return Err(err);
        }

        match instances.pop() {
            Some(instance) => Ok(ArgValue::One(instance)),
            None if dependency.is_optional => Ok(ArgValue::Absent),
            None => {
                let err = ResolveErrorKind::NoProviderForTokenFound {
                    token: dependency.token.clone(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn cache_len(&self) -> usize {
        self.inner.cache.lock().len()
    }
}

fn self_factory(weak: Weak<ProviderInner>) -> BoxCloneFactory {
    BoxCloneService::new(service_fn(move |_args: FactoryArgs| {
        let weak = weak.clone();

        async move {
            let inner = weak
                .upgrade()
                .ok_or_else(|| InstantiateErrorKind::Custom(anyhow!("root provider dropped during self-resolution")))?;

            Ok(Arc::new(Provider { inner }) as Instance)
        }
    }))
}
