use alloc::{sync::Arc, vec::Vec};
use core::{any::type_name, future::Future};
use tracing::debug;

use crate::{
    any::Instance,
    errors::InstantiateErrorKind,
    service::{service_fn, BoxCloneService},
};

pub(crate) type BoxCloneFactory = BoxCloneService<FactoryArgs, Instance, InstantiateErrorKind>;

/// One resolved dependency position.
#[derive(Clone)]
pub enum ArgValue {
    /// Single dependency that matched exactly one provider.
    One(Instance),
    /// Optional dependency that matched nothing.
    Absent,
    /// Multi dependency, all matches in registration order.
    Many(Vec<Instance>),
}

/// Resolved dependencies of a descriptor, positional in declaration order.
///
/// Factories read their inputs through the typed accessors; every shape or
/// downcast mismatch comes back as an [`InstantiateErrorKind`], never a panic.
pub struct FactoryArgs {
    values: Vec<ArgValue>,
}

impl FactoryArgs {
    #[inline]
    #[must_use]
    pub(crate) fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw access to a position, without downcasting.
    pub fn instance(&self, index: usize) -> Result<&ArgValue, InstantiateErrorKind> {
        self.values.get(index).ok_or(InstantiateErrorKind::MissingArgument { index })
    }

    /// Required single dependency at `index`.
    pub fn one<T>(&self, index: usize) -> Result<Arc<T>, InstantiateErrorKind>
    where
        T: Send + Sync + 'static,
    {
        match self.instance(index)? {
            ArgValue::One(instance) => downcast(index, instance),
            ArgValue::Absent => Err(InstantiateErrorKind::MissingArgument { index }),
            ArgValue::Many(_) => Err(InstantiateErrorKind::MultiplicityMismatch { index }),
        }
    }

    /// Optional single dependency at `index`.
    pub fn optional<T>(&self, index: usize) -> Result<Option<Arc<T>>, InstantiateErrorKind>
    where
        T: Send + Sync + 'static,
    {
        match self.instance(index)? {
            ArgValue::One(instance) => downcast(index, instance).map(Some),
            ArgValue::Absent => Ok(None),
            ArgValue::Many(_) => Err(InstantiateErrorKind::MultiplicityMismatch { index }),
        }
    }

    /// Multi dependency at `index`, in registration order.
    pub fn many<T>(&self, index: usize) -> Result<Vec<Arc<T>>, InstantiateErrorKind>
    where
        T: Send + Sync + 'static,
    {
        match self.instance(index)? {
            ArgValue::Many(instances) => instances.iter().map(|instance| downcast(index, instance)).collect(),
            ArgValue::One(_) | ArgValue::Absent => Err(InstantiateErrorKind::MultiplicityMismatch { index }),
        }
    }
}

fn downcast<T>(index: usize, instance: &Instance) -> Result<Arc<T>, InstantiateErrorKind>
where
    T: Send + Sync + 'static,
{
    instance
        .clone()
        .downcast()
        .map_err(|_| InstantiateErrorKind::IncorrectType {
            index,
            expected: type_name::<T>(),
        })
}

/// Wraps a user factory, erasing its concrete provides type into [`Instance`].
#[must_use]
pub(crate) fn boxed_factory<F, Fut, T>(factory: F) -> BoxCloneFactory
where
    F: Fn(FactoryArgs) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<T, InstantiateErrorKind>> + Send + 'static,
    T: Send + Sync + 'static,
{
    BoxCloneService::new(service_fn(move |args: FactoryArgs| {
        let future = factory(args);

        async move {
            let value = future.await?;

            debug!("Activated");

            Ok(Arc::new(value) as Instance)
        }
    }))
}

/// Hands out the same shared instance on every call.
#[must_use]
pub(crate) fn shared_factory(instance: Instance) -> BoxCloneFactory {
    BoxCloneService::new(service_fn(move |_args: FactoryArgs| {
        let instance = instance.clone();

        async move { Ok::<_, InstantiateErrorKind>(instance) }
    }))
}

/// Passes the single resolved dependency through unchanged, preserving
/// instance identity.
#[must_use]
pub(crate) fn passthrough_factory() -> BoxCloneFactory {
    BoxCloneService::new(service_fn(|args: FactoryArgs| async move {
        match args.instance(0)? {
            ArgValue::One(instance) => Ok(instance.clone()),
            ArgValue::Absent | ArgValue::Many(_) => Err(InstantiateErrorKind::MultiplicityMismatch { index: 0 }),
        }
    }))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::{sync::Arc, vec, vec::Vec};

    use super::{ArgValue, FactoryArgs};
    use crate::{any::Instance, errors::InstantiateErrorKind};

    struct Config(u8);
    struct Logger;

    #[test]
    fn test_one() {
        let args = FactoryArgs::new(vec![ArgValue::One(Arc::new(Config(1)) as Instance)]);

        assert_eq!(args.one::<Config>(0).unwrap().0, 1);
        assert!(matches!(
            args.one::<Logger>(0),
            Err(InstantiateErrorKind::IncorrectType { index: 0, .. })
        ));
        assert!(matches!(args.one::<Config>(1), Err(InstantiateErrorKind::MissingArgument { index: 1 })));
    }

    #[test]
    fn test_optional() {
        let args = FactoryArgs::new(vec![ArgValue::Absent, ArgValue::One(Arc::new(Config(2)) as Instance)]);

        assert!(args.optional::<Config>(0).unwrap().is_none());
        assert_eq!(args.optional::<Config>(1).unwrap().unwrap().0, 2);
    }

    #[test]
    fn test_many() {
        let instances: Vec<Instance> = vec![Arc::new(Config(1)) as Instance, Arc::new(Config(2)) as Instance];
        let args = FactoryArgs::new(vec![ArgValue::Many(instances), ArgValue::One(Arc::new(Config(3)) as Instance)]);

        let configs = args.many::<Config>(0).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].0, 1);
        assert_eq!(configs[1].0, 2);

        assert!(matches!(
            args.many::<Config>(1),
            Err(InstantiateErrorKind::MultiplicityMismatch { index: 1 })
        ));
        assert!(matches!(
            args.one::<Config>(0),
            Err(InstantiateErrorKind::MultiplicityMismatch { index: 0 })
        ));
    }
}
