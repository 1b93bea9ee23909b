#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod collection;
pub(crate) mod context;
pub(crate) mod descriptor;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod token;
pub(crate) mod utils;

pub use any::{Instance, TypeInfo};
pub use collection::ServiceCollection;
pub use descriptor::{Dependency, Descriptor, DescriptorId, Lifetime};
pub use errors::{InstantiateErrorKind, ResolveErrorKind};
pub use factory::{ArgValue, FactoryArgs};
pub use provider::Provider;
pub use registry::Registry;
pub use token::{Token, UniqueToken};
