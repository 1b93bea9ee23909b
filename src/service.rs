mod base;
mod boxed_clone;
mod fn_service;
mod map_future;

pub(crate) use base::{Service, ServiceExt};
pub(crate) use boxed_clone::BoxCloneService;
pub(crate) use fn_service::{service_fn, FnServiceAsync};
pub(crate) use map_future::MapFuture;
