use core::future::Future;

use super::base::Service;

#[derive(Clone)]
pub(crate) struct FnServiceAsync<F>(pub(crate) F);

#[inline]
pub(crate) fn service_fn<F>(f: F) -> FnServiceAsync<F> {
    FnServiceAsync(f)
}

impl<F, Request, Response, Error, Fut> Service<Request> for FnServiceAsync<F>
where
    F: FnMut(Request) -> Fut,
    Fut: Future<Output = Result<Response, Error>>,
{
    type Response = Response;
    type Error = Error;
    type Future = Fut;

    #[inline]
    fn call(&mut self, request: Request) -> Self::Future {
        self.0(request)
    }
}
