//! Request and response interceptor chains.
//!
//! An interceptor is a record of two optional callbacks, stored in an
//! append-only ordered list. Chains execute strictly in registration order
//! and never concurrently with each other; each pipeline run snapshots the
//! registered list at its start, so interceptors registered while a
//! request is in flight only affect subsequent requests.
//!
//! # Request side
//!
//! [`RequestInterceptors::run`] threads the outgoing [`RequestConfig`]
//! through each `on_fulfilled` step. A failing step consults its own
//! `on_rejected`: a returned config resumes the chain, a returned error
//! aborts it.
//!
//! # Response side
//!
//! [`ResponseInterceptors`] hold one ordered list feeding two pipelines.
//! `handle_success` folds a [`Response`] through each `on_fulfilled`.
//! `handle_error` offers the failure to each `on_rejected` in order: the
//! first one that returns a response short-circuits the chain as a
//! recovered success, while a returned error replaces the current one for
//! the remaining interceptors.

use std::sync::{Arc, PoisonError, RwLock};

use crate::client::config::RequestConfig;
use crate::client::errors::ClientError;
use crate::client::response::Response;

/// A request-side transformation step.
pub type RequestFulfilled =
    dyn Fn(RequestConfig) -> Result<RequestConfig, ClientError> + Send + Sync;

/// A request-side recovery step. Returning `Ok` resumes the chain with the
/// recovered config; returning `Err` aborts the chain with that error
/// (return the passed-in error unchanged to decline recovery).
pub type RequestRejected = dyn Fn(ClientError) -> Result<RequestConfig, ClientError> + Send + Sync;

/// A response-side transformation step.
pub type ResponseFulfilled = dyn Fn(Response) -> Result<Response, ClientError> + Send + Sync;

/// A response-side recovery step. Returning `Ok` short-circuits the error
/// chain as a recovered success; returning `Err` passes an error (the same
/// one, or a rewritten one) to the remaining interceptors.
pub type ResponseRejected = dyn Fn(ClientError) -> Result<Response, ClientError> + Send + Sync;

/// Identifies a registered interceptor by its position in the chain.
///
/// Handles exist to make registration order observable; interceptors
/// cannot be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterceptorHandle(usize);

impl InterceptorHandle {
    /// Returns the zero-based registration index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

struct RequestInterceptor {
    on_fulfilled: Option<Box<RequestFulfilled>>,
    on_rejected: Option<Box<RequestRejected>>,
}

/// The ordered request-side interceptor chain.
#[derive(Default)]
pub struct RequestInterceptors {
    handlers: RwLock<Vec<Arc<RequestInterceptor>>>,
}

impl RequestInterceptors {
    /// Registers a transformation step.
    pub fn use_fn<F>(&self, on_fulfilled: F) -> InterceptorHandle
    where
        F: Fn(RequestConfig) -> Result<RequestConfig, ClientError> + Send + Sync + 'static,
    {
        self.push(Some(Box::new(on_fulfilled)), None)
    }

    /// Registers a transformation step together with its recovery step.
    pub fn use_pair<F, R>(&self, on_fulfilled: F, on_rejected: R) -> InterceptorHandle
    where
        F: Fn(RequestConfig) -> Result<RequestConfig, ClientError> + Send + Sync + 'static,
        R: Fn(ClientError) -> Result<RequestConfig, ClientError> + Send + Sync + 'static,
    {
        self.push(Some(Box::new(on_fulfilled)), Some(Box::new(on_rejected)))
    }

    fn push(
        &self,
        on_fulfilled: Option<Box<RequestFulfilled>>,
        on_rejected: Option<Box<RequestRejected>>,
    ) -> InterceptorHandle {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.push(Arc::new(RequestInterceptor {
            on_fulfilled,
            on_rejected,
        }));
        InterceptorHandle(handlers.len() - 1)
    }

    /// Runs the chain over `initial`, feeding each step's output into the
    /// next.
    ///
    /// # Errors
    ///
    /// Returns the first unrecovered step failure.
    pub fn run(&self, initial: RequestConfig) -> Result<RequestConfig, ClientError> {
        let snapshot: Vec<Arc<RequestInterceptor>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut current = initial;
        for handler in snapshot {
            let Some(on_fulfilled) = &handler.on_fulfilled else {
                continue;
            };
            current = match on_fulfilled(current) {
                Ok(next) => next,
                Err(error) => match &handler.on_rejected {
                    Some(on_rejected) => on_rejected(error)?,
                    None => return Err(error),
                },
            };
        }
        Ok(current)
    }

    /// Returns the number of registered interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no interceptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct ResponseInterceptor {
    on_fulfilled: Option<Box<ResponseFulfilled>>,
    on_rejected: Option<Box<ResponseRejected>>,
}

/// The ordered response-side interceptor chain, feeding both the success
/// and the error pipeline.
#[derive(Default)]
pub struct ResponseInterceptors {
    handlers: RwLock<Vec<Arc<ResponseInterceptor>>>,
}

impl ResponseInterceptors {
    /// Registers a success-side transformation step.
    pub fn use_fn<F>(&self, on_fulfilled: F) -> InterceptorHandle
    where
        F: Fn(Response) -> Result<Response, ClientError> + Send + Sync + 'static,
    {
        self.push(Some(Box::new(on_fulfilled)), None)
    }

    /// Registers an error-recovery step without a success-side step.
    pub fn use_rejected<R>(&self, on_rejected: R) -> InterceptorHandle
    where
        R: Fn(ClientError) -> Result<Response, ClientError> + Send + Sync + 'static,
    {
        self.push(None, Some(Box::new(on_rejected)))
    }

    /// Registers a success-side step together with an error-recovery step.
    pub fn use_pair<F, R>(&self, on_fulfilled: F, on_rejected: R) -> InterceptorHandle
    where
        F: Fn(Response) -> Result<Response, ClientError> + Send + Sync + 'static,
        R: Fn(ClientError) -> Result<Response, ClientError> + Send + Sync + 'static,
    {
        self.push(Some(Box::new(on_fulfilled)), Some(Box::new(on_rejected)))
    }

    fn push(
        &self,
        on_fulfilled: Option<Box<ResponseFulfilled>>,
        on_rejected: Option<Box<ResponseRejected>>,
    ) -> InterceptorHandle {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.push(Arc::new(ResponseInterceptor {
            on_fulfilled,
            on_rejected,
        }));
        InterceptorHandle(handlers.len() - 1)
    }

    fn snapshot(&self) -> Vec<Arc<ResponseInterceptor>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Passes a successful response through each `on_fulfilled` in order,
    /// skipping interceptors without one.
    ///
    /// # Errors
    ///
    /// A step failure propagates directly to the caller; the error
    /// pipeline is not consulted.
    pub fn handle_success(&self, response: Response) -> Result<Response, ClientError> {
        let mut current = response;
        for handler in self.snapshot() {
            if let Some(on_fulfilled) = &handler.on_fulfilled {
                current = on_fulfilled(current)?;
            }
        }
        Ok(current)
    }

    /// Offers a failure to each `on_rejected` in order, skipping
    /// interceptors without one.
    ///
    /// The first interceptor that returns a response short-circuits the
    /// chain: that value is a recovered success. An interceptor that
    /// returns an error replaces the current error for the remaining
    /// interceptors.
    ///
    /// # Errors
    ///
    /// Returns the last error seen when no interceptor recovers.
    pub fn handle_error(&self, error: ClientError) -> Result<Response, ClientError> {
        let mut current = error;
        for handler in self.snapshot() {
            if let Some(on_rejected) = &handler.on_rejected {
                match on_rejected(current) {
                    Ok(recovered) => return Ok(recovered),
                    Err(next) => current = next,
                }
            }
        }
        Err(current)
    }

    /// Returns the number of registered interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no interceptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
