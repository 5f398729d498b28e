use std::{fmt, marker::PhantomData, sync::Arc};

use tracing::{Span, debug, field, instrument};

use crate::{
    config::ClientConfig,
    error::Error,
    method::{MethodName, Params, RemoteMethod, Service},
    transport::{HttpTransport, RpcTransport},
    xmlrpc::{self, RedactedList, Value},
};


/// Hook invoked with every outgoing call before it reaches the transport
pub trait CallObserver: Send + Sync + 'static {
    fn on_call(&self, method: &str, params: &[Value]);
}

/// Logs the method name and the shape of the parameters at debug level.
/// String and binary contents never reach the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_call(&self, method: &str, params: &[Value]) {
        debug!(method, params = %RedactedList(params), "Calling remote method");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {
    fn on_call(&self, _method: &str, _params: &[Value]) {}
}

/// Typed client of one remote service.
///
/// Clones share the underlying transport. Use the
/// [`SignatureClient`](crate::SignatureClient) and
/// [`RegistrationAuthorityClient`](crate::RegistrationAuthorityClient) aliases.
pub struct RpcClient<S> {
    transport: Arc<dyn RpcTransport>,
    observer: Arc<dyn CallObserver>,
    _service: PhantomData<fn() -> S>,
}

impl<S> Clone for RpcClient<S> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            observer: Arc::clone(&self.observer),
            _service: PhantomData,
        }
    }
}

impl<S: Service> fmt::Debug for RpcClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("service", &S::NAME)
            .finish_non_exhaustive()
    }
}

impl<S: Service> RpcClient<S> {
    /// Builds a client talking HTTP to the configured endpoint, using the
    /// service's default path unless the configuration overrides it.
    ///
    /// # Errors
    /// Returns an error if credentials are missing or the endpoint is invalid.
    /// No request is issued.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(&config, S::DEFAULT_PATH)?;
        Ok(Self::with_transport(transport))
    }

    pub fn with_transport<T: RpcTransport>(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Builds a client over a transport that may already serve other clients
    pub fn from_shared(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            observer: Arc::new(TracingObserver),
            _service: PhantomData,
        }
    }

    pub fn with_observer<O: CallObserver>(mut self, observer: O) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Issues a single remote call and decodes its response.
    ///
    /// Parameters are validated locally first; an invalid request never
    /// reaches the transport. Transport failures are returned as they were
    /// reported, without retry.
    #[instrument(skip_all, fields(service = S::NAME, method = field::Empty))]
    pub async fn call<M>(&self, _method: M, params: M::Params) -> Result<M::Response, Error>
    where
        M: RemoteMethod<Service = S>,
    {
        let method = M::METHOD.as_str();
        Span::current().record("method", method);

        params.check()?;
        let encoded =
            M::encode_params(&params).map_err(|source| Error::Encode { method, source })?;
        let value = self.dispatch(M::METHOD, encoded).await?;
        xmlrpc::from_value(value).map_err(|source| Error::Decode { method, source })
    }

    /// Untyped entry point: sends `params` as the positional parameter list of
    /// `method` and returns the raw response value.
    pub async fn dispatch(&self, method: S::Method, params: Vec<Value>) -> Result<Value, Error> {
        let method = method.as_str();
        self.observer.on_call(method, &params);
        self.transport
            .call(method, params)
            .await
            .map_err(|source| Error::Remote { method, source })
    }
}
