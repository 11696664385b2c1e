//! Interceptores de request/response para el transporte HTTP.
//!
//! Permiten inyectar headers (auth, tracing) o inspeccionar respuestas sin
//! que la capa de cache conozca nada del transporte.

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{RequestBuilder, Response};
use vortex_core::{KvError, Result};

/// Header usado por Consul para el token ACL.
pub const CONSUL_TOKEN_HEADER: &str = "x-consul-token";

/// Hook aplicado a cada request saliente y a cada respuesta recibida.
///
/// Los interceptores se ejecutan en el orden en que fueron registrados.
pub trait Interceptor: Send + Sync {
    /// Modifica la request antes de enviarla.
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder;

    /// Observa la respuesta antes de interpretarla. No-op por defecto.
    fn on_response(&self, _response: &Response) {}
}

/// Interceptor que agrega un header fijo a cada request.
#[derive(Debug, Clone)]
pub struct HeaderInterceptor {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderInterceptor {
    /// Crea el interceptor validando nombre y valor del header.
    pub fn new(name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| KvError::invalid_config(format!("invalid header name '{name}': {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| KvError::invalid_config(format!("invalid header value: {e}")))?;
        value.set_sensitive(true);

        Ok(Self { name, value })
    }

    /// Interceptor para el token ACL de Consul.
    pub fn consul_token(token: &str) -> Result<Self> {
        Self::new(CONSUL_TOKEN_HEADER, token)
    }

    /// Retorna el nombre del header.
    pub fn name(&self) -> &HeaderName {
        &self.name
    }
}

impl Interceptor for HeaderInterceptor {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(self.name.clone(), self.value.clone())
    }
}
