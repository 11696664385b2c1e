//! HTTP transport for Consul-style KV APIs.

mod client;
mod config;
mod interceptor;

pub use client::HttpKvStore;
pub use config::{HttpStoreConfig, HttpStoreConfigBuilder};
pub use interceptor::{CONSUL_TOKEN_HEADER, HeaderInterceptor, Interceptor};
