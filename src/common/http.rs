use anyhow::Result;
use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use http_body_util::Full;
use hyper::{Request, Response};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;

use crate::common::compression::{decompress_body, detect_encodings, normalize_decompressed_headers};
use crate::common::error::DavError;

/// Type alias for the Hyper client behind [`HyperTransport`].
pub type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Build a Hyper client configured with HTTP/2, connection pooling, and a TLS connector
/// that prefers native roots but falls back to the bundled WebPKI store.
pub fn build_hyper_client() -> Result<HyperClient> {
    let https_builder = HttpsConnectorBuilder::new()
        .with_native_roots()
        .unwrap_or_else(|err| {
            tracing::debug!("falling back to webpki roots (native roots unavailable: {err})");
            HttpsConnectorBuilder::new().with_webpki_roots()
        });

    let https = https_builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Ok(Client::builder(TokioExecutor::new())
        .http2_adaptive_window(true)
        .pool_max_idle_per_host(32)
        .build::<_, Full<Bytes>>(https))
}

/// One request/response exchange with a fully aggregated body.
///
/// The client handle only talks to the network through this trait, so tests can
/// swap in an in-memory server.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>>;
}

/// Production transport: pooled hyper client with automatic response decompression.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl HyperTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_hyper_client()?,
        })
    }
}

impl HttpTransport for HyperTransport {
    fn execute(&self, request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>> {
        async move {
            let url = request.uri().to_string();
            let (parts, body) = request.into_parts();
            let req = Request::from_parts(parts, Full::new(body));

            let resp = self.client.request(req).await.map_err(|err| {
                if err.is_connect() {
                    anyhow::Error::new(DavError::Connection {
                        url: url.clone(),
                        reason: err.to_string(),
                    })
                } else {
                    anyhow::Error::new(err)
                }
            })?;

            let encodings = detect_encodings(resp.headers());
            let (mut parts, body) = resp.into_parts();
            let decompressed = decompress_body(body, &encodings).await?;
            normalize_decompressed_headers(&mut parts.headers, &encodings, decompressed.len());

            Ok(Response::from_parts(parts, decompressed))
        }
        .boxed()
    }
}
