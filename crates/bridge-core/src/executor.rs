//! Bounded HTTP request execution.
//!
//! The executor consults the allowlist before any network activity, then
//! runs the whole connect+send+receive under a single timeout budget with a
//! fixed redirect cap and a streaming response-size cap. Clients are built
//! once per `(verify_tls, follow_redirects)` combination so connection
//! pooling is preserved and the execution path holds no locks of its own.

use std::collections::HashMap;
use std::time::Instant;

use futures::StreamExt;
use reqwest::{redirect, Client};
use tracing::{error, info};

use crate::allowlist::Allowlist;
use crate::error::{FetchError, FetchResult};
use crate::limits::{MAX_REDIRECTS, MAX_RESPONSE_BYTES};
use crate::outcome::{FetchOutcome, RawResponse};
use crate::request::FetchRequest;

/// Executes validated requests against allowlisted hosts.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    allowlist: Allowlist,
    clients: ClientMatrix,
}

/// One pre-built client per `(verify_tls, follow_redirects)` combination.
#[derive(Debug, Clone)]
struct ClientMatrix {
    verified_following: Client,
    verified_direct: Client,
    unverified_following: Client,
    unverified_direct: Client,
}

fn build_client(verify_tls: bool, follow_redirects: bool) -> FetchResult<Client> {
    let policy = if follow_redirects {
        redirect::Policy::limited(MAX_REDIRECTS)
    } else {
        redirect::Policy::none()
    };

    Client::builder()
        .user_agent(concat!("http-bridge/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(!verify_tls)
        .redirect(policy)
        .build()
        .map_err(|e| FetchError::Unexpected {
            message: format!("Failed to build HTTP client: {e}"),
        })
}

impl HttpExecutor {
    /// Build an executor over the given allowlist.
    pub fn new(allowlist: Allowlist) -> FetchResult<Self> {
        Ok(Self {
            allowlist,
            clients: ClientMatrix {
                verified_following: build_client(true, true)?,
                verified_direct: build_client(true, false)?,
                unverified_following: build_client(false, true)?,
                unverified_direct: build_client(false, false)?,
            },
        })
    }

    /// The allowlist this executor admits hosts against.
    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    fn client_for(&self, request: &FetchRequest) -> &Client {
        match (request.verify_tls(), request.follow_redirects()) {
            (true, true) => &self.clients.verified_following,
            (true, false) => &self.clients.verified_direct,
            (false, true) => &self.clients.unverified_following,
            (false, false) => &self.clients.unverified_direct,
        }
    }

    /// Execute a validated request, producing exactly one outcome.
    ///
    /// A denied host short-circuits without opening a connection. A timed-out
    /// call always yields the timeout failure, never a partial success.
    pub async fn execute(&self, request: &FetchRequest) -> FetchOutcome {
        if !self.allowlist.permits_url(request.url()) {
            return FetchError::DomainDenied {
                hostname: request.host().to_string(),
            }
            .into();
        }

        info!("Making {} request to {}", request.method(), request.url());

        let result = tokio::time::timeout(request.timeout(), self.run(request))
            .await
            .unwrap_or(Err(FetchError::Timeout {
                seconds: request.timeout_secs(),
            }));

        match result {
            Ok(raw) => {
                info!("Request successful: {} ({} bytes)", raw.status, raw.body.len());
                FetchOutcome::from_response(raw)
            }
            Err(err) => {
                error!("{err}");
                FetchOutcome::from_error(&err)
            }
        }
    }

    /// The network call proper, within the timeout budget.
    async fn run(&self, request: &FetchRequest) -> FetchResult<RawResponse> {
        let timeout_secs = request.timeout_secs();
        let mut builder = self
            .client_for(request)
            .request(request.method().into(), request.url().clone())
            .timeout(request.timeout());

        if let Some(headers) = request.headers() {
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.as_bytes().to_vec());
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, timeout_secs))?;

        // Declared size above the cap fails before reading a single byte.
        if let Some(declared) = response.content_length() {
            if declared as usize > MAX_RESPONSE_BYTES {
                return Err(FetchError::ResponseTooLarge {
                    limit: MAX_RESPONSE_BYTES,
                    observed: declared as usize,
                });
            }
        }

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let mut body: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::from_transport(e, timeout_secs))?;
            if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
                return Err(FetchError::ResponseTooLarge {
                    limit: MAX_RESPONSE_BYTES,
                    observed: body.len() + chunk.len(),
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            status,
            headers,
            body,
            final_url,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}
