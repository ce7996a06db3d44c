use crate::body::RequestBody;
use crate::config::Config;
use crate::error::Error;
use crate::rate::RateLimit;
use base64::Engine; // for STANDARD.encode
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{self, Instant};

/// The verbs the ShipStation API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing call: verb, relative path, and an optional body. The body is
/// only transmitted for POST and PUT; DELETE accepts one for call-site
/// symmetry but sends none.
struct RequestSpec<'a> {
    method: Method,
    path: &'a str,
    body: Option<&'a RequestBody>,
}

/// Rate-limited ShipStation API client.
///
/// All verbs take `&mut self`: one instance serializes its own calls and owns
/// its quota state, so there is no internal locking. Wrap the client in a
/// `tokio::sync::Mutex` to share it across tasks.
pub struct Client {
    http: reqwest::Client,
    api_url: String,
    headers: Vec<(String, Option<String>)>,
    rate: RateLimit,
}

impl Client {
    /// Build a client from the given configuration.
    ///
    /// Computes the Basic authorization token from `key:secret` once; the
    /// credentials are immutable for the client's lifetime and are never
    /// validated (empty strings are accepted).
    pub fn new(config: Config) -> Result<Self, Error> {
        let joined = format!("{}:{}", config.api_key, config.api_secret);
        let token = base64::engine::general_purpose::STANDARD.encode(joined.trim());

        let mut default_headers = reqwest::header::HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::transport(e.to_string(), 0))?,
        );
        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .use_rustls_tls()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::transport(e.to_string(), 0))?;

        let mut client = Self {
            http,
            api_url: config.api_url,
            headers: vec![("Content-Type".into(), Some("application/json".into()))],
            rate: RateLimit::default(),
        };
        client.set_header("Authorization", &format!("Basic {token}"));
        Ok(client)
    }

    /// Build a client from [`Config::from_env`].
    pub fn from_env() -> Result<Self, Error> {
        let config = Config::from_env().map_err(|msg| Error::transport(msg, 0))?;
        Self::new(config)
    }

    /// Insert or overwrite a header (last write wins per name, insertion
    /// order preserved). An empty value suppresses the header: it is dropped
    /// from outgoing requests entirely rather than sent empty.
    pub fn set_header(&mut self, name: &str, value: &str) {
        let stored = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = stored,
            None => self.headers.push((name.to_string(), stored)),
        }
    }

    /// The configured value for `name`, or `None` if unset or suppressed.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// HTTP status of the last exchange (200 before any request, 0 after a
    /// transport failure that produced no response).
    pub fn http_code(&self) -> u16 {
        self.rate.http_code
    }

    /// Current quota state as last reported by the server.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate
    }

    /// GET `path` relative to the base endpoint.
    pub async fn get(&mut self, path: &str) -> Result<Value, Error> {
        self.enforce_rate_limit().await;
        self.request(RequestSpec {
            method: Method::Get,
            path,
            body: None,
        })
        .await
    }

    /// POST `body` to `path`.
    pub async fn post(&mut self, path: &str, body: RequestBody) -> Result<Value, Error> {
        self.enforce_rate_limit().await;
        self.request(RequestSpec {
            method: Method::Post,
            path,
            body: Some(&body),
        })
        .await
    }

    /// PUT `body` to `path`.
    pub async fn put(&mut self, path: &str, body: RequestBody) -> Result<Value, Error> {
        self.enforce_rate_limit().await;
        self.request(RequestSpec {
            method: Method::Put,
            path,
            body: Some(&body),
        })
        .await
    }

    /// DELETE `path`. The body parameter is accepted but never transmitted;
    /// ShipStation DELETE endpoints take no payload.
    pub async fn delete(&mut self, path: &str, body: RequestBody) -> Result<Value, Error> {
        self.enforce_rate_limit().await;
        self.request(RequestSpec {
            method: Method::Delete,
            path,
            body: Some(&body),
        })
        .await
    }

    /// Suspend until the quota window allows another request. No state is
    /// mutated here; dispatch stamps the request time and responses refresh
    /// the window.
    async fn enforce_rate_limit(&self) {
        if let Some(wait) = self.rate.wait_duration(Instant::now()) {
            debug!(
                "rate limit window exhausted, waiting {}s before next request",
                wait.as_secs()
            );
            time::sleep(wait).await;
        }
    }

    async fn request(&mut self, spec: RequestSpec<'_>) -> Result<Value, Error> {
        // Paths are concatenated verbatim; callers pre-encode segments
        // (see `encode_path_segment`).
        let url = format!("{}{}", self.api_url, spec.path);
        let mut req = match spec.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        if matches!(spec.method, Method::Post | Method::Put) {
            let encoded = spec.body.map(RequestBody::encode).unwrap_or_else(|| "{}".into());
            req = req.body(encoded);
        }
        for (name, value) in &self.headers {
            if let Some(value) = value {
                req = req.header(name.as_str(), value.as_str());
            }
        }

        self.rate.record_dispatch(Instant::now());
        let res = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("{} {} transport error: {}", spec.method.as_str(), url, e);
                self.rate.record_transport_failure();
                return Err(Error::transport(e.to_string(), self.rate.http_code));
            }
        };

        let status = res.status().as_u16();
        let headers = res.headers().clone();
        self.rate.record_response(status, &headers);
        let text = match res.text().await {
            Ok(t) => t,
            Err(e) => {
                warn!("{} {} failed reading body: {}", spec.method.as_str(), url, e);
                return Err(Error::transport(e.to_string(), status));
            }
        };
        Ok(decode_json_preserving_big_ints(&text))
    }
}

/// Percent-encode one path segment for use in a relative path. The client
/// never escapes paths itself.
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Largest integer magnitude exactly representable in an f64.
const MAX_SAFE_INT: u64 = (1 << 53) - 1;

/// Decode a response body. Integers beyond the double-precision safe range
/// are preserved as decimal strings instead of being rounded (ShipStation
/// order and shipment ids can exceed 2^53). Malformed or empty bodies decode
/// to `Null`, never an error.
pub fn decode_json_preserving_big_ints(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => stringify_unsafe_ints(v),
        Err(_) => Value::Null,
    }
}

fn stringify_unsafe_ints(value: Value) -> Value {
    match value {
        Value::Number(n) => {
            let unsafe_int = match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => i.unsigned_abs() > MAX_SAFE_INT,
                (None, Some(u)) => u > MAX_SAFE_INT,
                _ => false,
            };
            if unsafe_int {
                Value::String(n.to_string())
            } else {
                Value::Number(n)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(stringify_unsafe_ints).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, stringify_unsafe_ints(v)))
                .collect(),
        ),
        other => other,
    }
}
