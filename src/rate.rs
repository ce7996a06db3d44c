use reqwest::header::HeaderMap;
use std::time::Duration;
use tokio::time::Instant;

/// Per-minute quota advertised by ShipStation for a fresh client.
pub const DEFAULT_REMAINING: i64 = 40;

/// Quota state for one client instance, refreshed from the rate headers of
/// each response. Never persisted across restarts.
#[derive(Debug, Clone)]
pub struct RateLimit {
    /// Requests left in the current window, as last reported by the server.
    pub remaining: i64,
    /// Seconds until the window resets, as last reported.
    pub reset_secs: u64,
    /// When the last request was dispatched, if any.
    pub last_request_at: Option<Instant>,
    /// Status code of the last exchange; 0 if it produced no response.
    pub http_code: u16,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            remaining: DEFAULT_REMAINING,
            reset_secs: 0,
            last_request_at: None,
            http_code: 200,
        }
    }
}

impl RateLimit {
    /// How long the next dispatch must wait, if at all.
    ///
    /// With quota left the call proceeds immediately. With the window
    /// exhausted, the wait is the reported reset interval minus the whole
    /// seconds elapsed since the last dispatch; once that interval has fully
    /// passed, or when no request was ever dispatched, there is no wait.
    pub fn wait_duration(&self, now: Instant) -> Option<Duration> {
        if self.remaining > 0 {
            return None;
        }
        let last = self.last_request_at?;
        let elapsed = now.saturating_duration_since(last).as_secs();
        if elapsed > self.reset_secs {
            None
        } else {
            Some(Duration::from_secs(self.reset_secs - elapsed))
        }
    }

    /// Stamp the dispatch time of an outgoing request.
    pub fn record_dispatch(&mut self, now: Instant) {
        self.last_request_at = Some(now);
    }

    /// Fold a completed exchange into the state: capture the status and
    /// refresh the quota from `X-Rate-Limit-Remaining`/`X-Rate-Limit-Reset`
    /// when the server sent them, otherwise count the request against the
    /// current window.
    pub fn record_response(&mut self, status: u16, headers: &HeaderMap) {
        self.http_code = status;
        let (remaining, reset_secs) = extract_rate_headers(headers);
        match (remaining, reset_secs) {
            (None, None) => self.remaining = (self.remaining - 1).max(0),
            (remaining, reset_secs) => {
                if let Some(r) = remaining {
                    self.remaining = r;
                }
                if let Some(s) = reset_secs {
                    self.reset_secs = s;
                }
            }
        }
    }

    /// A transport failure produced no response; curl-compatible code 0.
    pub fn record_transport_failure(&mut self) {
        self.http_code = 0;
    }
}

/// Pull the quota headers ShipStation attaches to every response.
pub fn extract_rate_headers(headers: &HeaderMap) -> (Option<i64>, Option<u64>) {
    let remaining = headers
        .get("x-rate-limit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok());
    let reset_secs = headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());
    (remaining, reset_secs)
}
