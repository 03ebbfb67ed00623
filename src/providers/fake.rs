//! Scripted `GraphApi` and log capture used by the loop tests.

use crate::core::credentials::Credential;
use crate::core::error::RequestError;
use crate::providers::GraphApi;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::fmt::MakeWriter;

pub struct ScriptedApi {
    responses: Mutex<VecDeque<Result<Value, RequestError>>>,
    latency: Duration,
    calls: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedApi {
    /// Once the script runs out every call succeeds with `{}`.
    pub fn new(responses: Vec<Result<Value, RequestError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }

    /// Gaps between consecutive request starts.
    pub fn gaps(&self) -> Vec<Duration> {
        self.call_instants()
            .windows(2)
            .map(|w| w[1].duration_since(w[0]))
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphApi for ScriptedApi {
    async fn get(&self, _credential: &Credential) -> Result<Value, RequestError> {
        self.calls.lock().unwrap().push(Instant::now());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next.unwrap_or_else(|| Ok(json!({})))
    }
}

pub fn rate_limited() -> Result<Value, RequestError> {
    status_error(403, Some(r#"{"call_count": 100, "total_cputime": 10}"#))
}

pub fn status_error(status: u16, usage: Option<&str>) -> Result<Value, RequestError> {
    Err(RequestError::Status {
        status,
        usage_header: usage.map(|u| u.as_bytes().to_vec()),
        body: r#"{"error":{"message":"Application request limit reached"}}"#.to_string(),
    })
}

pub fn profile() -> Result<Value, RequestError> {
    Ok(json!({"id": "42", "name": "Ada", "last_name": "Lovelace"}))
}

/// In-memory sink for formatted `tracing` output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_with(&self, needle: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes events on the current thread into a `LogBuffer` until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
