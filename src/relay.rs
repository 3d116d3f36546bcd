//! One-way channel between the panel (UI context) and the background
//! worker that talks to the executor.
//!
//! Delivery contract: at-most-once, fire-and-forget. There is no
//! response path, no acknowledgment, and no ordering guarantee between
//! distinct messages. The worker is idempotent per message: each
//! dispatch intent independently triggers one outbound call, with no
//! deduplication and no retry. The UI cannot learn whether a dispatched
//! command ever reached the executor.

use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::model::DispatchPayload;

pub const DEFAULT_EXECUTOR_URL: &str = "http://localhost:8090";

/// Messages the background worker understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayMessage {
    /// Lifecycle notice: the panel became visible. The worker's only
    /// reaction is a log line; a lost notice is inconsequential.
    PanelMounted,
    /// Dispatch intent: perform one outbound call with this payload.
    RunCommand(DispatchPayload),
}

/// Serialize a message into its wire envelope.
pub fn to_envelope(msg: &RelayMessage) -> Value {
    match msg {
        RelayMessage::PanelMounted => json!({ "popupMounted": true }),
        RelayMessage::RunCommand(payload) => json!({
            "message": "runCommand",
            "data": payload,
        }),
    }
}

/// Validate an envelope at the receiving boundary. Unknown or
/// malformed shapes yield `None` and are logged and dropped by the
/// receiver instead of being mis-accessed.
pub fn parse_envelope(value: &Value) -> Option<RelayMessage> {
    if value.get("popupMounted").and_then(Value::as_bool) == Some(true) {
        return Some(RelayMessage::PanelMounted);
    }
    if value.get("message").and_then(Value::as_str) == Some("runCommand") {
        let payload: DispatchPayload =
            serde_json::from_value(value.get("data")?.clone()).ok()?;
        return Some(RelayMessage::RunCommand(payload));
    }
    None
}

/// UI-side sending half. Sends are fire-and-forget: once the worker is
/// gone, envelopes are silently discarded.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<Value>,
}

impl RelayHandle {
    pub fn notify_mounted(&self) {
        self.send(to_envelope(&RelayMessage::PanelMounted));
    }

    pub fn run_command(&self, payload: DispatchPayload) {
        self.send(to_envelope(&RelayMessage::RunCommand(payload)));
    }

    /// Post a raw envelope. Validation happens on the receiving side.
    pub fn send(&self, envelope: Value) {
        let _ = self.tx.send(envelope);
    }
}

/// Create the channel endpoints without a worker. The caller owns the
/// receiving half; useful when the consuming side is not the stock
/// worker loop.
pub fn channel() -> (RelayHandle, mpsc::Receiver<Value>) {
    let (tx, rx) = mpsc::channel();
    (RelayHandle { tx }, rx)
}

/// Start the background worker and return its sending half. The worker
/// ends once every handle is dropped.
pub fn spawn(executor_url: String) -> RelayHandle {
    let (handle, rx) = channel();
    thread::spawn(move || worker(rx, &executor_url));
    handle
}

fn worker(rx: mpsc::Receiver<Value>, executor_url: &str) {
    let client = reqwest::blocking::Client::new();
    for envelope in rx {
        match parse_envelope(&envelope) {
            Some(RelayMessage::PanelMounted) => {
                eprintln!("relay: panel mounted");
            }
            Some(RelayMessage::RunCommand(payload)) => {
                match post_command(&client, executor_url, &payload) {
                    Ok(reply) => eprintln!("relay: executor replied: {}", reply),
                    Err(err) => eprintln!("relay: dispatch failed: {:#}", err),
                }
            }
            None => {
                eprintln!("relay: dropped unrecognized message: {}", envelope);
            }
        }
    }
}

/// One outbound call: POST the payload as JSON, read the reply back as
/// JSON. The reply carries no schema; it is only ever re-logged.
pub fn post_command(
    client: &reqwest::blocking::Client,
    executor_url: &str,
    payload: &DispatchPayload,
) -> Result<Value> {
    let resp = client
        .post(executor_url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .json(payload)
        .send()
        .with_context(|| format!("POST {}", executor_url))?;
    let resp = resp.error_for_status().context("executor status")?;
    resp.json::<Value>().context("parse executor reply")
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
