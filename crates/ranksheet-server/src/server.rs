use crate::config::ServerConfig;
use anyhow::Result;
use chrono::Utc;
use ranksheet_core::engine::RankEngine;
use ranksheet_core::errors::{RankError, RecordError};
use ranksheet_core::gate::{self, PendingStore};
use ranksheet_core::model::{RankQuery, Submission};
use ranksheet_core::notify::{LogNotifier, Notifier};
use ranksheet_core::recorder::ScoreRecorder;
use ranksheet_core::storage::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static RID: AtomicU64 = AtomicU64::new(1);

fn next_rid() -> String {
    let n = RID.fetch_add(1, Ordering::Relaxed);
    format!("r-{n:06}")
}

#[derive(Debug, Deserialize)]
struct Request {
    op: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    id: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Response {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResponseError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ResponseError {
    code: String,
    message: String,
}

impl Response {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
            id,
        }
    }

    fn error(id: Option<Value>, code: &str, message: String) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ResponseError {
                code: code.to_string(),
                message,
            }),
            id,
        }
    }
}

pub struct Server;

impl Server {
    pub fn run(db: PathBuf, cfg: ServerConfig) -> Result<()> {
        if let Some(dir) = db.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let store = Store::open(&db)?;
        store.init_schema()?;

        let recorder = ScoreRecorder::new(store.clone());
        let engine = RankEngine::new(store.clone());
        let pending = PendingStore::new(Duration::from_secs(cfg.cooldown_secs));
        let notifier = LogNotifier;

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            let rid = next_rid();

            if line.len() > cfg.max_msg_bytes {
                tracing::warn!(
                    event = "limit_exceeded",
                    rid = %rid,
                    bytes_in = line.len(),
                    max = cfg.max_msg_bytes
                );
                let resp = Response::error(
                    None,
                    "E_LIMIT_EXCEEDED",
                    format!("message bytes={} > max={}", line.len(), cfg.max_msg_bytes),
                );
                writeln!(stdout, "{}", serde_json::to_string(&resp)?)?;
                stdout.flush()?;
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            let req: Request = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(event = "json_parse_error", rid = %rid, error = %e);
                    continue; // malformed lines never kill the loop
                }
            };

            let start = std::time::Instant::now();
            tracing::info!(event = "request_start", rid = %rid, op = %req.op, bytes_in = line.len());

            let resp = match req.op.as_str() {
                "submit" => handle_submit(&recorder, &pending, &notifier, req.id, &req.params),
                "rank" => handle_rank(
                    &engine,
                    &store,
                    &pending,
                    cfg.cooldown_secs,
                    req.id,
                    &req.params,
                ),
                "stats" => handle_stats(&store, req.id),
                other => Response::error(req.id, "E_UNKNOWN_OP", format!("unknown op: {}", other)),
            };

            tracing::info!(
                event = "request_done",
                rid = %rid,
                duration_ms = start.elapsed().as_millis() as u64,
                ok = resp.ok
            );

            writeln!(stdout, "{}", serde_json::to_string(&resp)?)?;
            stdout.flush()?;
        }

        Ok(())
    }
}

fn handle_submit(
    recorder: &ScoreRecorder,
    pending: &PendingStore,
    notifier: &dyn Notifier,
    id: Option<Value>,
    params: &Value,
) -> Response {
    let submission: Submission = match serde_json::from_value(params.clone()) {
        Ok(s) => s,
        Err(e) => {
            return Response::error(id, "E_BAD_PARAMS", format!("invalid submit params: {}", e))
        }
    };

    match recorder.record(&submission) {
        Ok(ack) => {
            pending.note_submission(&submission.identity.email);
            // Best-effort; delivery failures never fail the submit.
            if let Err(e) = notifier.notify(
                &submission.identity,
                &serde_json::json!({ "event": "score_recorded", "raw_score": ack.raw_score }),
            ) {
                tracing::warn!(event = "notify_failed", error = %e);
            }
            Response::ok(id, serde_json::to_value(&ack).unwrap_or(Value::Null))
        }
        Err(RecordError::Invalid(e)) => Response::error(id, "E_VALIDATION", e.to_string()),
        Err(RecordError::Storage(e)) => Response::error(id, "E_STORAGE", format!("{:#}", e)),
    }
}

fn handle_rank(
    engine: &RankEngine,
    store: &Store,
    pending: &PendingStore,
    cooldown_secs: u64,
    id: Option<Value>,
    params: &Value,
) -> Response {
    let query: RankQuery = match serde_json::from_value(params.clone()) {
        Ok(q) => q,
        Err(e) => return Response::error(id, "E_BAD_PARAMS", format!("invalid rank params: {}", e)),
    };

    // In-process throttle first, then the persisted timestamp: the row is
    // the source of truth across restarts.
    if let Some(remaining) = pending.remaining(&query.email) {
        return Response::error(
            id,
            "E_COOLDOWN",
            format!(
                "rank check not yet permitted; try again in {}s",
                remaining.as_secs().max(1)
            ),
        );
    }
    match store.latest_submitted_at(&query.email) {
        Ok(Some(submitted_at)) => {
            if let Err(e) = gate::check_cooldown(&submitted_at, cooldown_secs, Utc::now()) {
                return Response::error(id, "E_COOLDOWN", e.to_string());
            }
        }
        Ok(None) => {}
        Err(e) => return Response::error(id, "E_STORAGE", format!("{:#}", e)),
    }

    match engine.compute_rank(&query) {
        Ok(report) => Response::ok(id, serde_json::to_value(&report).unwrap_or(Value::Null)),
        Err(RankError::Lookup(e)) => Response::error(id, "E_LOOKUP", e.to_string()),
        Err(e @ RankError::Unrankable { .. }) => {
            Response::error(id, "E_UNRANKABLE", e.to_string())
        }
        Err(RankError::Storage(e)) => Response::error(id, "E_STORAGE", format!("{:#}", e)),
    }
}

fn handle_stats(store: &Store, id: Option<Value>) -> Response {
    match store.stats_best_effort() {
        Ok(stats) => Response::ok(id, serde_json::to_value(&stats).unwrap_or(Value::Null)),
        Err(e) => Response::error(id, "E_STORAGE", format!("{:#}", e)),
    }
}
