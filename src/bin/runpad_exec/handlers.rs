use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use runpad::model::DispatchPayload;

use crate::AppState;
use crate::http_error::{bad_request, forbidden, internal_error, too_many};
use crate::jobs::{self, Job, JobStatus};

/// POST / — run a whitelisted command in the background and answer
/// with a job id.
pub(crate) async fn run_command(
    State(state): State<AppState>,
    payload: Result<Json<DispatchPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rej) => {
            eprintln!("rejected request: {}", rej);
            return bad_request(anyhow::anyhow!(rej.body_text()));
        }
    };

    if !state.allow.contains(&payload.command) {
        eprintln!("command not allowed: {}", payload.command);
        return forbidden("command not allowed");
    }

    if state.max_concurrent > 0 {
        let jobs = state.jobs.read().await;
        let running = jobs
            .values()
            .filter(|j| matches!(j.status, JobStatus::Running))
            .count();
        if running >= state.max_concurrent {
            eprintln!("too many commands running");
            return too_many("too many commands running");
        }
    }

    let job_id = match jobs::new_job_id() {
        Ok(id) => id,
        Err(err) => return internal_error(err),
    };

    {
        let mut jobs = state.jobs.write().await;
        jobs.insert(
            job_id.clone(),
            Job {
                command: payload.clone(),
                started_at: jobs::now_ts(),
                finished_at: None,
                status: JobStatus::Running,
            },
        );
    }

    tokio::spawn(jobs::run_job(state.clone(), job_id.clone(), payload));

    (
        StatusCode::OK,
        Json(serde_json::json!({ "jobId": job_id })),
    )
        .into_response()
}

/// GET /status — snapshot of the in-memory job table.
pub(crate) async fn status(State(state): State<AppState>) -> Response {
    let jobs = state.jobs.read().await;
    Json(serde_json::json!({ "RunningCommands": &*jobs })).into_response()
}

pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "../../tests/bin/runpad_exec/handlers_tests.rs"]
mod tests;
