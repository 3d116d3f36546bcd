use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::*;

fn state_allowing(cmds: &[&str], max_concurrent: usize) -> AppState {
    AppState {
        allow: Arc::new(cmds.iter().map(|s| s.to_string()).collect::<HashSet<_>>()),
        max_concurrent,
        jobs: Arc::new(RwLock::new(HashMap::new())),
    }
}

fn request(command: &str, args: &[&str]) -> Result<Json<DispatchPayload>, JsonRejection> {
    Ok(Json(DispatchPayload {
        command: command.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
    }))
}

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn disallowed_command_is_refused() {
    let state = state_allowing(&["echo"], 0);
    let resp = run_command(State(state.clone()), request("rm", &["-rf", "/"])).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(state.jobs.read().await.is_empty());
}

#[tokio::test]
async fn concurrency_cap_refuses_overflow() {
    let state = state_allowing(&["echo"], 1);
    state.jobs.write().await.insert(
        "job-0".to_string(),
        Job {
            command: DispatchPayload {
                command: "echo".to_string(),
                args: Vec::new(),
            },
            started_at: jobs::now_ts(),
            finished_at: None,
            status: JobStatus::Running,
        },
    );

    let resp = run_command(State(state), request("echo", &["hi"])).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn finished_jobs_do_not_count_against_the_cap() {
    let state = state_allowing(&["echo"], 1);
    state.jobs.write().await.insert(
        "job-0".to_string(),
        Job {
            command: DispatchPayload {
                command: "echo".to_string(),
                args: Vec::new(),
            },
            started_at: jobs::now_ts(),
            finished_at: Some(jobs::now_ts()),
            status: JobStatus::Done,
        },
    );

    let resp = run_command(State(state), request("echo", &["hi"])).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn accepted_command_returns_job_id_and_registers_job() {
    let state = state_allowing(&["echo"], 0);
    let resp = run_command(State(state.clone()), request("echo", &["hi"])).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let job_id = v["jobId"].as_str().expect("job id").to_string();
    assert_eq!(job_id.len(), 32);
    assert!(state.jobs.read().await.contains_key(&job_id));
}

#[tokio::test]
async fn status_reports_job_table() {
    let state = state_allowing(&["echo"], 0);
    state.jobs.write().await.insert(
        "job-0".to_string(),
        Job {
            command: DispatchPayload {
                command: "echo".to_string(),
                args: vec!["hi".to_string()],
            },
            started_at: jobs::now_ts(),
            finished_at: None,
            status: JobStatus::Running,
        },
    );

    let resp = status(State(state)).await;
    let v = body_json(resp).await;
    assert_eq!(v["RunningCommands"]["job-0"]["status"], "Running");
    assert_eq!(v["RunningCommands"]["job-0"]["command"]["Command"], "echo");
}
