use anyhow::Result;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use runpad::model::DispatchPayload;

use crate::AppState;

#[derive(Clone, Debug, Serialize)]
pub(crate) enum JobStatus {
    Running,
    Done,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct Job {
    pub(crate) command: DispatchPayload,
    pub(crate) started_at: String,
    pub(crate) finished_at: Option<String>,
    pub(crate) status: JobStatus,
}

pub(crate) fn now_ts() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Hex-encoded random job id.
pub(crate) fn new_job_id() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(32);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

/// Run one accepted command, streaming its output through the server's
/// own stdout/stderr, then mark the job done.
pub(crate) async fn run_job(state: AppState, job_id: String, payload: DispatchPayload) {
    eprintln!("starting: {} {:?}", payload.command, payload.args);

    let mut child = match Command::new(&payload.command)
        .args(&payload.args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            eprintln!("spawn {}: {}", payload.command, err);
            finish(&state, &job_id).await;
            return;
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let out_task = tokio::spawn(async move {
        if let Some(stdout) = stdout {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{}", line);
            }
        }
    });
    let err_task = tokio::spawn(async move {
        if let Some(stderr) = stderr {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("{}", line);
            }
        }
    });

    let _ = child.wait().await;
    let _ = out_task.await;
    let _ = err_task.await;

    finish(&state, &job_id).await;
    eprintln!("finished: {} {:?}", payload.command, payload.args);
}

async fn finish(state: &AppState, job_id: &str) {
    let mut jobs = state.jobs.write().await;
    if let Some(job) = jobs.get_mut(job_id) {
        job.status = JobStatus::Done;
        job.finished_at = Some(now_ts());
    }
}
