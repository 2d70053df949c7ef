use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use monofocus_core::timer::driver;
use monofocus_core::{
    score_breakdown, Config, FocusRuntime, FocusSession, SessionTimer, Task, TaskBoard, TaskStatus,
};
use tokio::sync::mpsc;

use super::{print_json, read_json, write_json, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a focus session on the next task (or a chosen one) until it ends
    Run {
        /// JSON file holding an array of tasks; statuses are written back
        #[arg(long)]
        tasks: PathBuf,
        /// Task to focus on instead of the top-ranked one
        #[arg(long)]
        task_id: Option<String>,
        /// Session length in minutes (defaults to the task estimate)
        #[arg(long)]
        minutes: Option<u32>,
        /// Milliseconds per countdown second
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Self-reported difficulty, 1-10
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        difficulty: Option<u8>,
        /// Write the finished session here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the productivity score breakdown of a finished session
    Score {
        /// JSON file holding one session
        #[arg(long)]
        session: PathBuf,
    },
}

pub fn run(action: SessionAction) -> CliResult {
    match action {
        SessionAction::Run {
            tasks,
            task_id,
            minutes,
            tick_ms,
            difficulty,
            out,
        } => {
            let config = Config::load_or_default();
            let board = TaskBoard::new(read_json::<Vec<Task>>(&tasks)?);
            let task = match &task_id {
                Some(id) => board.get(id).ok_or_else(|| format!("task not found: {id}"))?,
                None => board.next_task().ok_or("no pending tasks")?,
            };
            if !task.status.can_transition_to(&TaskStatus::InProgress) {
                return Err(format!(
                    "task {} cannot start a session while {:?}",
                    task.id, task.status
                )
                .into());
            }

            let timer =
                SessionTimer::with_fallback(task, minutes, config.session.default_duration_minutes);
            let period = tick_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| config.session.tick_interval());

            let rt = tokio::runtime::Runtime::new()?;
            let (session, board) = rt.block_on(run_session(timer, board, period))?;

            let session = match difficulty {
                Some(d) => session.with_difficulty(d)?,
                None => session,
            };

            write_json(&tasks, board.tasks())?;
            if let Some(out) = out {
                write_json(&out, &session)?;
            }
            print_json(&session)?;
        }
        SessionAction::Score { session } => {
            let session: FocusSession = read_json(&session)?;
            print_json(&score_breakdown(&session))?;
        }
    }
    Ok(())
}

/// Drive one session to its end, echoing every event as a JSON line.
async fn run_session(
    timer: SessionTimer,
    board: TaskBoard,
    period: Duration,
) -> CliResult<(FocusSession, TaskBoard)> {
    tracing::debug!(task_id = timer.task_id(), period_ms = period.as_millis() as u64, "running session");
    let mut runtime = FocusRuntime::new(timer, board);
    let started = runtime.start()?;
    println!("{}", serde_json::to_string(&started)?);

    let shared = driver::share(runtime);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = driver::spawn_ticker(shared.clone(), period, Some(tx));

    while let Some(event) = rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    let session = handle.await?.ok_or("session ended without a result")?;
    let board = shared.lock().await.sink().clone();
    Ok((session, board))
}
