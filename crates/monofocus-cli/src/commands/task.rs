use std::path::PathBuf;

use clap::Subcommand;
use monofocus_core::{next_task, rank, Config, Task};
use serde::Serialize;

use super::{print_json, read_json, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Show the task the next session should work on
    Next {
        /// JSON file holding an array of tasks
        #[arg(long)]
        tasks: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List pending tasks in the order they would be picked
    Queue {
        /// JSON file holding an array of tasks
        #[arg(long)]
        tasks: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct QueueEntry<'a> {
    id: &'a str,
    title: &'a str,
    priority_score: u8,
    estimated_minutes: u32,
}

pub fn run(action: TaskAction) -> CliResult {
    match action {
        TaskAction::Next { tasks, json } => {
            let tasks: Vec<Task> = read_json(&tasks)?;
            match next_task(&tasks) {
                Some(task) if json => print_json(task)?,
                Some(task) => println!("{}  {}  (priority {})", task.id, task.title, task.priority_score),
                None if json => println!("null"),
                None => println!("no pending tasks"),
            }
        }
        TaskAction::Queue { tasks, json } => {
            let config = Config::load_or_default();
            let fallback = config.session.default_task_estimate_minutes;
            let tasks: Vec<Task> = read_json(&tasks)?;
            let queue: Vec<QueueEntry> = rank(&tasks)
                .into_iter()
                .map(|t| QueueEntry {
                    id: &t.id,
                    title: &t.title,
                    priority_score: t.priority_score,
                    estimated_minutes: t.estimate_or(fallback),
                })
                .collect();

            if json {
                print_json(&queue)?;
            } else if queue.is_empty() {
                println!("no pending tasks");
            } else {
                for (i, entry) in queue.iter().enumerate() {
                    println!(
                        "{:>3}. [{:>3}] {} ({} min)  {}",
                        i + 1,
                        entry.priority_score,
                        entry.title,
                        entry.estimated_minutes,
                        entry.id
                    );
                }
            }
        }
    }
    Ok(())
}
