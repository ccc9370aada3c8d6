//! Example queueing every URL given on the command line (or on stdin, one per
//! line) and drawing one progress row per task.
//!
//! ```text
//! RUST_LOG=fetchpool=debug cargo run --example console -- https://httpbin.org/bytes/65536
//! ```

use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use fetchpool::progress::{channel, format_percent, StyleOptions, TaskBoard};
use fetchpool::{RunnerBuilder, Task};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                urls.push(line.to_string());
            }
        }
    }
    if urls.is_empty() {
        eprintln!("usage: console <url>...");
        return Ok(());
    }

    let (reporter, mut feed) = channel();
    let runner = RunnerBuilder::new()
        .directory(PathBuf::from("downloads"))
        .workers(5)
        .build(reporter)?;

    let mut board = TaskBoard::new(StyleOptions::default());
    let tasks: Vec<Task> = urls
        .into_iter()
        .map(|url| {
            let task = runner.submit(url);
            board.add(&task);
            task
        })
        .collect();

    while !board.all_finished() {
        match feed.recv().await {
            Some(event) => board.apply(&event),
            None => break,
        }
    }
    runner.shutdown().await;
    board.finish();

    // Print summary
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Id", "File", "Status", "Progress"]);
    for task in &tasks {
        let status = board.status(task.id()).unwrap_or(task.status());
        let progress = board.progress(task.id()).unwrap_or(task.progress());
        table.add_row(vec![
            task.id().to_string(),
            task.filename().to_string(),
            status.to_string(),
            format_percent(progress),
        ]);
    }
    println!("{table}");

    Ok(())
}
