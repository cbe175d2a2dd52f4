//! Run the default adapter set against a topic and print the report as JSON.
//!
//! ```text
//! cargo run -p temperature --example basic_report -- "rust programming language"
//! ```

use temperature::{Pipeline, RunOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let topic = std::env::args().nth(1).unwrap_or_else(|| "rust".to_string());

    let pipeline = Pipeline::with_default_sources()?;
    let options = RunOptions::new(topic, 30).premium(false);
    let outcome = pipeline.run(&options).await;

    println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    if !outcome.skipped.is_empty() {
        eprintln!("skipped sources: {:?}", outcome.skipped);
    }

    Ok(())
}
