use chrono::Utc;
use respira_core::stats::StreakStatistics;
use respira_core::storage::{Config, Database};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;

    let records = db.list_sessions(&config.user, None)?;
    let stats = StreakStatistics::compute(&records, Utc::now().date_naive());
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
