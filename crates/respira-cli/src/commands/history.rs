use clap::Args;
use respira_core::storage::{Config, Database};

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(long, default_value = "20")]
    pub limit: u32,
    #[arg(long, default_value = "0")]
    pub offset: u32,
    /// Print records as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;

    let (sessions, total) = db.history(&config.user, args.limit, args.offset)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    for record in &sessions {
        println!(
            "{}  {:<20} {:>5}s  {} cycles",
            record.completed_at.format("%Y-%m-%d %H:%M"),
            record.pattern_name,
            record.duration_seconds,
            record.cycles_completed,
        );
    }
    println!("showing {} of {total}", sessions.len());
    Ok(())
}
