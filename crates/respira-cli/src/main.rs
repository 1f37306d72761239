use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "respira", version, about = "Guided breathing sessions in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a breathing session
    Breathe(commands::breathe::BreatheArgs),
    /// Pattern management
    Pattern {
        #[command(subcommand)]
        action: commands::pattern::PatternAction,
    },
    /// Habit statistics
    Stats,
    /// Session history
    History(commands::history::HistoryArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Breathe(args) => commands::breathe::run(args),
        Commands::Pattern { action } => commands::pattern::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::History(args) => commands::history::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "respira", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
