use clap::Subcommand;
use respira_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as TOML
    Show,
    /// Set a value: user, default_pattern, sound.muted, session.tick_rate_hz
    Set { key: String, value: String },
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
