use clap::Subcommand;
use respira_core::pattern::{self, PatternDefinition, SoundProfile};
use respira_core::storage::Database;

#[derive(Subcommand)]
pub enum PatternAction {
    /// List presets and custom patterns
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one pattern
    Show { selector: String },
    /// Create a custom pattern (durations in deciseconds)
    Create {
        name: String,
        #[arg(long)]
        inhale: u32,
        #[arg(long, default_value = "0")]
        inhale_hold: u32,
        #[arg(long)]
        exhale: u32,
        #[arg(long, default_value = "0")]
        exhale_hold: u32,
        #[arg(long, default_value = "6")]
        cycles: u32,
        #[arg(long, default_value = "soft-bell")]
        sound_profile: String,
        #[arg(long, default_value = "ocean")]
        theme: String,
    },
    /// Delete a custom pattern
    Delete { id: String },
}

pub fn run(action: PatternAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PatternAction::List { json } => {
            let presets = pattern::presets();
            let customs = db.list_patterns()?;
            if json {
                let all: Vec<_> = presets.iter().chain(customs.iter()).collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                println!("presets:");
                for p in &presets {
                    print_line(p);
                }
                if !customs.is_empty() {
                    println!("custom:");
                    for p in &customs {
                        print_line(p);
                    }
                }
            }
        }
        PatternAction::Show { selector } => {
            let found = match pattern::find_preset(&selector) {
                Some(preset) => Some(preset),
                None => db.get_pattern(&selector)?,
            };
            match found {
                Some(p) => println!("{}", serde_json::to_string_pretty(&p)?),
                None => return Err(format!("unknown pattern '{selector}'").into()),
            }
        }
        PatternAction::Create {
            name,
            inhale,
            inhale_hold,
            exhale,
            exhale_hold,
            cycles,
            sound_profile,
            theme,
        } => {
            let sound_profile: SoundProfile = sound_profile.parse()?;
            let pattern = PatternDefinition::custom(
                name,
                inhale,
                inhale_hold,
                exhale,
                exhale_hold,
                cycles,
                sound_profile,
                theme,
            );
            pattern.validate()?;
            db.save_pattern(&pattern)?;
            println!("Created pattern '{}' ({})", pattern.name, pattern.id);
        }
        PatternAction::Delete { id } => {
            if db.delete_pattern(&id)? {
                println!("Deleted pattern {id}");
            } else {
                return Err(format!("no custom pattern with id '{id}'").into());
            }
        }
    }
    Ok(())
}

fn print_line(p: &PatternDefinition) {
    println!(
        "  {:<16} {:<20} {}-{}-{}-{} ds x{} cycles [{}]",
        p.id,
        p.name,
        p.inhale_ds,
        p.inhale_hold_ds,
        p.exhale_ds,
        p.exhale_hold_ds,
        p.cycles,
        p.sound_profile.as_str(),
    );
}
