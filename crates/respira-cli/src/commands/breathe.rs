use std::thread;
use std::time::{Duration, Instant};

use clap::Args;
use respira_core::audio::CueDispatcher;
use respira_core::pattern::{self, PatternDefinition};
use respira_core::session::{DatabaseRecorder, SessionEngine, SessionStatus};
use respira_core::storage::{Config, Database};
use respira_core::Event;

#[derive(Args)]
pub struct BreatheArgs {
    /// Pattern id or name (preset or custom); falls back to the configured
    /// default, then to the first preset
    pub pattern: Option<String>,
    /// Override the pattern's cycle count
    #[arg(long)]
    pub cycles: Option<u32>,
    /// Silence audio cues for this run
    #[arg(long)]
    pub mute: bool,
    /// Print events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BreatheArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;

    let selector = args.pattern.or_else(|| config.default_pattern.clone());
    let mut pattern = resolve_pattern(&db, selector.as_deref())?;
    if let Some(cycles) = args.cycles {
        pattern.cycles = cycles;
    }

    let dispatcher = CueDispatcher::new(args.mute || config.sound.muted);
    let recorder = DatabaseRecorder::new(db, config.user.as_str());
    let mut engine = SessionEngine::new(pattern, dispatcher, Box::new(recorder));

    let started = engine.start()?;
    emit(&started, args.json)?;

    // The engine has no clock of its own; this loop is the tick source.
    let tick = Duration::from_millis(1000 / u64::from(config.session.tick_rate_hz.max(1)));
    let mut last = Instant::now();
    while engine.status() != SessionStatus::Completed {
        thread::sleep(tick);
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f64();
        last = now;
        for event in engine.tick(delta) {
            emit(&event, args.json)?;
        }
    }
    Ok(())
}

fn resolve_pattern(
    db: &Database,
    selector: Option<&str>,
) -> Result<PatternDefinition, Box<dyn std::error::Error>> {
    match selector {
        Some(sel) => {
            if let Some(preset) = pattern::find_preset(sel) {
                return Ok(preset);
            }
            if let Some(custom) = db.get_pattern(sel)? {
                return Ok(custom);
            }
            Err(format!("unknown pattern '{sel}'").into())
        }
        None => pattern::presets()
            .into_iter()
            .next()
            .ok_or_else(|| Box::<dyn std::error::Error>::from("no presets available")),
    }
}

fn emit(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::SessionStarted {
            pattern_name,
            cycle,
            phase,
            phase_secs,
            total_secs,
            ..
        } => {
            println!("Starting '{pattern_name}' ({total_secs:.0}s)");
            println!("  cycle {cycle}: {phase} {phase_secs:.1}s");
        }
        Event::PhaseStarted {
            cycle,
            phase,
            phase_secs,
            ..
        } => println!("  cycle {cycle}: {phase} {phase_secs:.1}s"),
        Event::SessionCompleted { summary, .. } => println!(
            "Session complete: {} cycles in {}s",
            summary.cycles_completed, summary.duration_seconds
        ),
        _ => {}
    }
    Ok(())
}
