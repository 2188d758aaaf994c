//! Interactive timer session on the terminal.
//!
//! Keys (followed by Enter): `s` start/resume, `p` pause, `r` restart the
//! current repetition, `q` quit. Closing stdin quits as well.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use stretchroom_core::session;
use stretchroom_core::{
    Config, Effect, EngineSettings, Event, ExerciseConfig, PlanStore, Snapshot, SoundEffect,
    SoundPlayer, SystemClock,
};

use super::resolve_plan;

#[derive(Args)]
pub struct RunArgs {
    /// Plan id, name, or file path (defaults to config `default_plan`, then "sample")
    pub plan: Option<String>,
    /// Start immediately instead of waiting for `s`
    #[arg(long)]
    pub start: bool,
    /// Print every effect as a JSON line instead of a status display
    #[arg(long)]
    pub json: bool,
}

/// Rings the terminal bell for countdown pings and prints spoken text.
struct TerminalPlayer {
    quiet: bool,
}

impl SoundPlayer for TerminalPlayer {
    fn play(&mut self, effect: SoundEffect) {
        debug!(?effect, "play sound");
        if !self.quiet && effect == SoundEffect::CountdownBeep {
            eprint!("\x07");
        }
    }

    fn announce(&mut self, text: &str) {
        if !self.quiet {
            eprintln!(">> {text}");
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = PlanStore::open()?;
    let reference = args
        .plan
        .clone()
        .or_else(|| config.default_plan.clone())
        .unwrap_or_else(|| "sample".to_string());
    let exercise = resolve_plan(&store, &reference)?;
    exercise.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(exercise, config.engine_settings(), args))
}

async fn drive(
    exercise: ExerciseConfig,
    settings: EngineSettings,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let player = TerminalPlayer { quiet: args.json };
    let (handle, mut effects) = session::spawn(&exercise, settings, Arc::new(SystemClock), player)?;

    if !args.json {
        println!(
            "{} ({}s). Keys: s=start p=pause r=restart q=quit",
            exercise.exercise_name,
            exercise.total_duration_secs()
        );
    }
    if args.start {
        handle.send(Event::Start);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            effect = effects.recv() => {
                let Some(effect) = effect else { break };
                let terminal = effect.is_terminal();
                print_effect(&effect, args.json)?;
                if terminal {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match parse_key(line.trim()) {
                        Some(event) => {
                            handle.send(event);
                        }
                        None if line.trim().is_empty() => {}
                        None => eprintln!("unknown key: {} (s, p, r, q)", line.trim()),
                    },
                    // End of input quits.
                    None => {
                        stdin_open = false;
                        handle.send(Event::BackPressed);
                    }
                }
            }
            _ = ticker.tick(), if !args.json => {
                if let Some(snapshot) = handle.snapshot().await {
                    if snapshot.has_started && !snapshot.paused {
                        println!("{}", status_line(&snapshot));
                    }
                }
            }
        }
    }

    handle.finished().await;
    Ok(())
}

fn parse_key(key: &str) -> Option<Event> {
    match key {
        "s" | "start" => Some(Event::Start),
        "p" | "pause" => Some(Event::Pause),
        "r" | "restart" => Some(Event::RestartSegmentPressed),
        "q" | "quit" | "back" => Some(Event::BackPressed),
        _ => None,
    }
}

fn print_effect(effect: &Effect, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(effect)?);
        return Ok(());
    }
    match effect {
        Effect::StateChanged { snapshot } if snapshot.paused => {
            println!("paused: {}", status_line(snapshot));
        }
        Effect::NavigateBack => println!("stopped"),
        Effect::SequenceCompleted => println!("done"),
        _ => {}
    }
    Ok(())
}

fn status_line(s: &Snapshot) -> String {
    let secs = (s.remaining_ms + 999) / 1000;
    let kind = s
        .segment_kind
        .map(|k| format!("{k:?}").to_lowercase())
        .unwrap_or_default();
    format!(
        "[{}/{}] {:<12} {} {} {:02}:{:02}",
        s.index + 1,
        s.total_segments,
        kind,
        s.segment_name,
        s.position,
        secs / 60,
        secs % 60
    )
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}
