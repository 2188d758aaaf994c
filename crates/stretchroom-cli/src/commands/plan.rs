//! Exercise plan management commands for CLI.

use clap::Subcommand;
use stretchroom_core::{plan, ExerciseConfig, PlanStore, SectionConfig};

use super::resolve_plan;

#[derive(Subcommand)]
pub enum PlanAction {
    /// List saved plans
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a plan as JSON
    Show {
        /// Plan id, name, file path, or "sample"
        plan: String,
    },
    /// Print the timed segments a plan expands to
    Segments {
        /// Plan id, name, file path, or "sample"
        plan: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an empty plan
    New {
        /// Plan name
        name: String,
        /// Start over after the last segment
        #[arg(long)]
        repeat: bool,
    },
    /// Append a section to a saved plan
    AddSection {
        /// Plan id or name
        plan: String,
        /// Section name (read out before the section starts)
        name: String,
        /// Repetitions
        #[arg(long, default_value = "1")]
        reps: u32,
        /// Intro seconds
        #[arg(long, default_value = "5")]
        intro: u32,
        /// Stretch seconds
        #[arg(long, default_value = "30")]
        activity: u32,
        /// Rest seconds between repetitions
        #[arg(long, default_value = "5")]
        transition: u32,
    },
    /// Check that a plan can be run
    Validate {
        /// Plan id, name, file path, or "sample"
        plan: String,
    },
    /// Delete a saved plan
    Delete {
        /// Plan id
        id: String,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PlanStore::open()?;

    match action {
        PlanAction::List { json } => {
            let plans = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else if plans.is_empty() {
                println!("No plans saved. Try 'plan show sample' or 'plan new <name>'.");
            } else {
                for p in &plans {
                    println!(
                        "{}  {}  ({} sections, {}s{})",
                        p.exercise_id,
                        p.exercise_name,
                        p.sections.len(),
                        p.total_duration_secs(),
                        if p.repeat { ", repeats" } else { "" }
                    );
                }
            }
        }
        PlanAction::Show { plan } => {
            let config = resolve_plan(&store, &plan)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        PlanAction::Segments { plan: reference, json } => {
            let config = resolve_plan(&store, &reference)?;
            let segments = plan(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&segments)?);
            } else {
                for (i, s) in segments.iter().enumerate() {
                    println!(
                        "{:>3}  {:<12} {:<20} {:>4}s  {}{}{}",
                        i,
                        format!("{:?}", s.kind()).to_lowercase(),
                        s.name(),
                        s.duration_seconds(),
                        s.position(),
                        if s.is_start_of_segment() { "  [rep start]" } else { "" },
                        if s.is_last() { "  [last]" } else { "" },
                    );
                }
            }
        }
        PlanAction::New { name, repeat } => {
            let mut config = ExerciseConfig::new(name);
            config.repeat = repeat;
            store.save(&config)?;
            println!("Plan created: {}", config.exercise_id);
        }
        PlanAction::AddSection {
            plan,
            name,
            reps,
            intro,
            activity,
            transition,
        } => {
            let mut config = store.find(&plan)?;
            let mut section = SectionConfig::new(name);
            section.rep_count = reps;
            section.intro_duration = intro;
            section.activity_duration = activity;
            section.transition_duration = transition;
            config.sections.push(section);
            store.save(&config)?;
            println!(
                "Section added to {} ({} sections)",
                config.exercise_id,
                config.sections.len()
            );
        }
        PlanAction::Validate { plan } => {
            let config = resolve_plan(&store, &plan)?;
            config.validate()?;
            println!("ok");
        }
        PlanAction::Delete { id } => {
            store.delete(&id)?;
            println!("Plan deleted: {id}");
        }
    }
    Ok(())
}
