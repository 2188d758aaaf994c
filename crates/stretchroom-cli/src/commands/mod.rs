pub mod config;
pub mod plan;
pub mod run;

use std::path::Path;

use stretchroom_core::storage::load_file;
use stretchroom_core::{sample_plan, ExerciseConfig, PlanStore};

/// Resolve a plan reference: a file path, a stored id or name, or "sample".
pub fn resolve_plan(
    store: &PlanStore,
    reference: &str,
) -> Result<ExerciseConfig, Box<dyn std::error::Error>> {
    let path = Path::new(reference);
    if path.is_file() {
        return Ok(load_file(path)?);
    }
    match store.find(reference) {
        Ok(plan) => Ok(plan),
        Err(_) if reference == "sample" => Ok(sample_plan()),
        Err(e) => Err(e.into()),
    }
}
