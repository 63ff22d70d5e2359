use crate::validate::validate_project;
use anyhow::{bail, Context};
use jokerforge_core::{ModProject, RuleOwner};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// A loaded project and everything worth telling the user about it.
#[derive(Debug)]
pub struct ProjectReport {
    pub project: ModProject,
    pub warnings: Vec<String>,
}

pub fn load_project(path: &Path) -> anyhow::Result<ModProject> {
    let mut project: ModProject = load_json(path)?;
    assign_keys(&mut project);
    Ok(project)
}

/// Loads a project and runs the validation pass over it.
pub fn load_project_report(path: &Path) -> anyhow::Result<ProjectReport> {
    let project = load_project(path)?;
    if project.metadata.prefix.trim().is_empty() {
        bail!("{}: metadata.prefix cannot be empty", path.display());
    }
    let warnings = validate_project(&project);
    Ok(ProjectReport { project, warnings })
}

pub fn parse_project(raw: &str) -> anyhow::Result<ModProject> {
    let mut project: ModProject = serde_json::from_str(raw).context("parse project")?;
    assign_keys(&mut project);
    Ok(project)
}

/// Writes resolved keys and ids back into every item, so keys left empty
/// in the file become the slug of the item name.
pub fn assign_keys(project: &mut ModProject) {
    for joker in &mut project.jokers {
        joker.key = joker.key();
        if joker.id.trim().is_empty() {
            joker.id = joker.key.clone();
        }
    }
    for consumable in &mut project.consumables {
        consumable.key = consumable.key();
        if consumable.id.trim().is_empty() {
            consumable.id = consumable.key.clone();
        }
    }
    for booster in &mut project.boosters {
        booster.key = booster.key();
        if booster.id.trim().is_empty() {
            booster.id = booster.key.clone();
        }
    }
    for enhancement in &mut project.enhancements {
        enhancement.key = enhancement.key();
        if enhancement.id.trim().is_empty() {
            enhancement.id = enhancement.key.clone();
        }
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
