use anyhow::Context;
use jokerforge_codegen::{build_mod, GenerateOptions};
use jokerforge_core::ModProject;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct ExportReport {
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

/// Generates the mod and writes every file under `out_dir`, creating the
/// item folders as needed.
pub fn export_mod(
    project: &ModProject,
    options: &GenerateOptions,
    out_dir: &Path,
) -> anyhow::Result<ExportReport> {
    let generated = build_mod(project, options)?;
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let mut report = ExportReport {
        warnings: generated.warnings,
        ..ExportReport::default()
    };
    for (name, text) in &generated.files {
        let path = out_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        report.files.push(name.clone());
    }
    Ok(report)
}
