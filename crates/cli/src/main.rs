mod export;

use export::export_mod;
use jokerforge_codegen::GenerateOptions;
use jokerforge_data::load_project_report;
use std::path::PathBuf;

const USAGE: &str = "usage:
  jokerforge generate <project.json> <out_dir> [--check] [--prefix <prefix>] [--columns <n>]
  jokerforge validate <project.json>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Generate {
        project: PathBuf,
        out_dir: PathBuf,
        check: bool,
        prefix: Option<String>,
        columns: Option<u32>,
    },
    Validate {
        project: PathBuf,
    },
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let mut positional = Vec::new();
    let mut check = std::env::var("JOKERFORGE_CHECK").map(|v| v == "1").unwrap_or(false);
    let mut prefix = None;
    let mut columns = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--check" => check = true,
            "--no-check" => check = false,
            "--prefix" => {
                let value = args.get(idx + 1).ok_or("--prefix needs a value")?;
                prefix = Some(value.clone());
                idx += 1;
            }
            "--columns" => {
                let value = args.get(idx + 1).ok_or("--columns needs a value")?;
                columns = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| format!("--columns expects a number, got {}", value))?,
                );
                idx += 1;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
            value => positional.push(value.to_string()),
        }
        idx += 1;
    }

    match positional.as_slice() {
        [cmd, project, out_dir] if cmd == "generate" => Ok(Command::Generate {
            project: PathBuf::from(project),
            out_dir: PathBuf::from(out_dir),
            check,
            prefix,
            columns,
        }),
        [cmd, project] if cmd == "validate" => Ok(Command::Validate {
            project: PathBuf::from(project),
        }),
        _ => Err(USAGE.to_string()),
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Validate { project } => {
            let report = load_project_report(&project)?;
            for warning in &report.warnings {
                eprintln!("project warning: {}", warning);
            }
            println!(
                "{}: {} jokers, {} consumables, {} boosters, {} enhancements, {} warnings",
                project.display(),
                report.project.jokers.len(),
                report.project.consumables.len(),
                report.project.boosters.len(),
                report.project.enhancements.len(),
                report.warnings.len()
            );
        }
        Command::Generate {
            project,
            out_dir,
            check,
            prefix,
            columns,
        } => {
            let loaded = load_project_report(&project)?;
            for warning in &loaded.warnings {
                eprintln!("project warning: {}", warning);
            }
            let mut options = GenerateOptions::from_metadata(&loaded.project.metadata);
            options.check_syntax = check;
            if let Some(prefix) = prefix {
                options.mod_prefix = prefix;
            }
            if let Some(columns) = columns {
                options.atlas_columns = columns;
            }
            let report = export_mod(&loaded.project, &options, &out_dir)?;
            for warning in &report.warnings {
                eprintln!("generate warning: {}", warning);
            }
            println!("wrote {} files to {}", report.files.len(), out_dir.display());
            for file in &report.files {
                println!("  {}", file);
            }
        }
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };
    if let Err(err) = run(command) {
        eprintln!("export failed: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    macro_rules! usage_case {
        ($name:ident, [$($arg:expr),*]) => {
            #[test]
            fn $name() {
                assert!(parse_command(&args(&[$($arg),*])).is_err());
            }
        };
    }

    usage_case!(no_arguments, []);
    usage_case!(generate_without_out_dir, ["generate", "project.json"]);
    usage_case!(unknown_command, ["publish", "project.json"]);
    usage_case!(unknown_flag, ["generate", "p.json", "out", "--fast"]);
    usage_case!(columns_not_a_number, ["generate", "p.json", "out", "--columns", "ten"]);
    usage_case!(prefix_without_value, ["generate", "p.json", "out", "--prefix"]);

    #[test]
    fn generate_reads_flags_anywhere() {
        let command = parse_command(&args(&[
            "--check",
            "generate",
            "project.json",
            "--prefix",
            "mymod",
            "out",
        ]))
        .expect("parse");
        assert_eq!(
            command,
            Command::Generate {
                project: PathBuf::from("project.json"),
                out_dir: PathBuf::from("out"),
                check: true,
                prefix: Some("mymod".to_string()),
                columns: None,
            }
        );
    }

    #[test]
    fn validate_takes_one_path() {
        assert_eq!(
            parse_command(&args(&["validate", "project.json"])),
            Ok(Command::Validate {
                project: PathBuf::from("project.json")
            })
        );
    }
}
