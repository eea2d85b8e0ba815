//! `fishbone` command-line tool

mod commands;

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let doc_arg = || {
        Arg::new("doc")
            .long("doc")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Snapshot JSON file")
    };

    Command::new("fishbone")
        .version(fishbone_core::VERSION)
        .about("Build and check fishbone (Ishikawa) diagrams")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("init")
                .about("Create a document holding only the backbone and problem")
                .arg(
                    Arg::new("problem")
                        .long("problem")
                        .required(true)
                        .help("Problem title"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the snapshot"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Apply a command batch and print the change log")
                .arg(doc_arg())
                .arg(
                    Arg::new("commands")
                        .long("commands")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON command batch"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the result here instead of over --doc"),
                ),
        )
        .subcommand(
            Command::new("context")
                .about("Print the content-only projection sent to advisors")
                .arg(doc_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Report structural invariant violations")
                .arg(doc_arg())
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Only set the exit status"),
                ),
        )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    let config = commands::load_config(matches.get_one::<PathBuf>("config"))?;

    match matches.subcommand() {
        Some(("init", args)) => {
            let problem = args.get_one::<String>("problem").map_or("Problem", String::as_str);
            let out = required_path(args, "out")?;
            commands::init(problem, out, config)?;
            println!("wrote {}", out.display());
        }
        Some(("apply", args)) => {
            let doc = required_path(args, "doc")?;
            let batch = required_path(args, "commands")?;
            let out = args.get_one::<PathBuf>("out").unwrap_or(doc);
            let report = commands::apply(doc, batch, out, config)?;
            for line in report.log.lines() {
                println!("{line}");
            }
            for ignored in &report.ignored {
                eprintln!("ignored command #{}: {}", ignored.index, ignored.reason);
            }
        }
        Some(("context", args)) => {
            let doc = required_path(args, "doc")?;
            println!("{}", commands::context(doc, config)?);
        }
        Some(("check", args)) => {
            let doc = required_path(args, "doc")?;
            let violations = commands::check(doc, config)?;
            if !args.get_flag("quiet") {
                for violation in &violations {
                    println!("{violation}");
                }
                if violations.is_empty() {
                    println!("ok");
                }
            }
            if !violations.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        _ => {}
    }
    Ok(ExitCode::SUCCESS)
}

fn required_path<'a>(args: &'a clap::ArgMatches, id: &str) -> anyhow::Result<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
        .ok_or_else(|| anyhow::anyhow!("missing --{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn config_is_global() {
        let matches = cli()
            .try_get_matches_from(["fishbone", "check", "--doc", "d.json", "--config", "c.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("c.toml"))
        );
    }

    #[test]
    fn apply_requires_commands() {
        assert!(cli()
            .try_get_matches_from(["fishbone", "apply", "--doc", "d.json"])
            .is_err());
    }
}
