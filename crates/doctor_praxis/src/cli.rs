use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::check::{CheckArgs, run_check};
use crate::config::DoctorConfig;
use crate::error::Result;
use crate::keys::{KeysArgs, run_keys};
use crate::logging;
use crate::report::{ReportArgs, run_report};
use crate::resolve::{ResolveArgs, run_resolve};

#[derive(Debug, Parser)]
#[command(
    name = "doctor_praxis",
    about = "Localization completeness checks and fallback diagnostics for the practice website",
    version
)]
pub struct Cli {
    /// Config file; defaults to `praxis-i18n.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise the default log level to debug.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare a locale against the reference and grade coverage.
    Check(CheckArgs),

    /// Render a saved report JSON as HTML.
    Report(ReportArgs),

    /// Resolve one key path through the fallback chain.
    Resolve(ResolveArgs),

    /// List every leaf key path of a locale file.
    Keys(KeysArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check(args) => run_check(args, DoctorConfig::load(cli.config.as_deref())?),
        Commands::Report(args) => run_report(args),
        Commands::Resolve(args) => run_resolve(args),
        Commands::Keys(args) => run_keys(args),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use tempfile::tempdir;

    use crate::check::CheckArgs;
    use crate::error::DoctorError;
    use crate::keys::KeysArgs;
    use crate::report::ReportArgs;
    use crate::resolve::{ResolveArgs, ShapeArg};
    use crate::util::write_string;

    use super::{Cli, Commands, run};

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "doctor_praxis",
            "check",
            "--reference",
            "en.json",
            "--target",
            "de.json",
            "--allow-type-errors",
            "--sample",
            "3",
            "-v",
        ])
        .expect("parse");
        assert!(cli.verbose);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.target, Some(PathBuf::from("de.json")));
        assert!(args.allow_type_errors);
        assert_eq!(args.sample, Some(3));
    }

    #[test]
    fn parses_resolve_shape() {
        let cli = Cli::try_parse_from([
            "doctor_praxis",
            "resolve",
            "--path",
            "home.highlights",
            "--shape",
            "list",
        ])
        .expect("parse");
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.shape, ShapeArg::List);
    }

    #[test]
    fn keys_command_dispatches_successfully() {
        let temp = tempdir().expect("tempdir");
        let result = run(Cli {
            config: None,
            verbose: false,
            command: Commands::Keys(KeysArgs {
                output: Some(temp.path().join("keys.txt")),
                ..KeysArgs::default()
            }),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn resolve_command_dispatches_successfully() {
        let result = run(Cli {
            config: None,
            verbose: false,
            command: Commands::Resolve(ResolveArgs {
                path: "navigation.home".to_string(),
                locale: None,
                bundled: None,
                shape: ShapeArg::Text,
            }),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn check_command_reads_explicit_config() {
        let temp = tempdir().expect("tempdir");
        write_string(&temp.path().join("en.json"), r#"{ "a": { "b": "Hello" } }"#)
            .expect("write en");
        write_string(&temp.path().join("de.json"), r#"{ "a": { "b": "Hallo" } }"#)
            .expect("write de");
        let config = temp.path().join("praxis-i18n.toml");
        write_string(
            &config,
            "reference = \"en.json\"\ntarget = \"de.json\"\noutput_json = \"out/report.json\"\n",
        )
        .expect("write config");

        run(Cli {
            config: Some(config),
            verbose: false,
            command: Commands::Check(CheckArgs::default()),
        })
        .expect("complete locale passes");
        assert!(temp.path().join("out/report.json").exists());
    }

    #[test]
    fn check_command_propagates_missing_config() {
        let temp = tempdir().expect("tempdir");
        let error = run(Cli {
            config: Some(temp.path().join("missing.toml")),
            verbose: false,
            command: Commands::Check(CheckArgs::default()),
        })
        .expect_err("missing config");
        assert!(matches!(error, DoctorError::MissingPath { .. }));
    }

    #[test]
    fn report_command_dispatches_missing_input_error() {
        let temp = tempdir().expect("tempdir");
        let error = run(Cli {
            config: None,
            verbose: false,
            command: Commands::Report(ReportArgs {
                input: temp.path().join("report.json"),
                output_html: None,
                title: "Report".to_string(),
            }),
        })
        .expect_err("missing report");
        assert_eq!(error.exit_code(), 1);
    }
}
