// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use console::style;

use crate::config::{OutputFormat, PolicyConfig};
use crate::error::{CommitError, CplError, LintError, Result, ResultExt};
use crate::rules::{resolve_rules, LintReport, Linter};

use super::args::{CheckArgs, Cli, Commands, HooksAction, HooksArgs, InitArgs, LintArgs};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // These do not need a (valid) configuration.
    match &cli.command {
        Commands::Init(args) => return run_init(args),
        Commands::Version => return run_version(),
        _ => {}
    }

    let config = if let Some(config_path) = &cli.config {
        PolicyConfig::load_from(config_path)?
    } else {
        PolicyConfig::load()?
    };

    if !config.output.color {
        console::set_colors_enabled(false);
    }
    let format = cli.format.unwrap_or(config.output.format);

    match &cli.command {
        Commands::Lint(args) => run_lint(&cli, &config, format, args),
        Commands::Check(args) => run_check(&cli, &config, format, args),
        Commands::Hooks(args) => run_hooks(args),
        Commands::PrintConfig => run_print_config(&config, format),
        Commands::Init(_) | Commands::Version => Ok(()),
    }
}

/// Run the lint command.
fn run_lint(cli: &Cli, config: &PolicyConfig, format: OutputFormat, args: &LintArgs) -> Result<()> {
    tracing::debug!("Running lint command with args: {:?}", args);

    let message = match &args.edit {
        Some(Some(path)) => read_message_file(path)?,
        Some(None) => {
            let path = crate::git::open_repo()?.commit_editmsg_path();
            read_message_file(&path)?
        }
        None => read_message_stdin()?,
    };

    let linter = Linter::new(config)?;
    let report = linter.lint(&message)?;

    report_outcome(cli, format, &[report], args.strict)
}

/// Run the check command.
fn run_check(cli: &Cli, config: &PolicyConfig, format: OutputFormat, args: &CheckArgs) -> Result<()> {
    tracing::debug!("Running check command with args: {:?}", args);

    let linter = Linter::new(config)?;

    let reports = if args.target.contains("..") {
        linter.check_range(&args.target)?
    } else {
        vec![linter.check_commit(&args.target)?]
    };

    report_outcome(cli, format, &reports, args.strict)
}

/// Print reports and turn failures into a lint error.
fn report_outcome(cli: &Cli, format: OutputFormat, reports: &[LintReport], strict: bool) -> Result<()> {
    let errors: usize = reports.iter().map(|r| r.errors.len()).sum();
    let warnings: usize = reports.iter().map(|r| r.warnings.len()).sum();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": errors == 0 && (!strict || warnings == 0),
                "errors": errors,
                "warnings": warnings,
                "results": reports.iter().map(LintReport::to_json).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
        OutputFormat::Text => {
            for report in reports {
                if cli.quiet && report.issue_count() == 0 {
                    continue;
                }
                report.print(format);
            }
        }
    }

    if errors > 0 {
        Err(CplError::Lint(LintError::Failed { errors, warnings }))
    } else if strict && warnings > 0 {
        Err(CplError::Lint(LintError::StrictWarnings { warnings }))
    } else {
        Ok(())
    }
}

fn read_message_file(path: &Path) -> Result<String> {
    tracing::debug!("Reading commit message from {:?}", path);

    let bytes = std::fs::read(path).map_err(|e| {
        CplError::Commit(CommitError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    })?;

    String::from_utf8(bytes).map_err(|_| {
        CplError::Commit(CommitError::InvalidEncoding {
            source_name: path.display().to_string(),
        })
    })
}

fn read_message_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();

    if stdin.is_terminal() {
        return Err(CplError::WithContext {
            context: "lint".to_string(),
            message: "No input: pipe a commit message or use --edit".to_string(),
        });
    }

    let mut bytes = Vec::new();
    stdin.read_to_end(&mut bytes)?;

    String::from_utf8(bytes).map_err(|_| {
        CplError::Commit(CommitError::InvalidEncoding {
            source_name: "stdin".to_string(),
        })
    })
}

/// Run the hooks command.
fn run_hooks(args: &HooksArgs) -> Result<()> {
    use crate::hooks::HookManager;

    tracing::debug!("Running hooks command");

    let manager = HookManager::new()?;

    match &args.action {
        HooksAction::Install { hook, force } => {
            if let Some(hook_name) = hook {
                manager.install_hook(hook_name, *force)?;
                println!("✓ Installed {} hook", hook_name);
            } else {
                manager.install_all(*force)?;
                println!("✓ Installed all hooks");
            }
        }
        HooksAction::Uninstall { hook } => {
            if let Some(hook_name) = hook {
                manager.uninstall_hook(hook_name)?;
                println!("✓ Uninstalled {} hook", hook_name);
            } else {
                manager.uninstall_all()?;
                println!("✓ Uninstalled all hooks");
            }
        }
        HooksAction::Status => {
            for (hook, installed) in manager.status()? {
                let icon = if installed { "✓" } else { "✗" };
                println!("{} {}", icon, hook);
            }
        }
    }

    Ok(())
}

/// Run the print-config command.
fn run_print_config(config: &PolicyConfig, format: OutputFormat) -> Result<()> {
    let rules = resolve_rules(config)?;
    let linter = Linter::new(config)?;
    let ignores = linter.ignores().names();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "extends": config.extends,
                "rules": rules,
                "ignores": ignores,
                "default_ignores": config.default_ignores,
                "help_url": config.help_url,
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("extends: {}", style(&config.extends).cyan());
            println!();
            println!("rules:");
            for (name, rule) in &rules {
                let overridden = config.rules.contains_key(name);
                let marker = if overridden { style("*").yellow() } else { style(" ") };
                let line = format!("{:<24} {}", name, rule);
                if rule.is_enabled() {
                    println!(" {} {}", marker, line);
                } else {
                    println!(" {} {}", marker, style(line).dim());
                }
            }
            println!();
            println!("ignores:");
            for name in ignores {
                println!("   {}", name);
            }
        }
    }

    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("cpl {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}

/// Run the init command.
fn run_init(args: &InitArgs) -> Result<()> {
    use crate::config::default::example_config;
    use dialoguer::{theme::ColorfulTheme, Confirm};

    tracing::debug!("Running init command with args: {:?}", args);

    let config_path: &PathBuf = &args.path;

    if config_path.exists() && !args.force {
        if !std::io::stdin().is_terminal() {
            return Err(CplError::WithContext {
                context: "init".to_string(),
                message: format!(
                    "{} already exists. Use --force to overwrite.",
                    config_path.display()
                ),
            });
        }

        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} already exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;

        if !overwrite {
            return Err(CplError::Cancelled);
        }
    }

    std::fs::write(config_path, example_config()).context("init")?;

    println!("✓ Created {}", config_path.display());

    Ok(())
}
