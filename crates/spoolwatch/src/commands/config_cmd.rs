//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use spoolwatch_core::Poller;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands::check;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_threshold(label: &str, current: u8) -> Result<u8, CliError> {
    Input::new()
        .with_prompt(format!("{label} threshold (% remaining)"))
        .default(current)
        .validate_with(|v: &u8| {
            if *v <= 100 {
                Ok(())
            } else {
                Err("must be between 0 and 100")
            }
        })
        .interact_text()
        .map_err(prompt_err)
}

fn run_wizard(mut cfg: Config) -> Result<Config, CliError> {
    let spoolman: String = Input::new()
        .with_prompt("Spoolman URL")
        .with_initial_text(cfg.spoolman_url.clone().unwrap_or_default())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.spoolman_url = Some(spoolman.trim().to_owned());

    let klipper: String = Input::new()
        .with_prompt("Moonraker URL (empty to skip)")
        .with_initial_text(cfg.klipper_url.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let klipper = klipper.trim();
    cfg.klipper_url = (!klipper.is_empty()).then(|| klipper.to_owned());

    cfg.update_interval = Input::new()
        .with_prompt("Update interval (minutes)")
        .default(cfg.update_interval)
        .validate_with(|v: &u64| if *v >= 1 { Ok(()) } else { Err("must be at least 1") })
        .interact_text()
        .map_err(prompt_err)?;

    cfg.notification_threshold_info = prompt_threshold("Info", cfg.notification_threshold_info)?;
    cfg.notification_threshold_warning =
        prompt_threshold("Warning", cfg.notification_threshold_warning)?;
    cfg.notification_threshold_critical =
        prompt_threshold("Critical", cfg.notification_threshold_critical)?;

    cfg.show_archived = Confirm::new()
        .with_prompt("Include archived spools?")
        .default(cfg.show_archived)
        .interact()
        .map_err(prompt_err)?;

    Ok(cfg)
}

/// What to do after the Spoolman health check failed.
enum AfterFailedCheck {
    EditAgain,
    SaveAnyway,
    Abort,
}

fn prompt_after_failed_check(err: &CliError) -> Result<AfterFailedCheck, CliError> {
    eprintln!("Spoolman check failed: {err}");
    let choice = Select::new()
        .with_prompt("How do you want to continue?")
        .items(&["Edit the settings again", "Save anyway", "Abort"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(match choice {
        0 => AfterFailedCheck::EditAgain,
        1 => AfterFailedCheck::SaveAnyway,
        _ => AfterFailedCheck::Abort,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_file(global);
            // A missing file loads as defaults; a broken one must not be overwritten.
            let mut cfg = config::load_config_from(&path)?;

            loop {
                cfg = run_wizard(cfg)?;
                cfg.validate()?;

                let poller = Poller::new(cfg.to_watch_config()?)?;
                match check::health(&poller).await {
                    Ok(result) => {
                        if !global.quiet {
                            eprintln!("Spoolman at {} is {}", result.url, result.status);
                        }
                        break;
                    }
                    Err(err) => match prompt_after_failed_check(&err)? {
                        AfterFailedCheck::EditAgain => {}
                        AfterFailedCheck::SaveAnyway => break,
                        AfterFailedCheck::Abort => return Err(err),
                    },
                }
            }

            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Configuration written to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_effective(global)?;
            let out = output::render_single(global.output, &cfg, |c| {
                toml::to_string_pretty(c)
                    .unwrap_or_else(|e| format!("# failed to render config: {e}"))
            })?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string(), global.quiet);
            Ok(())
        }
    }
}
