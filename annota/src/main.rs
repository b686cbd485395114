#![warn(clippy::pedantic)]

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "annota.log" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else if let Err(e) = simple_logging::log_to_file("annota.log", log::LevelFilter::Debug) {
        eprintln!("failed to open annota.log, continuing without logs: {e}");
    }

    let settings = annota::settings::Settings::load();
    if settings.did_fail_to_load() {
        log::warn!("Using default settings.");
    }

    // Args are a list of event scripts, each replayed against its own fresh document.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        log::warn!("Nothing to do. Usage: annota <script.toml>...");
        return Ok(());
    }
    let mut had_success = false;
    for path in &paths {
        let replayed = annota::script::Script::from_path(path)
            .and_then(|script| annota::script::run(&script, &settings));
        match replayed {
            Ok(summary) => {
                had_success = true;
                print!("{}:\n{summary}", path.display());
            }
            Err(e) => log::error!("failed to replay {path:?}: {e:#}"),
        }
    }
    if !had_success {
        anyhow::bail!("failed to replay any provided script");
    }
    Ok(())
}
