use std::fs::OpenOptions;
use std::path::Path;

/// Send `log` output to a file so it never draws over the TUI. The level
/// comes from `RUST_LOG` and defaults to `info`. Failing to set up logging
/// is not fatal.
pub(crate) fn init(log_path: &Path) {
    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", log_path.display());
            return;
        }
    };

    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
    {
        eprintln!("Warning: logging disabled: {e}");
    }
}
