use env_logger::{Builder, Env};
use log::LevelFilter;

fn fallback_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Routes `log` records to stderr.
///
/// `RUST_LOG` takes precedence over `--verbose` when both are present.
pub(crate) fn init(verbose: bool) {
    let env = Env::default().default_filter_or(fallback_level(verbose).as_str());
    if Builder::from_env(env)
        .format_target(false)
        .try_init()
        .is_err()
    {
        log::debug!("keeping the logger that was already installed");
    }
}
