mod cli_model;
mod config;

pub use config::Config;

/// Parse the process arguments, set up logging and build the run configuration.
///
/// Argument errors go through clap, which prints usage and exits non-zero.
pub fn handle_cli() -> anyhow::Result<Config> {
    let m = cli_model::cli_model().get_matches();
    crate::log_utils::init_log(&m)?;
    Config::from_matches(&m)
}

/// Build the configuration from an explicit argument list without touching the logger
#[cfg(test)]
pub fn config_from_args<I, T>(args: I) -> anyhow::Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let m = cli_model::cli_model().try_get_matches_from(args)?;
    Config::from_matches(&m)
}
