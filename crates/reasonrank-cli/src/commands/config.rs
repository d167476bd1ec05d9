//! Config command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// The source note goes to stderr so the TOML on stdout can be redirected
/// straight into a config file.
pub fn execute_config(explicit: Option<&Path>, config: &Config, formatter: &Formatter) -> Result<()> {
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::default_path().ok().filter(|p| p.exists()),
    };
    match source {
        Some(path) => eprintln!("{}", formatter.info(&format!("Config file: {}", path.display()))),
        None => eprintln!("{}", formatter.info("Using built-in defaults")),
    }
    print!("{}", config.to_toml_string()?);
    Ok(())
}
