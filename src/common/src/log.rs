use std::{io, str::FromStr};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::error::{SnmpCfgError, SnmpCfgResult};

/// Installs the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
pub fn init(level: &str) -> SnmpCfgResult<()> {
    let level = parse_level(level)?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| SnmpCfgError::Common(format!("setting default subscriber failed: {}", e)))
}

fn parse_level(level: &str) -> SnmpCfgResult<Level> {
    Level::from_str(level).map_err(|_| SnmpCfgError::Common(format!("unknown log level: {}", level)))
}
