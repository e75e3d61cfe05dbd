// Debug logging for the terminal client
// The TUI owns stdout, so tracing output goes to a file when --debug is set

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::SystemTime;

use tracing::info;

pub const LOG_FILE_PATH: &str = "/tmp/headball-debug.log";

/// Install a file-backed tracing subscriber
///
/// # Behavior
/// - If enabled=false: no subscriber is installed and every `tracing` macro is a no-op
/// - If enabled=true: truncates the log file, writes a header and routes
///   DEBUG and above into it
pub fn init(enabled: bool) -> io::Result<()> {
    if !enabled {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE_PATH)?;

    writeln!(file, "=== Head Ball Debug Log ===")?;
    writeln!(file, "Session started: {:?}", SystemTime::now())?;
    writeln!(file, "To monitor: tail -f {}", LOG_FILE_PATH)?;
    writeln!(file, "========================================\n")?;

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    info!("Debug logging enabled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_creates_nothing() {
        assert!(init(false).is_ok());
    }
}
