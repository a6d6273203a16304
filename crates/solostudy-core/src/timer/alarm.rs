//! Audible alert fired when a countdown expires.

use std::io::Write;

/// Something that can make a noise when a phase ends.
pub trait Alarm: Send + Sync {
    fn ring(&self);
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl Alarm for TerminalBell {
    fn ring(&self) {
        let mut err = std::io::stderr();
        if let Err(e) = err.write_all(b"\x07").and_then(|_| err.flush()) {
            tracing::debug!(error = %e, "terminal bell failed");
        }
    }
}

/// Never makes a sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn ring(&self) {}
}
