//! Line input for the host prompt.

use std::{io::BufRead, thread};
use tokio::sync::mpsc;

/// Forward lines from `reader` over a channel, reading on a detached thread.
///
/// Blocking reads cannot be cancelled. Keeping them off the runtime's
/// blocking pool lets the runtime shut down while a read is pending.
/// The channel closes on EOF or a read error.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
