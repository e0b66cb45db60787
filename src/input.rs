use crate::session::Command;
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

/// Map one line of user input to a command; blank lines give `None`
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "" => None,
        "r" | "reset" => Some(Command::Reset),
        "q" | "quit" => Some(Command::Stop),
        other => Some(Command::SetArea(other.to_string())),
    }
}

/// Forward commands read line by line from `reader` on a plain OS thread.
///
/// The thread ends at end of input, after `Stop`, or once the receiver is gone.
/// A read that never returns does not hold up runtime shutdown.
pub fn spawn_command_reader<R>(reader: R, tx: mpsc::Sender<Command>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    ::log::warn!("Failed to read command input: {}", e);
                    break;
                }
            };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            let stop = command == Command::Stop;
            if tx.blocking_send(command).is_err() || stop {
                break;
            }
        }
        ::log::debug!("Input reader finished");
    })
}
