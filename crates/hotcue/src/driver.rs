//! Drives a running engine from stdin commands.

use std::{
    future::Future,
    io::{self, BufRead},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crossbeam_channel::Sender;
use hotcue_engine::{EngineHandle, KeySender, bridge_crossbeam_to_tokio};
use keycode::{Chord, Key};
use tokio::{signal, time};
use tracing::{debug, error, info, warn};

use crate::{
    load::{load_table, report_missing_assets},
    script::{Command, parse_line},
};

/// Read stdin on a plain thread, forwarding parsed commands.
fn spawn_stdin_reader(tx: Sender<Command>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for (n, line) in stdin.lock().lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "stdin_read_failed");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Some(cmd)) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(line = n + 1, error = %e, "command_invalid"),
            }
        }
        debug!("stdin_closed");
    });
}

/// Press every key of `chord`, then release them in reverse.
fn tap(keys: &KeySender, chord: &Chord) -> hotcue_engine::Result<()> {
    let all: Vec<Key> = chord.keys().collect();
    for k in &all {
        keys.press(*k)?;
    }
    for k in all.iter().rev() {
        keys.release(*k)?;
    }
    Ok(())
}

/// Sleep for `d` unless `interrupt` resolves first. Returns false if
/// interrupted.
async fn wait_or_interrupt<F>(d: Duration, interrupt: F) -> bool
where
    F: Future<Output = io::Result<()>>,
{
    tokio::select! {
        _ = time::sleep(d) => true,
        res = interrupt => {
            if let Err(e) = res {
                warn!(error = %e, "signal_handler_failed");
            }
            false
        }
    }
}

/// Re-read the config and swap the table; keep the current one on error.
fn reload(engine: &EngineHandle, config_path: &Path) -> hotcue_engine::Result<()> {
    match load_table(config_path, false) {
        Ok(table) => {
            report_missing_assets(&table);
            info!(path = %config_path.display(), "config_reloaded");
            engine.swap_table(table)
        }
        Err(e) => {
            error!(path = %config_path.display(), error = %e, "config_reload_failed");
            Ok(())
        }
    }
}

/// Execute one command. Returns false when the driver should stop.
async fn execute(
    engine: &EngineHandle,
    keys: &KeySender,
    config_path: &Path,
    cmd: Command,
) -> hotcue_engine::Result<bool> {
    match cmd {
        Command::Down(k) => keys.press(k)?,
        Command::Up(k) => keys.release(k)?,
        Command::Tap(chord) => tap(keys, &chord)?,
        Command::Wait(d) => {
            if !wait_or_interrupt(d, signal::ctrl_c()).await {
                return Ok(false);
            }
        }
        Command::Reload => reload(engine, config_path)?,
        Command::Dismiss => engine.dismiss_overlay()?,
        Command::Status => {
            let status = engine.status();
            println!(
                "phase={:?} shortcuts={} swap_pending={}",
                status.phase,
                status.table.len(),
                status.swap_pending
            );
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Run commands from stdin until `quit`, end of input or Ctrl-C.
pub async fn run(engine: EngineHandle, config_path: PathBuf) -> hotcue_engine::Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded();
    spawn_stdin_reader(tx);
    let mut commands = bridge_crossbeam_to_tokio(rx);
    let keys = engine.key_sender();

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                if !execute(&engine, &keys, &config_path, cmd).await? {
                    break;
                }
            }
            res = signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!(error = %e, "signal_handler_failed");
                }
                break;
            }
        }
    }
    engine.shutdown().await
}

#[cfg(test)]
mod tests {
    use std::future::{pending, ready};

    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn wait_runs_to_completion() {
        let start = Instant::now();
        assert!(wait_or_interrupt(Duration::from_millis(750), pending()).await);
        assert_eq!(start.elapsed(), Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_cuts_a_long_wait_short() {
        let start = Instant::now();
        assert!(!wait_or_interrupt(Duration::from_secs(3600), ready(Ok(()))).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
