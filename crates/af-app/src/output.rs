use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use af_core::frame::AsciiFrame;
use anyhow::{Context, Result};
use crossterm::{cursor, execute, terminal};

/// Granularité du sommeil entre deux vérifications de Ctrl-C.
const STOP_POLL: Duration = Duration::from_millis(20);

/// Frames as written to a file: one frame per block, blank line between.
#[must_use]
pub fn frames_to_text(frames: &[AsciiFrame]) -> String {
    frames
        .iter()
        .map(AsciiFrame::to_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Save rendered frames to `path`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_frames(path: &Path, frames: &[AsciiFrame]) -> Result<()> {
    std::fs::write(path, frames_to_text(frames))
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("{} frame(s) sauvegardée(s) dans {}", frames.len(), path.display());
    Ok(())
}

/// Play frames in the terminal, overwriting the screen each time.
///
/// Runs `loops` times, or until Ctrl-C when `loops` is `None`.
///
/// # Errors
/// Returns an error if the Ctrl-C handler cannot be installed or the
/// terminal cannot be written.
pub fn play(frames: &[AsciiFrame], loops: Option<u32>) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("Impossible d'installer le handler Ctrl-C")?;

    let mut stdout = std::io::stdout();
    execute!(stdout, cursor::Hide)?;
    let result = play_loop(&mut stdout, frames, loops, &running);
    execute!(stdout, cursor::Show)?;
    if !running.load(Ordering::SeqCst) {
        println!("\nAnimation stopped.");
    }
    result
}

fn play_loop(
    stdout: &mut std::io::Stdout,
    frames: &[AsciiFrame],
    loops: Option<u32>,
    running: &AtomicBool,
) -> Result<()> {
    let mut done = 0u32;
    while running.load(Ordering::SeqCst) && loops.is_none_or(|n| done < n) {
        for frame in frames {
            if !running.load(Ordering::SeqCst) {
                return Ok(());
            }
            execute!(
                stdout,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
            write!(stdout, "{frame}")?;
            stdout.flush()?;
            sleep_unless_stopped(frame.delay, running);
        }
        done = done.saturating_add(1);
    }
    Ok(())
}

fn sleep_unless_stopped(delay: Duration, running: &AtomicBool) {
    let start = Instant::now();
    while running.load(Ordering::SeqCst) {
        let elapsed = start.elapsed();
        if elapsed >= delay {
            break;
        }
        std::thread::sleep((delay - elapsed).min(STOP_POLL));
    }
}
