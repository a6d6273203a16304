use std::io::Write;
use std::sync::Arc;

use clap::Subcommand;
use solostudy_core::timer::{format_countdown, Alarm, SilentAlarm, TerminalBell};
use solostudy_core::{Event, TickDriver};

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground until it expires or Ctrl-C.
    ///
    /// The countdown only moves while this command runs; Ctrl-C pauses it
    /// and saves the remaining time.
    #[command(visible_alias = "run")]
    Start {
        /// Don't ring the terminal bell on expiry
        #[arg(long)]
        quiet: bool,
    },
    /// Stop a countdown left running by an interrupted session
    Pause,
    /// Back to a full focus session
    Reset,
}

pub fn run(action: TimerAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        TimerAction::Status => {
            print_json(&session.state.timer().snapshot())?;
            return Ok(());
        }
        TimerAction::Start { quiet } => {
            let sound = session.config.timer.sound_enabled && !quiet;
            let runtime = tokio::runtime::Runtime::new()?;
            let timer = runtime.block_on(run_countdown(session.state.timer().clone(), sound))?;
            session.state.set_timer(timer);
            print_json(&session.state.timer().snapshot())?;
        }
        TimerAction::Pause => {
            let mut timer = session.state.timer().clone();
            let event = timer.pause().unwrap_or_else(|| timer.snapshot());
            session.state.set_timer(timer);
            print_json(&event)?;
        }
        TimerAction::Reset => {
            let mut timer = session.state.timer().clone();
            let event = timer.reset();
            session.state.set_timer(timer);
            print_json(&event)?;
        }
    }

    session.save()?;
    Ok(())
}

/// Drive `timer` until it expires or Ctrl-C. The returned timer is always
/// stopped.
async fn run_countdown(
    timer: solostudy_core::SessionTimer,
    sound: bool,
) -> Result<solostudy_core::SessionTimer, std::io::Error> {
    let alarm: Arc<dyn Alarm> = if sound {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentAlarm)
    };
    let (mut driver, mut events) = TickDriver::new(timer, alarm, sound);

    if let Some(event) = driver.start() {
        tracing::debug!(?event, "countdown started");
    }
    draw(driver.timer().remaining_secs())?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(Event::TimerTicked { remaining_secs, .. }) => draw(remaining_secs)?,
                Some(event @ Event::TimerExpired { .. }) => {
                    eprintln!();
                    print_event(&event);
                    break;
                }
                Some(_) => {}
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                driver.pause();
                eprintln!();
                break;
            }
        }
    }

    Ok(driver.into_timer())
}

fn draw(remaining_secs: u64) -> Result<(), std::io::Error> {
    let mut err = std::io::stderr();
    write!(err, "\r{}", format_countdown(remaining_secs))?;
    err.flush()
}

fn print_event(event: &Event) {
    match serde_json::to_string_pretty(event) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "failed to render event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solostudy_core::{SessionTimer, TimerMode, TimerState};

    #[tokio::test(start_paused = true)]
    async fn countdown_runs_to_expiry_and_stops() {
        let timer = run_countdown(SessionTimer::new(1, 1), false).await.unwrap();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_resumes_saved_remaining_time() {
        let mut saved = SessionTimer::new(1, 1);
        saved.start();
        for _ in 0..50 {
            saved.tick();
        }
        saved.pause();

        let started = tokio::time::Instant::now();
        let timer = run_countdown(saved, false).await.unwrap();
        assert_eq!(started.elapsed().as_secs(), 10);
        assert_eq!(timer.mode(), TimerMode::Break);
        assert!(!timer.is_running());
    }
}
