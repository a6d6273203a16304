//! One-second tick source for a [`SessionTimer`].
//!
//! The driver owns at most one tokio task. `start`, `pause`, `reset` and
//! `reconfigure` abort the outstanding task before changing state, so two
//! tick streams never run against the same timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::alarm::Alarm;
use super::engine::SessionTimer;
use crate::events::Event;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives a session timer in real time.
///
/// Must be used from inside a tokio runtime.
pub struct TickDriver {
    timer: Arc<Mutex<SessionTimer>>,
    alarm: Arc<dyn Alarm>,
    sound_enabled: bool,
    events: mpsc::UnboundedSender<Event>,
    task: Option<JoinHandle<()>>,
}

impl TickDriver {
    /// Wrap `timer`. Every event the driver or its tick task produces is
    /// sent to the returned receiver.
    pub fn new(
        timer: SessionTimer,
        alarm: Arc<dyn Alarm>,
        sound_enabled: bool,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let driver = Self {
            timer: Arc::new(Mutex::new(timer)),
            alarm,
            sound_enabled,
            events,
            task: None,
        };
        (driver, rx)
    }

    /// Copy of the current timer state.
    pub fn timer(&self) -> SessionTimer {
        lock(&self.timer).clone()
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.timer).snapshot()
    }

    /// Whether a tick task is installed and still alive.
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        if self.is_ticking() {
            self.cancel();
            self.install();
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        self.cancel();
        let event = lock(&self.timer).start();
        if lock(&self.timer).is_running() {
            self.install();
        }
        self.emit(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.cancel();
        let event = lock(&self.timer).pause();
        self.emit(event)
    }

    pub fn reset(&mut self) -> Event {
        self.cancel();
        let event = lock(&self.timer).reset();
        self.emit_always(event)
    }

    /// Swap in new durations; a running countdown keeps running.
    pub fn reconfigure(&mut self, session_minutes: u32, break_minutes: u32) -> Event {
        self.cancel();
        let (event, running) = {
            let mut timer = lock(&self.timer);
            (timer.reconfigure(session_minutes, break_minutes), timer.is_running())
        };
        if running {
            self.install();
        }
        self.emit_always(event)
    }

    /// Abort the tick task and hand back the timer state.
    pub fn into_timer(mut self) -> SessionTimer {
        self.cancel();
        lock(&self.timer).clone()
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn install(&mut self) {
        let timer = Arc::clone(&self.timer);
        let alarm = Arc::clone(&self.alarm);
        let sound_enabled = self.sound_enabled;
        let events = self.events.clone();

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            loop {
                interval.tick().await;
                let event = lock(&timer).tick();
                match event {
                    None => break,
                    Some(event @ Event::TimerExpired { .. }) => {
                        if sound_enabled {
                            alarm.ring();
                        }
                        tracing::info!(?event, "timer phase finished");
                        let _ = events.send(event);
                        break;
                    }
                    Some(event) => {
                        let _ = events.send(event);
                    }
                }
            }
        }));
    }

    fn emit(&self, event: Option<Event>) -> Option<Event> {
        if let Some(ref e) = event {
            let _ = self.events.send(e.clone());
        }
        event
    }

    fn emit_always(&self, event: Event) -> Event {
        let _ = self.events.send(event.clone());
        event
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(timer: &Mutex<SessionTimer>) -> MutexGuard<'_, SessionTimer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{TimerMode, TimerState};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingAlarm(AtomicUsize);

    impl Alarm for CountingAlarm {
        fn ring(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn driver(
        session: u32,
        brk: u32,
        sound: bool,
    ) -> (TickDriver, mpsc::UnboundedReceiver<Event>, Arc<CountingAlarm>) {
        let alarm = Arc::new(CountingAlarm::default());
        let (driver, rx) = TickDriver::new(SessionTimer::new(session, brk), alarm.clone(), sound);
        (driver, rx, alarm)
    }

    #[tokio::test(start_paused = true)]
    async fn focus_minute_expires_into_stopped_break() {
        let (mut driver, mut rx, alarm) = driver(1, 1, true);
        assert!(driver.start().is_some());

        tokio::time::sleep(Duration::from_secs(61)).await;

        let timer = driver.timer();
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(alarm.0.load(Ordering::SeqCst), 1);
        assert!(!driver.is_ticking());

        let mut ticks = 0;
        let mut expired = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::TimerTicked { .. } => ticks += 1,
                Event::TimerExpired { .. } => expired += 1,
                _ => {}
            }
        }
        assert_eq!(ticks, 59);
        assert_eq!(expired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn muted_timer_skips_alarm() {
        let (mut driver, _rx, alarm) = driver(1, 1, false);
        driver.start();
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(driver.timer().mode(), TimerMode::Break);
        assert_eq!(alarm.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_the_tick_stream() {
        let (mut driver, _rx, _alarm) = driver(5, 1, true);
        driver.start();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        driver.pause();
        assert_eq!(driver.timer().remaining_secs(), 290);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(driver.timer().remaining_secs(), 290);
        assert!(!driver.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_never_duplicates_ticks() {
        let (mut driver, _rx, _alarm) = driver(5, 1, true);
        driver.start();
        driver.reconfigure(10, 2);
        driver.start();
        driver.set_sound_enabled(false);
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        // One tick per second regardless of how many times the task was reinstalled.
        assert_eq!(driver.timer().remaining_secs(), 290);
        assert_eq!(driver.timer().session_minutes(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_and_restores_duration() {
        let (mut driver, _rx, _alarm) = driver(2, 1, true);
        driver.start();
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        driver.reset();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let timer = driver.timer();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining_secs(), 120);
    }
}
