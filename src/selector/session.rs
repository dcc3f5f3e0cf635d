//! Timed selection runs: a repeating spin preview followed by a one-shot commit

use super::draw::{select_winners, spin, DEFAULT_MAX_WINNERS};
use crate::error::{Result, SelectorError};
use crate::model::{LocationGroups, SpinSnapshot, WinnerSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Timing and policy for a selection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Total length of the spin preview before winners are committed
    pub spin_duration: Duration,
    /// Time between preview ticks
    pub spin_interval: Duration,
    /// Maximum winners per location
    pub max_winners: usize,
    /// Seed for the committed draw. Preview ticks are never seeded.
    pub seed: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            spin_duration: Duration::from_secs(10),
            spin_interval: Duration::from_millis(500),
            max_winners: DEFAULT_MAX_WINNERS,
            seed: None,
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.spin_interval.is_zero() {
            return Err(SelectorError::InvalidConfig(
                "spin interval must be greater than zero".to_string(),
            ));
        }
        if self.max_winners == 0 {
            return Err(SelectorError::InvalidConfig(
                "at least one winner per location is required".to_string(),
            ));
        }
        Ok(())
    }

    fn draw_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Where a selection run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Previewing,
    Committing,
}

impl Phase {
    fn to_u8(self) -> u8 {
        match self {
            Phase::Idle => 0,
            Phase::Previewing => 1,
            Phase::Committing => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Phase::Previewing,
            2 => Phase::Committing,
            _ => Phase::Idle,
        }
    }
}

#[derive(Debug, Clone)]
struct SharedPhase(Arc<AtomicU8>);

impl SharedPhase {
    fn new(phase: Phase) -> Self {
        Self(Arc::new(AtomicU8::new(phase.to_u8())))
    }

    fn get(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, phase: Phase) {
        self.0.store(phase.to_u8(), Ordering::Release);
    }
}

/// A single in-flight selection run.
///
/// Dropping the handle cancels the run and waits for its worker to stop.
pub struct RunHandle {
    cancel_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<bool>>,
    phase: SharedPhase,
}

impl RunHandle {
    /// Start a run on its own worker thread.
    ///
    /// `on_tick` receives a fresh snapshot every `spin_interval` until
    /// `spin_duration` has elapsed, then `on_complete` receives the winners.
    /// Both callbacks run on the worker thread, never concurrently.
    pub fn start<T, C>(
        groups: LocationGroups,
        config: SelectorConfig,
        on_tick: T,
        on_complete: C,
    ) -> Result<Self>
    where
        T: FnMut(&SpinSnapshot) + Send + 'static,
        C: FnOnce(WinnerSet) + Send + 'static,
    {
        config.validate()?;
        if groups.is_empty() {
            return Err(SelectorError::NoData);
        }

        log::info!(
            "Starting selection run: {} entries in {} locations, spinning for {:?}",
            groups.total_entries(),
            groups.len(),
            config.spin_duration
        );

        let (cancel_tx, cancel_rx) = mpsc::channel();
        let phase = SharedPhase::new(Phase::Previewing);
        let worker_phase = phase.clone();

        let thread = thread::spawn(move || {
            run_worker(groups, config, cancel_rx, worker_phase, on_tick, on_complete)
        });

        Ok(Self {
            cancel_tx: Some(cancel_tx),
            thread: Some(thread),
            phase,
        })
    }

    /// Stop the preview and skip the commit. Has no effect once the commit has
    /// started or after a previous cancel.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            log::debug!("Cancelling selection run");
            // The worker also treats a closed channel as cancellation.
            let _ = tx.send(());
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Block until the run ends. Returns true if winners were committed.
    pub fn wait(mut self) -> bool {
        self.join()
    }

    fn join(&mut self) -> bool {
        match self.thread.take() {
            Some(handle) => match handle.join() {
                Ok(committed) => committed,
                Err(_) => {
                    log::error!("Selection worker panicked");
                    self.phase.set(Phase::Idle);
                    false
                }
            },
            None => false,
        }
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel();
        self.join();
    }
}

fn run_worker<T, C>(
    groups: LocationGroups,
    config: SelectorConfig,
    cancel_rx: Receiver<()>,
    phase: SharedPhase,
    mut on_tick: T,
    on_complete: C,
) -> bool
where
    T: FnMut(&SpinSnapshot),
    C: FnOnce(WinnerSet),
{
    let start = Instant::now();
    let deadline = start + config.spin_duration;
    let mut preview_rng = rand::thread_rng();
    let mut tick: u32 = 1;

    loop {
        let next_tick = config
            .spin_interval
            .checked_mul(tick)
            .map(|offset| start + offset)
            .filter(|at| *at < deadline);
        let wake_at = next_tick.unwrap_or(deadline);

        match cancel_rx.recv_timeout(wake_at.saturating_duration_since(Instant::now())) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                log::info!("Selection run cancelled after {} ticks", tick - 1);
                phase.set(Phase::Idle);
                return false;
            }
        }

        if next_tick.is_none() {
            break;
        }

        let snapshot = spin(&groups, &mut preview_rng);
        log::debug!("Spin tick {}: {} locations", tick, snapshot.len());
        on_tick(&snapshot);
        tick += 1;
    }

    phase.set(Phase::Committing);
    let winners = select_winners(&groups, config.max_winners, &mut config.draw_rng());
    log::info!(
        "Committed {} winners across {} locations",
        winners.total_entries(),
        winners.len()
    );
    on_complete(winners);
    phase.set(Phase::Idle);
    true
}

/// Owns at most one selection run at a time.
pub struct Selector {
    config: SelectorConfig,
    current: Option<RunHandle>,
}

impl Selector {
    pub fn new(config: SelectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            current: None,
        })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Start a new run, cancelling any run already in progress.
    ///
    /// Fails with [`SelectorError::NoData`] when `groups` is empty; in that case
    /// neither callback is ever called and the previous run is left alone.
    pub fn run<T, C>(&mut self, groups: LocationGroups, on_tick: T, on_complete: C) -> Result<()>
    where
        T: FnMut(&SpinSnapshot) + Send + 'static,
        C: FnOnce(WinnerSet) + Send + 'static,
    {
        if groups.is_empty() {
            return Err(SelectorError::NoData);
        }
        self.cancel();
        self.current = Some(RunHandle::start(
            groups,
            self.config.clone(),
            on_tick,
            on_complete,
        )?);
        Ok(())
    }

    /// Draw winners immediately, without the spin preview
    pub fn draw_now(&self, groups: &LocationGroups) -> Result<WinnerSet> {
        if groups.is_empty() {
            return Err(SelectorError::NoData);
        }
        Ok(select_winners(
            groups,
            self.config.max_winners,
            &mut self.config.draw_rng(),
        ))
    }

    /// Cancel the current run, if any, and wait for its worker to stop
    pub fn cancel(&mut self) {
        if let Some(mut run) = self.current.take() {
            run.cancel();
            run.wait();
        }
    }

    /// Block until the current run ends. Returns true if winners were committed.
    pub fn wait(&mut self) -> bool {
        self.current.take().map_or(false, RunHandle::wait)
    }

    pub fn phase(&self) -> Phase {
        self.current.as_ref().map_or(Phase::Idle, RunHandle::phase)
    }
}
