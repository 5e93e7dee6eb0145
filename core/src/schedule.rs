use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Deferred "resolve pending pair" task produced when the second card of a pair is flipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    generation: Generation,
    first: CardId,
    second: CardId,
    delay_ms: u32,
}

impl PendingResolution {
    pub(crate) const fn new(
        generation: Generation,
        first: CardId,
        second: CardId,
        delay_ms: u32,
    ) -> Self {
        Self {
            generation,
            first,
            second,
            delay_ms,
        }
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub const fn pair(&self) -> (CardId, CardId) {
        (self.first, self.second)
    }

    pub const fn ids(&self) -> [CardId; 2] {
        [self.first, self.second]
    }

    pub const fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms as u64)
    }
}

/// Runs a [`PendingResolution`] once its delay has elapsed.
///
/// At most one task is outstanding at a time; `schedule` may replace whatever was queued.
pub trait Scheduler {
    fn schedule(&mut self, task: PendingResolution);
    fn cancel(&mut self);
}

/// Virtual-clock scheduler, time only moves when [`ManualScheduler::advance`] is called.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    now_ms: u64,
    queued: Option<(u64, PendingResolution)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_pending(&self) -> bool {
        self.queued.is_some()
    }

    /// Moves the clock forward and hands back the task if it became due.
    pub fn advance(&mut self, ms: u64) -> Option<PendingResolution> {
        self.now_ms = self.now_ms.saturating_add(ms);
        match self.queued {
            Some((due_ms, task)) if due_ms <= self.now_ms => {
                self.queued = None;
                Some(task)
            }
            _ => None,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, task: PendingResolution) {
        let due_ms = self.now_ms.saturating_add(task.delay_ms().into());
        if let Some((_, previous)) = self.queued.replace((due_ms, task)) {
            log::warn!("replacing queued resolution {:?}", previous);
        }
    }

    fn cancel(&mut self) {
        if let Some((_, task)) = self.queued.take() {
            log::debug!("cancelled resolution {:?}", task);
        }
    }
}

/// An engine wired to a scheduler: pending pairs are submitted as they form and
/// cancelled when a new deal lands.
#[derive(Clone, Debug)]
pub struct Game<S> {
    engine: MemoryEngine,
    scheduler: S,
}

impl<S: Scheduler> Game<S> {
    pub fn new(config: GameConfig, scheduler: S) -> Self {
        Self {
            engine: MemoryEngine::new(config),
            scheduler,
        }
    }

    pub fn engine(&self) -> &MemoryEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn begin_deal(&mut self) -> DealRequest {
        self.engine.begin_deal()
    }

    pub fn finish_deal<R: Rng + ?Sized>(
        &mut self,
        request: DealRequest,
        images: &[ImageId],
        rng: &mut R,
    ) -> Result<()> {
        self.engine.finish_deal(request, images, rng)?;
        self.scheduler.cancel();
        Ok(())
    }

    pub fn abort_deal(&mut self, request: DealRequest) -> Result<()> {
        self.engine.abort_deal(request)
    }

    /// Deals a new game from `source`, replacing any game in progress.
    pub async fn start<I, R>(&mut self, source: &I, rng: &mut R) -> Result<()>
    where
        I: ImageSource,
        R: Rng + ?Sized,
    {
        let request = self.begin_deal();
        match source.fetch(request.count().into()).await {
            Ok(images) => self.finish_deal(request, &images, rng),
            Err(err) => {
                log::warn!("image source failed: {}", err);
                self.abort_deal(request)?;
                Err(GameError::ImagesUnavailable)
            }
        }
    }

    pub fn select(&mut self, id: CardId) -> Result<SelectOutcome> {
        let outcome = self.engine.select(id)?;
        if let SelectOutcome::PairPending(task) = outcome {
            self.scheduler.schedule(task);
        }
        Ok(outcome)
    }

    pub fn resolve(&mut self, task: PendingResolution) -> Result<ResolveOutcome> {
        self.engine.resolve(task)
    }
}

impl Game<ManualScheduler> {
    /// Advances the virtual clock, resolving the pending pair if its delay ran out.
    pub fn advance(&mut self, ms: u64) -> Option<Result<ResolveOutcome>> {
        let task = self.scheduler.advance(ms)?;
        Some(self.engine.resolve(task))
    }
}
