use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Dealing,
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Handle for one outstanding image request; only the most recent one may settle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRequest {
    ticket: u32,
    count: PairCount,
}

impl DealRequest {
    pub fn ticket(&self) -> u32 {
        self.ticket
    }

    /// Number of distinct images to ask the image source for.
    pub fn count(&self) -> PairCount {
        self.count
    }
}

/// Authoritative state of one memory game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryEngine {
    config: GameConfig,
    cards: Vec<Card>,
    selected: SmallVec<[CardId; 2]>,
    matched_pairs: PairCount,
    lives: Lives,
    started: bool,
    over: bool,
    loading: bool,
    generation: Generation,
    deal_ticket: u32,
}

impl MemoryEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            cards: Vec::new(),
            selected: SmallVec::new(),
            matched_pairs: 0,
            lives: config.lives,
            started: false,
            over: false,
            loading: false,
            generation: 0,
            deal_ticket: 0,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    /// Ids of the face-up cards awaiting resolution, in selection order.
    pub fn selected(&self) -> &[CardId] {
        &self.selected
    }

    pub fn matched_pairs(&self) -> PairCount {
        self.matched_pairs
    }

    pub fn lives(&self) -> Lives {
        self.lives
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_pair_pending(&self) -> bool {
        self.selected.len() >= 2
    }

    pub fn phase(&self) -> GamePhase {
        if self.loading {
            GamePhase::Dealing
        } else if !self.started {
            GamePhase::NotStarted
        } else if !self.over {
            GamePhase::Playing
        } else if self.matched_pairs == self.config.pairs {
            GamePhase::Won
        } else {
            GamePhase::Lost
        }
    }

    pub fn can_select(&self, id: CardId) -> bool {
        self.check_playing().is_ok()
            && !self.is_pair_pending()
            && self.card(id).is_some_and(Card::is_selectable)
    }

    /// Marks a deal as in flight and returns the request to hand to the image source.
    ///
    /// The current deck stays as it is until [`Self::finish_deal`] succeeds.
    pub fn begin_deal(&mut self) -> DealRequest {
        self.deal_ticket = self.deal_ticket.wrapping_add(1);
        self.loading = true;
        log::debug!("deal #{} requested", self.deal_ticket);

        DealRequest {
            ticket: self.deal_ticket,
            count: self.config.pairs,
        }
    }

    /// Replaces the session with a freshly shuffled deck built from `images`.
    ///
    /// Invalid images settle the request like a failed fetch: loading ends and the previous session is kept.
    pub fn finish_deal<R: Rng + ?Sized>(
        &mut self,
        request: DealRequest,
        images: &[ImageId],
        rng: &mut R,
    ) -> Result<()> {
        self.check_deal_request(request)?;

        let cards = match deal(images, self.config.pairs, rng) {
            Ok(cards) => cards,
            Err(err) => {
                log::warn!("deal #{} failed: {}", request.ticket, err);
                self.loading = false;
                return Err(err);
            }
        };

        *self = Self {
            config: self.config,
            cards,
            selected: SmallVec::new(),
            matched_pairs: 0,
            lives: self.config.lives,
            started: true,
            over: self.config.lives == 0,
            loading: false,
            generation: self.generation.wrapping_add(1),
            deal_ticket: self.deal_ticket,
        };
        log::debug!("deal #{} finished, generation {}", request.ticket, self.generation);
        Ok(())
    }

    /// Gives up on an outstanding deal, leaving everything but `loading` untouched.
    pub fn abort_deal(&mut self, request: DealRequest) -> Result<()> {
        self.check_deal_request(request)?;
        self.loading = false;
        log::debug!("deal #{} aborted", request.ticket);
        Ok(())
    }

    pub fn select(&mut self, id: CardId) -> Result<SelectOutcome> {
        self.check_playing()?;
        let index = self.index_of(id)?;

        if self.is_pair_pending() || !self.cards[index].is_selectable() {
            log::trace!("card {} ignored", id);
            return Ok(SelectOutcome::NoChange);
        }

        self.cards[index].flip_up();
        self.selected.push(id);
        log::trace!("card {} flipped", id);

        Ok(match *self.selected.as_slice() {
            [first, second] => SelectOutcome::PairPending(PendingResolution::new(
                self.generation,
                first,
                second,
                self.config.resolve_delay_ms,
            )),
            _ => SelectOutcome::Flipped,
        })
    }

    /// Adjudicates the pending pair. This is the only place lives and matched pairs change.
    pub fn resolve(&mut self, task: PendingResolution) -> Result<ResolveOutcome> {
        if task.generation() != self.generation || self.selected.as_slice() != task.ids() {
            log::warn!("discarding stale resolution {:?}", task);
            return Err(GameError::StaleResolution);
        }
        if self.over {
            return Err(GameError::AlreadyEnded);
        }

        let (first, second) = task.pair();
        let first = self.index_of(first)?;
        let second = self.index_of(second)?;
        self.selected.clear();

        let outcome = if self.cards[first].image() == self.cards[second].image() {
            self.cards[first].mark_matched();
            self.cards[second].mark_matched();
            self.matched_pairs += 1;

            if self.matched_pairs == self.config.pairs {
                self.over = true;
                ResolveOutcome::Won
            } else {
                ResolveOutcome::Matched
            }
        } else {
            self.cards[first].flip_down();
            self.cards[second].flip_down();
            self.lives = self.lives.saturating_sub(1);

            if self.lives == 0 {
                self.over = true;
                ResolveOutcome::Lost
            } else {
                ResolveOutcome::Mismatched
            }
        };

        log::debug!(
            "resolved {:?}: {:?}, {} pairs, {} lives",
            task.pair(),
            outcome,
            self.matched_pairs,
            self.lives
        );
        Ok(outcome)
    }

    fn index_of(&self, id: CardId) -> Result<usize> {
        self.cards
            .iter()
            .position(|card| card.id() == id)
            .ok_or(GameError::UnknownCard)
    }

    fn check_playing(&self) -> Result<()> {
        if self.loading {
            Err(GameError::DealInProgress)
        } else if !self.started {
            Err(GameError::NotStarted)
        } else if self.over {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn check_deal_request(&self, request: DealRequest) -> Result<()> {
        if self.loading && request.ticket == self.deal_ticket {
            Ok(())
        } else {
            Err(GameError::StaleDeal)
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
