//! The battle session.

use tracing::{debug, info, warn};

use super::interaction::{InteractionRequest, RequestKind, RequestOutcome};
use crate::battle::{Battle, Phase};
use crate::cards::{CardId, SelectionZone, TargetShape};
use crate::core::{IntentError, ReplayError, SessionError};
use crate::history::{
    BattleFactory, Intent, IntentLog, IntentOrigin, Replay, Replayer, ResolvedEntry, ResolvedLog,
    ResolverHandle, SubOperation,
};
use crate::snapshot::BattleSnapshot;
use crate::zones::ZoneKind;

/// Session behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Refuse new player intents until the last entry is acknowledged.
    pub lock_input: bool,
}

impl SessionConfig {
    /// Configuration for a presentation layer that plays every entry
    /// before accepting input.
    #[must_use]
    pub fn interactive() -> Self {
        Self { lock_input: true }
    }
}

/// Result of asking to play a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayProgress {
    /// The card was played; the entry has this index.
    Resolved(usize),
    /// The card needs a choice; answer the request with this id.
    Pending(u64),
}

/// A battle, its intent log, and its resolved log.
///
/// ```
/// use ccg_battle::scenarios::TrainingScenario;
/// use ccg_battle::session::{BattleSession, SessionConfig};
///
/// let mut session = BattleSession::start(TrainingScenario::factory(7), SessionConfig::default());
/// assert_eq!(session.snapshot().hand.len(), 5);
///
/// session.end_turn().unwrap();
/// assert_eq!(session.battle().turn(), 2);
///
/// session.undo().unwrap();
/// assert_eq!(session.battle().turn(), 1);
/// ```
pub struct BattleSession<F: BattleFactory> {
    replayer: Replayer<F>,
    config: SessionConfig,
    intents: IntentLog,
    resolved: ResolvedLog,
    battle: Battle,
    loaded_len: usize,
    unacknowledged: Option<usize>,
    pending: Option<InteractionRequest>,
    next_request: u64,
}

impl<F: BattleFactory> BattleSession<F> {
    /// Start a new battle: `BattleStart` and the opening `StartTurn`.
    pub fn start(factory: F, config: SessionConfig) -> Self {
        let replayer = Replayer::new(factory);
        let battle = replayer.fresh();
        let mut session = Self {
            replayer,
            config,
            intents: IntentLog::new(),
            resolved: ResolvedLog::new(),
            battle,
            loaded_len: 0,
            unacknowledged: None,
            pending: None,
            next_request: 0,
        };

        session.push_system(Intent::BattleStart);
        let draw = session.battle.config().draw_for_turn(1);
        session.push_system(Intent::StartTurn { draw });
        session.loaded_len = session.intents.len();
        info!(seed = session.battle.config().seed, "battle session started");
        session
    }

    /// Resume from a stored intent log.
    ///
    /// Retry returns to the end of this log.
    pub fn load(factory: F, config: SessionConfig, intents: IntentLog) -> Result<Self, ReplayError> {
        let replayer = Replayer::new(factory);
        let replay = replayer.replay(&intents, intents.len())?;
        let loaded_len = intents.len();
        info!(intents = loaded_len, "battle session loaded");

        Ok(Self {
            replayer,
            config,
            intents,
            resolved: ResolvedLog::from_entries(replay.entries),
            battle: replay.battle,
            loaded_len,
            unacknowledged: None,
            pending: None,
            next_request: 0,
        })
    }

    /// Live battle.
    #[must_use]
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Snapshot of the live battle.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        self.battle.snapshot()
    }

    /// Intent log.
    #[must_use]
    pub fn intents(&self) -> &IntentLog {
        &self.intents
    }

    /// Resolved log.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedLog {
        &self.resolved
    }

    /// Length of the log the session was started or loaded with.
    #[must_use]
    pub fn loaded_len(&self) -> usize {
        self.loaded_len
    }

    /// Outstanding interaction request.
    #[must_use]
    pub fn pending_request(&self) -> Option<&InteractionRequest> {
        self.pending.as_ref()
    }

    /// Check if input is locked until an entry is acknowledged.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.unacknowledged.is_some()
    }

    /// Mark entries up to `index` as presented.
    pub fn acknowledge(&mut self, index: usize) {
        if self.unacknowledged.is_some_and(|locked| index >= locked) {
            self.unacknowledged = None;
        }
    }

    /// Register a resolver for the next submitted intent.
    pub fn resolver<R>(&mut self, resolver: R) -> ResolverHandle
    where
        R: Fn(&Battle) -> i64 + Send + Sync + 'static,
    {
        self.intents.resolver(resolver)
    }

    /// Submit a player intent.
    pub fn submit(&mut self, intent: Intent) -> Result<&ResolvedEntry, SessionError> {
        self.check_ready()?;
        let index = self.push(intent, IntentOrigin::Player)?;
        if self.config.lock_input {
            self.unacknowledged = Some(index);
        }
        Ok(&self.resolved.entries()[index])
    }

    /// End the turn and, unless the battle ended, start the next one.
    pub fn end_turn(&mut self) -> Result<&[ResolvedEntry], SessionError> {
        self.check_ready()?;
        let first = self.intents.len();
        let index = self.push(Intent::EndTurn, IntentOrigin::Player)?;

        if !self.battle.is_finished() {
            let draw = self.battle.config().draw_for_turn(self.battle.turn() + 1);
            self.push_system(Intent::StartTurn { draw });
        }
        if self.config.lock_input {
            self.unacknowledged = Some(self.intents.len() - 1);
        }
        debug!(index, turn = self.battle.turn(), "turn ended");
        Ok(&self.resolved.entries()[first..])
    }

    /// Play a card, opening a request if it needs choices.
    pub fn play(&mut self, card: CardId) -> Result<PlayProgress, SessionError> {
        self.check_ready()?;
        self.check_playable(card)?;
        let definition = self.battle.repository().definition_of(card);

        let mut kinds = Vec::new();
        if definition.target_shape() == TargetShape::SingleEnemy {
            kinds.push(RequestKind::ChooseTarget);
        }
        match definition.selection() {
            Some(SelectionZone::Hand) => kinds.push(RequestKind::ChooseHandCard),
            Some(SelectionZone::Discard) => kinds.push(RequestKind::ChooseDiscardCard),
            None => {}
        }

        if kinds.is_empty() {
            let entry = self.submit(Intent::play(card, Vec::new()))?;
            return Ok(PlayProgress::Resolved(entry.index));
        }
        self.open_request(card, Vec::new(), kinds)
    }

    /// Answer the outstanding request with one of its options.
    pub fn resolve_request(&mut self, choice: i64) -> Result<PlayProgress, SessionError> {
        let request = self.pending.as_ref().ok_or(SessionError::NoPendingRequest)?;
        request.resolve(choice)?;

        let Some(request) = self.pending.take() else {
            return Err(SessionError::NoPendingRequest);
        };
        let mut collected = request.collected.clone();
        collected.push(request.operation(choice));

        if !request.remaining.is_empty() {
            return self.open_request(request.card, collected, request.remaining);
        }
        let entry = self.submit(Intent::play(request.card, collected))?;
        Ok(PlayProgress::Resolved(entry.index))
    }

    /// Decline the outstanding request.
    pub fn reject_request(&mut self) -> Result<RequestOutcome, SessionError> {
        let request = self.pending.take().ok_or(SessionError::NoPendingRequest)?;
        debug!(request = request.id, card = %request.card, "request rejected");
        Ok(request.reject())
    }

    /// Withdraw the outstanding request.
    pub fn cancel_request(&mut self) -> Result<RequestOutcome, SessionError> {
        let request = self.pending.take().ok_or(SessionError::NoPendingRequest)?;
        debug!(request = request.id, card = %request.card, "request cancelled");
        Ok(request.cancel())
    }

    /// Undo back to before the most recent player intent.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        let index = self
            .intents
            .last_player_index(self.loaded_len)
            .ok_or(SessionError::NothingToUndo)?;
        info!(index, "undo");
        self.rebuild(index);
        Ok(())
    }

    /// Return to the state the session was started or loaded in.
    pub fn retry(&mut self) {
        info!(len = self.loaded_len, "retry");
        self.rebuild(self.loaded_len);
    }

    /// Battle state before intent `index`, without changing the session.
    pub fn reconstruct_at(&self, index: usize) -> Result<Replay, ReplayError> {
        self.replayer.reconstruct_at(&self.intents, index)
    }

    fn check_ready(&self) -> Result<(), SessionError> {
        if let Some(request) = &self.pending {
            return Err(SessionError::RequestPending(request.id));
        }
        if let Some(index) = self.unacknowledged {
            return Err(SessionError::InputLocked(index));
        }
        Ok(())
    }

    /// The checks `PlayCard` makes before any choice is read.
    fn check_playable(&self, card: CardId) -> Result<(), IntentError> {
        let battle = &self.battle;
        if battle.is_finished() {
            return Err(IntentError::BattleFinished);
        }
        if battle.phase() != Phase::PlayerAct {
            return Err(IntentError::WrongPhase {
                intent: "play-card",
                phase: battle.phase(),
            });
        }
        if !battle.repository().contains(card) {
            return Err(IntentError::UnknownCard(card));
        }
        if !battle.zones().contains(ZoneKind::Hand, card) {
            return Err(IntentError::CardNotInHand(card));
        }
        let cost = battle.runtime_cost(card);
        let available = battle.player().energy;
        if cost > available {
            return Err(IntentError::NotAffordable {
                card,
                cost,
                available,
            });
        }
        Ok(())
    }

    fn open_request(
        &mut self,
        card: CardId,
        collected: Vec<SubOperation>,
        mut kinds: Vec<RequestKind>,
    ) -> Result<PlayProgress, SessionError> {
        let kind = kinds.remove(0);
        let options: Vec<i64> = match kind {
            RequestKind::ChooseTarget => self
                .battle
                .legal_targets()
                .into_iter()
                .map(|id| i64::from(id.raw()))
                .collect(),
            RequestKind::ChooseHandCard => self
                .battle
                .legal_hand_selections(card)
                .into_iter()
                .map(|id| i64::from(id.raw()))
                .collect(),
            RequestKind::ChooseDiscardCard => self
                .battle
                .legal_discard_selections(card)
                .into_iter()
                .map(|id| i64::from(id.raw()))
                .collect(),
        };

        if options.is_empty() {
            let err = match kind {
                RequestKind::ChooseTarget => IntentError::MissingTarget(card),
                RequestKind::ChooseHandCard | RequestKind::ChooseDiscardCard => {
                    IntentError::MissingSelection(card)
                }
            };
            return Err(err.into());
        }

        self.next_request += 1;
        let id = self.next_request;
        debug!(request = id, %card, ?kind, options = options.len(), "request opened");
        self.pending = Some(InteractionRequest {
            id,
            card,
            kind,
            options,
            collected,
            remaining: kinds,
        });
        Ok(PlayProgress::Pending(id))
    }

    /// Append and resolve an intent; rejected intents leave no trace.
    fn push(&mut self, intent: Intent, origin: IntentOrigin) -> Result<usize, SessionError> {
        let index = self.intents.push(intent, origin);
        let logged = &self.intents.entries()[index];
        match self
            .battle
            .resolve(index, origin, &logged.intent, &self.intents.scope(index))
        {
            Ok(entry) => {
                self.resolved.push(entry);
                Ok(index)
            }
            Err(err) => {
                warn!(index, intent = logged.intent.name(), %err, "intent rejected");
                self.intents.truncate(index);
                Err(err.into())
            }
        }
    }

    fn push_system(&mut self, intent: Intent) {
        if let Err(err) = self.push(intent, IntentOrigin::System) {
            panic!("system intent rejected: {err}");
        }
    }

    /// Truncate to `len` intents and replay from scratch.
    ///
    /// Panics if the replay diverges from what was recorded.
    fn rebuild(&mut self, len: usize) {
        self.intents.truncate(len);
        let replay = match self.replayer.replay(&self.intents, len) {
            Ok(replay) => replay,
            Err(err) => panic!("replay of a recorded log failed: {err}"),
        };
        if self.battle.config().verify_replays {
            if let Err(err) = self.resolved.verify_prefix(&replay.entries) {
                panic!("replay diverged from the recorded log: {err}");
            }
        }

        self.battle = replay.battle;
        self.resolved = ResolvedLog::from_entries(replay.entries);
        self.pending = None;
        self.unacknowledged = None;
    }
}
