//! Append-only intent log with its resolver side table.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::intent::{Deferred, FromResolved, Intent, IntentOrigin, ResolverHandle};
use crate::battle::Battle;
use crate::core::IntentError;

/// A deferred-value resolver: a pure function of the live battle.
///
/// Must return a non-negative id. Negative results are invariant violations
/// and panic at evaluation.
pub type ResolverFn = Arc<dyn Fn(&Battle) -> i64 + Send + Sync>;

/// An intent as recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedIntent {
    /// The intent.
    pub intent: Intent,
    /// Who issued it.
    pub origin: IntentOrigin,
}

/// Append-only intent sequence.
///
/// The log plus a battle factory is everything needed to rebuild a battle:
/// snapshots and resolved values are all recomputed from it.
///
/// ```
/// use ccg_battle::history::{Deferred, Intent, IntentLog, IntentOrigin};
///
/// let mut log = IntentLog::new();
/// log.push(Intent::BattleStart, IntentOrigin::System);
///
/// // First card in hand, whatever it turns out to be.
/// let first = log.resolver(|battle| {
///     battle.hand().next().map_or(0, |card| i64::from(card.raw()))
/// });
/// let index = log.push(
///     Intent::PlayCard { card: Deferred::Resolver(first), operations: vec![] },
///     IntentOrigin::Player,
/// );
///
/// assert_eq!(index, 1);
/// assert_eq!(first.intent, 1);
/// ```
#[derive(Clone, Default)]
pub struct IntentLog {
    entries: Vec<LoggedIntent>,
    resolvers: FxHashMap<ResolverHandle, ResolverFn>,
    next_slot: u32,
}

impl IntentLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of intents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Intent at an index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LoggedIntent> {
        self.entries.get(index)
    }

    /// All intents in order.
    #[must_use]
    pub fn entries(&self) -> &[LoggedIntent] {
        &self.entries
    }

    /// Number of registered resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Register a resolver for the next intent to be pushed.
    pub fn resolver<F>(&mut self, resolver: F) -> ResolverHandle
    where
        F: Fn(&Battle) -> i64 + Send + Sync + 'static,
    {
        let handle = ResolverHandle {
            intent: self.entries.len(),
            slot: self.next_slot,
        };
        self.next_slot += 1;
        self.resolvers.insert(handle, Arc::new(resolver));
        handle
    }

    /// Append an intent, returning its index.
    pub fn push(&mut self, intent: Intent, origin: IntentOrigin) -> usize {
        self.entries.push(LoggedIntent { intent, origin });
        self.next_slot = 0;
        self.entries.len() - 1
    }

    /// Keep only the first `len` intents and their resolvers.
    ///
    /// Resolvers registered for an intent that was never pushed are dropped
    /// too.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
        self.resolvers.retain(|handle, _| handle.intent < len);
        self.next_slot = 0;
    }

    /// Index of the most recent player intent at or after `floor`.
    #[must_use]
    pub fn last_player_index(&self, floor: usize) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .skip(floor)
            .rev()
            .find(|(_, logged)| logged.origin == IntentOrigin::Player)
            .map(|(index, _)| index)
    }

    /// Resolver scope for the intent at `index`.
    #[must_use]
    pub fn scope(&self, index: usize) -> ResolverScope<'_> {
        ResolverScope {
            intent: index,
            table: Some(&self.resolvers),
        }
    }
}

impl fmt::Debug for IntentLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentLog")
            .field("entries", &self.entries)
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

/// Resolvers visible to one intent's resolution.
#[derive(Clone, Copy)]
pub struct ResolverScope<'a> {
    intent: usize,
    table: Option<&'a FxHashMap<ResolverHandle, ResolverFn>>,
}

impl ResolverScope<'static> {
    /// Scope for intents that carry concrete values only.
    #[must_use]
    pub fn none() -> Self {
        ResolverScope {
            intent: 0,
            table: None,
        }
    }
}

impl ResolverScope<'_> {
    /// Produce the concrete value of a deferred id.
    ///
    /// Panics when a resolver returns a negative id or when the handle has no
    /// resolver in this scope; both are programming errors. An id outside the
    /// id space is an invalid intent.
    pub fn evaluate<T>(&self, value: &Deferred<T>, battle: &Battle) -> Result<T, IntentError>
    where
        T: FromResolved + Copy,
    {
        let handle = match value {
            Deferred::Value(value) => return Ok(*value),
            Deferred::Resolver(handle) => *handle,
        };

        assert_eq!(
            handle.intent, self.intent,
            "resolver handle belongs to intent {}, not {}",
            handle.intent, self.intent
        );
        let resolver = self
            .table
            .and_then(|table| table.get(&handle))
            .unwrap_or_else(|| panic!("no resolver registered for {handle:?}"));

        let raw = resolver(battle);
        if raw < 0 {
            panic!("resolver {handle:?} produced negative id {raw}");
        }
        T::from_resolved(raw).ok_or(IntentError::InvalidId(raw))
    }
}

impl fmt::Debug for ResolverScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverScope")
            .field("intent", &self.intent)
            .finish_non_exhaustive()
    }
}
