//! Pending interaction requests.
//!
//! When a card needs a choice ("choose a target", "choose a hand card") the
//! session holds an `InteractionRequest` listing the legal options until the
//! presentation layer answers it. Only requests can be cancelled; resolved
//! intents are final.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{EnemyId, SessionError};
use crate::history::{Deferred, SubOperation};

/// The choice a request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// An active enemy.
    ChooseTarget,
    /// A card in hand.
    ChooseHandCard,
    /// A card in the discard pile.
    ChooseDiscardCard,
}

/// How a request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestOutcome {
    /// An option was picked.
    Resolved {
        /// Request id.
        request: u64,
        /// Picked option.
        choice: i64,
    },
    /// The player declined.
    Rejected {
        /// Request id.
        request: u64,
    },
    /// The presentation layer withdrew the request.
    Cancelled {
        /// Request id.
        request: u64,
    },
}

/// A choice the player must make before a card can be played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRequest {
    /// Session-unique id.
    pub id: u64,
    /// Card waiting to be played.
    pub card: CardId,
    /// Choice asked for.
    pub kind: RequestKind,
    /// Legal options, as raw ids.
    pub options: Vec<i64>,
    /// Choices already made for this card.
    pub collected: Vec<SubOperation>,
    /// Choices still to ask for after this one.
    pub remaining: Vec<RequestKind>,
}

impl InteractionRequest {
    /// Pick an option.
    pub fn resolve(&self, choice: i64) -> Result<RequestOutcome, SessionError> {
        if !self.options.contains(&choice) {
            return Err(SessionError::InvalidChoice(choice));
        }
        Ok(RequestOutcome::Resolved {
            request: self.id,
            choice,
        })
    }

    /// Decline.
    #[must_use]
    pub fn reject(&self) -> RequestOutcome {
        RequestOutcome::Rejected { request: self.id }
    }

    /// Withdraw.
    #[must_use]
    pub fn cancel(&self) -> RequestOutcome {
        RequestOutcome::Cancelled { request: self.id }
    }

    /// Sub-operation for a picked option.
    ///
    /// Options are produced from real ids, so conversion cannot fail for a
    /// choice that passed `resolve`.
    #[must_use]
    pub fn operation(&self, choice: i64) -> SubOperation {
        let raw = u32::try_from(choice).unwrap_or_else(|_| panic!("option {choice} is not an id"));
        match self.kind {
            RequestKind::ChooseTarget => SubOperation::TargetEnemy(Deferred::Value(EnemyId::new(raw))),
            RequestKind::ChooseHandCard => SubOperation::SelectHandCard(Deferred::Value(CardId::new(raw))),
            RequestKind::ChooseDiscardCard => {
                SubOperation::SelectDiscardCard(Deferred::Value(CardId::new(raw)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> InteractionRequest {
        InteractionRequest {
            id: 3,
            card: CardId::new(5),
            kind: RequestKind::ChooseTarget,
            options: vec![0, 2],
            collected: Vec::new(),
            remaining: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_checks_options() {
        let request = request();

        assert_eq!(
            request.resolve(2),
            Ok(RequestOutcome::Resolved { request: 3, choice: 2 })
        );
        assert_eq!(request.resolve(1), Err(SessionError::InvalidChoice(1)));
    }

    #[test]
    fn test_reject_and_cancel() {
        let request = request();

        assert_eq!(request.reject(), RequestOutcome::Rejected { request: 3 });
        assert_eq!(request.cancel(), RequestOutcome::Cancelled { request: 3 });
    }

    #[test]
    fn test_operation_for_choice() {
        assert_eq!(
            request().operation(2),
            SubOperation::TargetEnemy(Deferred::Value(EnemyId::new(2)))
        );
    }
}
