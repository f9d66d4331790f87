//! Outcome resolution - pure mapping from final tallies to a result.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The final classification of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub together: bool,
}

/// The two mutually exclusive narrative endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Together,
    Alone,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        if self.together {
            OutcomeKind::Together
        } else {
            OutcomeKind::Alone
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Together => write!(f, "together"),
            OutcomeKind::Alone => write!(f, "alone"),
        }
    }
}

/// Resolve final tallies into an outcome.
///
/// `alone = total_steps - together_score`. Fails with `TiedScore` when the two
/// are equal, so callers must apply the tiebreaker first.
pub fn resolve(together_score: u32, total_steps: u32) -> Result<Outcome, EngineError> {
    let alone_score = total_steps
        .checked_sub(together_score)
        .ok_or(EngineError::ScoreExceedsSteps {
            together: together_score,
            steps: total_steps,
        })?;

    if together_score == alone_score {
        return Err(EngineError::TiedScore {
            together: together_score,
            alone: alone_score,
        });
    }

    Ok(Outcome {
        together: together_score > alone_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_majority() {
        assert_eq!(resolve(4, 4).unwrap(), Outcome { together: true });
        assert_eq!(resolve(3, 5).unwrap(), Outcome { together: true });
        assert_eq!(resolve(1, 4).unwrap(), Outcome { together: false });
        assert_eq!(resolve(0, 3).unwrap().kind(), OutcomeKind::Alone);
    }

    #[test]
    fn test_resolve_tie_is_error() {
        let err = resolve(2, 4).unwrap_err();
        assert!(matches!(err, EngineError::TiedScore { together: 2, alone: 2 }));

        // No decisions at all is also a tie.
        assert!(matches!(resolve(0, 0), Err(EngineError::TiedScore { .. })));
    }

    #[test]
    fn test_resolve_rejects_impossible_tally() {
        let err = resolve(5, 4).unwrap_err();
        assert!(matches!(err, EngineError::ScoreExceedsSteps { together: 5, steps: 4 }));
    }

    #[test]
    fn test_tiebreaker_breaks_any_even_tie() {
        for half in 0..10 {
            let steps = half * 2;
            assert!(resolve(half, steps).is_err());
            assert!(resolve(half + 1, steps + 1).unwrap().together);
            assert!(!resolve(half, steps + 1).unwrap().together);
        }
    }

    #[test]
    fn test_outcome_kind_display() {
        assert_eq!(OutcomeKind::Together.to_string(), "together");
        assert_eq!(Outcome { together: false }.kind().to_string(), "alone");
    }
}
