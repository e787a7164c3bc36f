use crate::engines::generation::genome::Genome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Converged,
    Stagnant,
    Cancelled,
    Exhausted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Converged | RunState::Stagnant | RunState::Cancelled | RunState::Exhausted
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Converged => "converged",
            RunState::Stagnant => "stagnant",
            RunState::Cancelled => "cancelled",
            RunState::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// Immutable view of a run, replaced wholesale on every publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Identifies the run that published this snapshot; 0 when idle
    pub run_id: u64,
    pub state: RunState,
    pub generation: usize,
    pub best_score: f64,
    pub best_genome: Option<Genome>,
    pub stagnation: usize,
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

impl RunStatus {
    pub fn idle() -> Self {
        Self {
            run_id: 0,
            state: RunState::Idle,
            generation: 0,
            best_score: f64::INFINITY,
            best_genome: None,
            stagnation: 0,
            message: String::new(),
            updated_at: Utc::now(),
        }
    }
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// Final result of a run. Every terminal state carries the best genome found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub state: RunState,
    pub reason: String,
    /// Index of the last generation that was evaluated, or 0 when the run was
    /// cancelled before generation 0 ran. `best_score` is infinite in that case.
    pub generation: usize,
    pub best_score: f64,
    pub best_genome: Genome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Cooperative cancellation flag, checked by the engine at generation boundaries
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Converged.is_terminal());
        assert!(RunState::Stagnant.is_terminal());
        assert!(RunState::Cancelled.is_terminal());
        assert!(RunState::Exhausted.is_terminal());
    }

    #[test]
    fn test_cancellation_token_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }
}
