//! Pack state machine
//!
//! ```text
//! Idle -> ConfigResolved -> WorkspacePrepared -> Generated -> Embedded
//!      -> Built -> Stored -> CleanedUp
//! ```
//!
//! `Failed` is reachable from every non-terminal state. `CleanedUp` and
//! `Failed` are terminal.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackState {
    Idle,
    ConfigResolved,
    WorkspacePrepared,
    Generated,
    Embedded,
    Built,
    Stored,
    CleanedUp,
    Failed,
}

impl PackState {
    /// The state that follows on success, if any.
    pub fn next(&self) -> Option<PackState> {
        match self {
            PackState::Idle => Some(PackState::ConfigResolved),
            PackState::ConfigResolved => Some(PackState::WorkspacePrepared),
            PackState::WorkspacePrepared => Some(PackState::Generated),
            PackState::Generated => Some(PackState::Embedded),
            PackState::Embedded => Some(PackState::Built),
            PackState::Built => Some(PackState::Stored),
            PackState::Stored => Some(PackState::CleanedUp),
            PackState::CleanedUp | PackState::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PackState::CleanedUp | PackState::Failed)
    }

    pub fn can_transition_to(&self, to: PackState) -> bool {
        if to == PackState::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

impl fmt::Display for PackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackState::Idle => "idle",
            PackState::ConfigResolved => "config-resolved",
            PackState::WorkspacePrepared => "workspace-prepared",
            PackState::Generated => "generated",
            PackState::Embedded => "embedded",
            PackState::Built => "built",
            PackState::Stored => "stored",
            PackState::CleanedUp => "cleaned-up",
            PackState::Failed => "failed",
        })
    }
}

/// Tracks the current state and every state visited.
#[derive(Debug, Clone)]
pub struct PackStateMachine {
    current: PackState,
    history: Vec<PackState>,
}

impl Default for PackStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PackStateMachine {
    pub fn new() -> Self {
        Self {
            current: PackState::Idle,
            history: vec![PackState::Idle],
        }
    }

    pub fn current(&self) -> PackState {
        self.current
    }

    pub fn history(&self) -> &[PackState] {
        &self.history
    }

    /// Move to `to`. Illegal transitions leave the machine unchanged and
    /// return `false`.
    pub fn advance(&mut self, to: PackState) -> bool {
        if !self.current.can_transition_to(to) {
            return false;
        }
        tracing::debug!("Pack state {} -> {}", self.current, to);
        self.current = to;
        self.history.push(to);
        true
    }

    /// Abort to `Failed`, returning the state the failure happened in.
    pub fn fail(&mut self) -> PackState {
        let at = self.current;
        self.advance(PackState::Failed);
        at
    }
}
