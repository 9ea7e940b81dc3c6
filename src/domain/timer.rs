use super::enums::PomodoroPhase;
use uuid::Uuid;

/// Work session length in seconds
pub const WORK_SECS: u32 = 25 * 60;
/// Break length in seconds
pub const BREAK_SECS: u32 = 5 * 60;

/// The single task timer slot. Holding one value rather than a set is what
/// guarantees only one task accrues time per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTimer {
    #[default]
    Idle,
    Running(Uuid),
}

impl ActiveTimer {
    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Running(id) => Some(*id),
        }
    }

    pub fn is_running(&self, id: Uuid) -> bool {
        *self == Self::Running(id)
    }

    /// Pause if `id` is running, otherwise make `id` the running task
    /// (silently stopping whichever task held the slot).
    pub fn toggle(&mut self, id: Uuid) {
        *self = if self.is_running(id) {
            Self::Idle
        } else {
            Self::Running(id)
        };
    }

    pub fn stop(&mut self) {
        *self = Self::Idle;
    }

    /// Stop only if `id` holds the slot. Returns whether it did.
    pub fn stop_if(&mut self, id: Uuid) -> bool {
        if self.is_running(id) {
            *self = Self::Idle;
            true
        } else {
            false
        }
    }
}

/// Phase boundary crossed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseChange {
    /// A work session finished; now on break
    WorkFinished,
    /// A break finished; back to work
    BreakFinished,
}

/// Pomodoro countdown state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pomodoro {
    pub phase: PomodoroPhase,
    pub remaining: u32,
    pub running: bool,
    pub completed_sessions: u32,
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self {
            phase: PomodoroPhase::Work,
            remaining: WORK_SECS,
            running: false,
            completed_sessions: 0,
        }
    }
}

impl Pomodoro {
    /// Hard reset into a running work session, whatever the prior phase
    pub fn start(&mut self) {
        self.phase = PomodoroPhase::Work;
        self.remaining = WORK_SECS;
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continue the current phase from where it was paused
    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.phase = PomodoroPhase::Work;
        self.remaining = WORK_SECS;
    }

    /// Whether the countdown is untouched (not running, fresh work phase)
    pub fn is_idle(&self) -> bool {
        !self.running && self.phase == PomodoroPhase::Work && self.remaining == WORK_SECS
    }

    /// Advance one second. The running flag carries over a phase flip, so
    /// sessions auto-continue into the next phase.
    pub fn tick(&mut self) -> Option<PhaseChange> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }
        match self.phase {
            PomodoroPhase::Work => {
                self.completed_sessions += 1;
                self.phase = PomodoroPhase::Break;
                self.remaining = BREAK_SECS;
                Some(PhaseChange::WorkFinished)
            }
            PomodoroPhase::Break => {
                self.phase = PomodoroPhase::Work;
                self.remaining = WORK_SECS;
                Some(PhaseChange::BreakFinished)
            }
        }
    }

    /// Fraction of the current phase already elapsed (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        let total = match self.phase {
            PomodoroPhase::Work => WORK_SECS,
            PomodoroPhase::Break => BREAK_SECS,
        };
        1.0 - f64::from(self.remaining.min(total)) / f64::from(total)
    }
}
