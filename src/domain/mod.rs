pub mod enums;
pub mod error;
pub mod store;
pub mod task;
pub mod timer;

pub use enums::{Achievement, Category, PomodoroPhase, Priority, UiMode};
pub use error::{ImportFormatError, PersistenceError, ValidationError};
pub use store::TaskStore;
pub use task::{format_countdown, format_time, Subtask, Task};
pub use timer::{ActiveTimer, PhaseChange, Pomodoro, BREAK_SECS, WORK_SECS};
