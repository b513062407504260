//! Run-level session state.
//!
//! A session is idle until the server announces a run, running until the
//! run completes or fails, and completed until the next run starts. The
//! phase is a single enum so "active" and "completed" can never both hold.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No run yet, or the last run was aborted by an error.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The last run completed. Cleared by the next run start.
    Completed,
}

impl SessionPhase {
    pub fn is_active(self) -> bool {
        self == SessionPhase::Running
    }

    pub fn is_completed(self) -> bool {
        self == SessionPhase::Completed
    }
}

/// State of the current (or last) research run.
#[derive(Debug, Clone, Default)]
pub struct RunSession {
    phase: SessionPhase,
    started_at: Option<DateTime<Utc>>,
    ticking: bool,
}

impl RunSession {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_completed(&self) -> bool {
        self.phase.is_completed()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Whether the elapsed-time display should be refreshed.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Enter the running phase and start the elapsed-time clock.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.phase = SessionPhase::Running;
        self.started_at = Some(now);
        self.ticking = true;
    }

    pub fn complete(&mut self) {
        self.phase = SessionPhase::Completed;
        self.ticking = false;
    }

    /// End the run without completing it. The session becomes idle.
    pub fn abort(&mut self) {
        self.phase = SessionPhase::Idle;
        self.ticking = false;
    }

    /// Whole seconds since the run started, never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        self.started_at
            .map(|started| u64::try_from((now - started).num_seconds()).unwrap_or(0))
    }
}

/// Format seconds as `mm:ss`. Minutes keep counting past 99.
pub fn format_elapsed(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_phase_transitions() {
        let mut session = RunSession::default();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.is_active());
        assert!(!session.is_completed());

        session.start(Utc::now());
        assert!(session.is_active());
        assert!(session.is_ticking());

        session.complete();
        assert!(session.is_completed());
        assert!(!session.is_active());
        assert!(!session.is_ticking());

        session.start(Utc::now());
        session.abort();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.is_ticking());
    }

    #[test]
    fn test_elapsed_secs_floors() {
        let mut session = RunSession::default();
        let start = Utc::now();
        assert_eq!(session.elapsed_secs(start), None);

        session.start(start);
        assert_eq!(
            session.elapsed_secs(start + Duration::milliseconds(65_900)),
            Some(65)
        );
        assert_eq!(session.elapsed_secs(start - Duration::seconds(3)), Some(0));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(6000), "100:00");
    }
}
