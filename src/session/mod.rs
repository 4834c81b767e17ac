//! Dashboard session state
//!
//! Holds what the presentation layer shows for one client: the phase of the
//! current run, its report or error, and the active sentiment filter. Every
//! run is tagged with a generation number; writes from a run whose generation
//! is no longer current are dropped, so a slow abandoned run can never
//! overwrite a newer one.

use crate::analysis::{AnalysisReport, ClassifiedComment, RunPhase, Sentiment};
use parking_lot::Mutex;
use std::sync::Arc;

/// Proof that a caller started the run with this generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Consistent view of a session at one instant
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub phase: RunPhase,
    pub report: Option<Arc<AnalysisReport>>,
    pub error: Option<String>,
    pub filter: Option<Sentiment>,
}

impl SessionSnapshot {
    /// True while a run is between its start and its terminal phase
    pub fn is_loading(&self) -> bool {
        is_in_flight(self.phase)
    }
}

fn is_in_flight(phase: RunPhase) -> bool {
    !matches!(
        phase,
        RunPhase::Idle | RunPhase::Complete | RunPhase::Failed
    )
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    phase: RunPhase,
    report: Option<Arc<AnalysisReport>>,
    error: Option<String>,
    filter: Option<Sentiment>,
}

/// Per-client dashboard state shared between runs and the presentation layer
#[derive(Debug)]
pub struct DashboardSession {
    state: Mutex<SessionState>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState {
                generation: 0,
                phase: RunPhase::Idle,
                report: None,
                error: None,
                filter: None,
            }),
        }
    }

    /// Start a new run: clear report, charts, error and filter, and make the
    /// returned ticket the only one allowed to write
    pub fn begin_run(&self) -> RunTicket {
        let mut state = self.state.lock();
        if is_in_flight(state.phase) {
            tracing::debug!(
                "Abandoning run generation {} in phase {}",
                state.generation,
                state.phase
            );
        }

        state.generation += 1;
        state.phase = RunPhase::ExtractingId;
        state.report = None;
        state.error = None;
        state.filter = None;

        RunTicket {
            generation: state.generation,
        }
    }

    /// Move the run to `phase`; returns `false` when the ticket is stale
    pub fn advance(&self, ticket: &RunTicket, phase: RunPhase) -> bool {
        let mut state = self.state.lock();
        if !Self::is_current(&state, ticket) {
            return false;
        }
        state.phase = phase;
        true
    }

    /// Publish a completed report; returns `false` when the ticket is stale
    pub fn publish(&self, ticket: &RunTicket, report: Arc<AnalysisReport>) -> bool {
        let mut state = self.state.lock();
        if !Self::is_current(&state, ticket) {
            return false;
        }
        state.phase = RunPhase::Complete;
        state.report = Some(report);
        state.error = None;
        true
    }

    /// Publish a failure message; returns `false` when the ticket is stale
    pub fn fail(&self, ticket: &RunTicket, message: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if !Self::is_current(&state, ticket) {
            return false;
        }
        state.phase = RunPhase::Failed;
        state.report = None;
        state.error = Some(message.into());
        true
    }

    /// Show only comments with `filter`, or all comments with `None`
    pub fn select_filter(&self, filter: Option<Sentiment>) {
        self.state.lock().filter = filter;
    }

    /// Comments of the current report that pass the active filter
    pub fn filtered_comments(&self) -> Vec<ClassifiedComment> {
        let state = self.state.lock();
        match &state.report {
            Some(report) => report.result.filtered(state.filter).cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            generation: state.generation,
            phase: state.phase,
            report: state.report.clone(),
            error: state.error.clone(),
            filter: state.filter,
        }
    }

    fn is_current(state: &SessionState, ticket: &RunTicket) -> bool {
        if state.generation == ticket.generation {
            true
        } else {
            tracing::warn!(
                "Discarding update from superseded run - run_generation={}, current_generation={}",
                ticket.generation,
                state.generation
            );
            false
        }
    }
}
