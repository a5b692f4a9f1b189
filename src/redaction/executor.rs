//! Applies a page plan.
//!
//! A page moves `Planned -> Reported` on a dry run, or
//! `Planned -> Staged -> Committed` on a live run. Staging detaches the
//! matched links and registers every redaction; committing applies them in
//! a single page-level pass. Any other transition is an error.

use std::fmt;

use tracing::debug;

use super::plan::PagePlan;
use super::strategy::{RedactablePage, RedactionSummary};
use crate::error::{RedactorError, RedactorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Planned,
    Reported,
    Staged,
    Committed,
}

impl ExecutionState {
    fn name(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Reported => "reported",
            Self::Staged => "staged",
            Self::Committed => "committed",
        }
    }

    /// Returns true once no further transition is allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Reported | Self::Committed)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drives one page through its redaction states.
pub struct PageExecutor<'p, P: RedactablePage> {
    page: &'p mut P,
    plan: PagePlan,
    state: ExecutionState,
}

impl<'p, P: RedactablePage> PageExecutor<'p, P> {
    pub fn new(page: &'p mut P, plan: PagePlan) -> Self {
        Self {
            page,
            plan,
            state: ExecutionState::Planned,
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    fn expect(&self, state: ExecutionState, action: &'static str) -> RedactorResult<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(RedactorError::InvalidTransition {
                page: self.plan.page + 1,
                state: self.state.name(),
                action,
            })
        }
    }

    /// Tallies the plan without touching the page.
    pub fn report(&mut self, summary: &mut RedactionSummary) -> RedactorResult<()> {
        self.expect(ExecutionState::Planned, "report")?;
        tally(&self.plan, summary);
        self.state = ExecutionState::Reported;
        Ok(())
    }

    /// Detaches matched links and registers every redaction.
    pub fn stage(&mut self) -> RedactorResult<()> {
        self.expect(ExecutionState::Planned, "stage")?;

        for link in &self.plan.matched_links {
            self.page.delete_link(link)?;
        }
        for action in &self.plan.actions {
            self.page.add_redaction(action)?;
        }

        self.state = ExecutionState::Staged;
        Ok(())
    }

    /// Applies all staged redactions at once, then tallies.
    pub fn commit(&mut self, summary: &mut RedactionSummary) -> RedactorResult<()> {
        self.expect(ExecutionState::Staged, "commit")?;

        if self.plan.actions.is_empty() {
            debug!(page = self.plan.page + 1, "nothing to apply");
        } else {
            self.page.apply_redactions()?;
        }

        tally(&self.plan, summary);
        self.state = ExecutionState::Committed;
        Ok(())
    }
}

fn tally(plan: &PagePlan, summary: &mut RedactionSummary) {
    summary.pages_processed += 1;
    summary.links_removed += plan.links_removed();
    summary.text_instances_redacted += plan.text_instances();
    if !plan.is_noop() {
        summary.pages_modified += 1;
    }
}

/// Runs a page to its terminal state for the given mode.
pub fn execute_page<P: RedactablePage>(
    page: &mut P,
    plan: PagePlan,
    dry_run: bool,
    summary: &mut RedactionSummary,
) -> RedactorResult<ExecutionState> {
    let mut executor = PageExecutor::new(page, plan);
    if dry_run {
        executor.report(summary)?;
    } else {
        executor.stage()?;
        executor.commit(summary)?;
    }
    Ok(executor.state())
}
