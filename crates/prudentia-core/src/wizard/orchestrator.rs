//! Linear stage orchestrator.
//!
//! Holds the active stage and every completed stage's result. Advances one
//! stage per accepted submission and never rewinds. Results flow forward
//! only: the dashboard reads them, nothing writes back into earlier stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contracts::{Goal, IncomeData};
use super::stage::Stage;
use crate::dashboard::{DashboardSummary, SampleData};
use crate::error::WizardError;
use crate::events::Event;
use crate::quiz::RiskAnswers;

/// Payload submitted when a stage completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "data", rename_all = "snake_case")]
pub enum StageResult {
    Income(IncomeData),
    RiskProfile(RiskAnswers),
    Goals(Vec<Goal>),
}

impl StageResult {
    /// The stage this payload belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            StageResult::Income(_) => Stage::Income,
            StageResult::RiskProfile(_) => Stage::RiskProfile,
            StageResult::Goals(_) => Stage::Goals,
        }
    }
}

/// Accumulated results, keyed by stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardResults {
    pub income: Option<IncomeData>,
    pub risk_answers: Option<RiskAnswers>,
    pub goals: Option<Vec<Goal>>,
}

/// Sequences the wizard stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardOrchestrator {
    session_id: String,
    started_at: DateTime<Utc>,
    active: Stage,
    results: WizardResults,
}

impl WizardOrchestrator {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            active: Stage::Income,
            results: WizardResults::default(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The stage the host should render.
    pub fn active_stage(&self) -> Stage {
        self.active
    }

    pub fn results(&self) -> &WizardResults {
        &self.results
    }

    pub fn is_finished(&self) -> bool {
        self.active == Stage::Dashboard
    }

    /// Step-indicator progress, `(index + 1) / stage count`.
    pub fn progress(&self) -> f64 {
        (self.active.index() + 1) as f64 / Stage::ALL.len() as f64
    }

    /// Store the active stage's result and move to the next stage.
    ///
    /// # Errors
    ///
    /// Rejects completion of any stage but the active one, payloads that
    /// belong to another stage, and anything once the dashboard is reached.
    /// Nothing is stored on error.
    pub fn complete_stage(&mut self, stage: Stage, result: StageResult) -> Result<Event, WizardError> {
        self.check_active(stage)?;

        if result.stage() != stage {
            tracing::error!(%stage, got = %result.stage(), "stage result does not match stage");
            return Err(WizardError::ResultMismatch {
                stage,
                got: result.stage(),
            });
        }

        match result {
            StageResult::Income(income) => self.results.income = Some(income),
            StageResult::RiskProfile(answers) => self.results.risk_answers = Some(answers),
            StageResult::Goals(goals) => self.results.goals = Some(goals),
        }

        let next_stage = self.step_forward(stage)?;
        tracing::info!(session = %self.session_id, %stage, %next_stage, "stage completed");
        Ok(Event::StageCompleted {
            stage,
            next_stage,
            at: Utc::now(),
        })
    }

    /// Move past an optional stage without data.
    pub fn skip_stage(&mut self, stage: Stage) -> Result<Event, WizardError> {
        self.check_active(stage)?;
        if !stage.is_optional() {
            return Err(WizardError::NotOptional(stage));
        }

        let next_stage = self.step_forward(stage)?;
        tracing::info!(session = %self.session_id, %stage, %next_stage, "stage skipped");
        Ok(Event::StageSkipped {
            stage,
            next_stage,
            at: Utc::now(),
        })
    }

    /// Build the dashboard from everything collected so far.
    pub fn dashboard(&self, samples: &SampleData) -> Result<DashboardSummary, WizardError> {
        if !self.is_finished() {
            return Err(WizardError::NotAtDashboard(self.active));
        }
        Ok(DashboardSummary::build(&self.results, samples))
    }

    fn check_active(&self, stage: Stage) -> Result<(), WizardError> {
        if self.is_finished() {
            return Err(WizardError::Finished);
        }
        if stage != self.active {
            tracing::error!(active = %self.active, %stage, "stage completed out of order");
            return Err(WizardError::OutOfOrder {
                expected: self.active,
                got: stage,
            });
        }
        Ok(())
    }

    fn step_forward(&mut self, stage: Stage) -> Result<Stage, WizardError> {
        let next = stage.next().ok_or(WizardError::Finished)?;
        self.active = next;
        Ok(next)
    }
}

impl Default for WizardOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
