//! Branching questionnaire engine.
//!
//! A synchronous state machine over a [`QuestionBank`]. Position 0 is the
//! category selector; positions `1..=N` walk the selected category's branch.
//!
//! ## State Transitions
//!
//! ```text
//! Selecting(pos 0) --advance--> Answering(pos 1..N) --advance at N--> Completed
//!        ^                              |
//!        +------ select_category -------+
//! ```
//!
//! The step count depends on the category answer, so `total_steps` and
//! progress are derived on every read and never stored.

use chrono::Utc;
use std::sync::Arc;

use super::answers::RiskAnswers;
use super::bank::{Question, QuestionBank};
use crate::error::QuizError;
use crate::events::{Event, PrimaryAction};

/// Message surfaced to the user when advancing past an unanswered step.
pub const DEFAULT_VALIDATION_MESSAGE: &str = "Please select an option to proceed.";

/// Mutable state of one traversal.
#[derive(Debug, Clone, Default)]
struct QuizState {
    /// 0 = category selector, 1..N = branch question.
    position: usize,
    category_answer: Option<String>,
    /// Slot `i` answers branch question `i + 1`.
    branch_answers: Vec<Option<String>>,
    validation_error: Option<String>,
    completed: bool,
}

/// Drives one traversal of the risk questionnaire.
///
/// Consumed once: after the terminal `advance` every command fails with
/// [`QuizError::AlreadyCompleted`]. Start a new engine for a new traversal.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    bank: Arc<QuestionBank>,
    state: QuizState,
    validation_message: String,
}

impl QuizEngine {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            state: QuizState::default(),
            validation_message: DEFAULT_VALIDATION_MESSAGE.to_string(),
        }
    }

    /// Override the message stored on a failed `advance`.
    pub fn with_validation_message(mut self, message: impl Into<String>) -> Self {
        self.validation_message = message.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn category_answer(&self) -> Option<&str> {
        self.state.category_answer.as_deref()
    }

    pub fn branch_answers(&self) -> &[Option<String>] {
        &self.state.branch_answers
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.state.validation_error.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    /// `1 + branch length` once a category is chosen, else 1.
    pub fn total_steps(&self) -> usize {
        1 + self.active_branch().map_or(0, <[Question]>::len)
    }

    /// Fraction of the traversal reached, `(position + 1) / total_steps`.
    pub fn current_progress(&self) -> f64 {
        (self.state.position + 1) as f64 / self.total_steps() as f64
    }

    pub fn is_last_step(&self) -> bool {
        self.state.category_answer.is_some() && self.state.position + 1 == self.total_steps()
    }

    pub fn current_question(&self) -> &Question {
        match self.active_branch() {
            Some(branch) if self.state.position > 0 => &branch[self.state.position - 1],
            _ => self.bank.first_question(),
        }
    }

    pub fn current_answer(&self) -> Option<&str> {
        match self.state.position {
            0 => self.state.category_answer.as_deref(),
            p => self.state.branch_answers.get(p - 1)?.as_deref(),
        }
    }

    /// Build a full render snapshot.
    pub fn snapshot(&self) -> Event {
        let question = self.current_question();
        let progress = self.current_progress();
        Event::QuizSnapshot {
            position: self.state.position,
            total_steps: self.total_steps(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            selected: self.current_answer().map(str::to_string),
            progress,
            progress_pct: progress * 100.0,
            validation_error: self.state.validation_error.clone(),
            action: if self.is_last_step() {
                PrimaryAction::Finish
            } else {
                PrimaryAction::Next
            },
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Choose the category, resetting all branch progress.
    ///
    /// Returns `Ok(None)` when the same category is re-selected at the
    /// category step, which leaves the answers untouched.
    pub fn select_category(&mut self, label: &str) -> Result<Option<Event>, QuizError> {
        self.ensure_active()?;

        let Some(branch_len) = self.bank.branch_len(label) else {
            tracing::error!(category = label, "category is not part of the question bank");
            return Err(QuizError::UnknownCategory(label.to_string()));
        };

        if self.state.position == 0 && self.state.category_answer.as_deref() == Some(label) {
            return Ok(None);
        }

        if let Some(previous) = self.state.category_answer.as_deref() {
            tracing::debug!(from = previous, to = label, "category changed, branch answers reset");
        }
        self.state.category_answer = Some(label.to_string());
        self.state.branch_answers = vec![None; branch_len];
        self.state.position = 0;
        self.state.validation_error = None;

        Ok(Some(Event::CategorySelected {
            category: label.to_string(),
            total_steps: self.total_steps(),
            at: Utc::now(),
        }))
    }

    /// Answer the question at the current position.
    ///
    /// At position 0 this selects the category.
    pub fn answer_current(&mut self, value: &str) -> Result<Event, QuizError> {
        self.ensure_active()?;
        let position = self.state.position;

        if position == 0 {
            self.select_category(value)?;
        } else {
            if !self.current_question().has_option(value) {
                tracing::error!(position, value, "answer is not an option of the current question");
                return Err(QuizError::InvalidOption {
                    position,
                    value: value.to_string(),
                });
            }
            self.state.branch_answers[position - 1] = Some(value.to_string());
            self.state.validation_error = None;
        }

        Ok(Event::AnswerRecorded {
            position,
            answer: value.to_string(),
            at: Utc::now(),
        })
    }

    /// Move forward one step, or finish the traversal at the last step.
    ///
    /// Fails with [`QuizError::SelectionRequired`] and records the
    /// validation message when the current step is unanswered.
    pub fn advance(&mut self) -> Result<Event, QuizError> {
        self.ensure_active()?;

        if self.current_answer().is_none() {
            return Err(self.block());
        }

        let total_steps = self.total_steps();
        if self.state.position + 1 < total_steps {
            self.state.position += 1;
            tracing::debug!(position = self.state.position, total_steps, "quiz advanced");
            return Ok(Event::QuizAdvanced {
                position: self.state.position,
                total_steps,
                progress: self.current_progress(),
                at: Utc::now(),
            });
        }

        let answers = match self.state.category_answer.as_deref() {
            Some(category) => RiskAnswers::assemble(category, &self.state.branch_answers),
            None => None,
        };
        let Some(answers) = answers else {
            return Err(self.block());
        };

        self.state.completed = true;
        tracing::info!(
            category = answers.category(),
            branch_answers = answers.branch_answers().len(),
            "quiz completed"
        );
        Ok(Event::QuizCompleted {
            answers,
            at: Utc::now(),
        })
    }

    /// Step back one position, clearing every answer after it.
    pub fn go_back(&mut self) -> Result<Event, QuizError> {
        self.ensure_active()?;
        if self.state.position == 0 {
            return Err(QuizError::AtFirstStep);
        }

        self.state.position -= 1;
        let cleared = self
            .state
            .branch_answers
            .iter_mut()
            .skip(self.state.position)
            .filter_map(Option::take)
            .count();
        self.state.validation_error = None;

        tracing::debug!(position = self.state.position, cleared, "quiz stepped back");
        Ok(Event::QuizSteppedBack {
            position: self.state.position,
            cleared,
            at: Utc::now(),
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    fn active_branch(&self) -> Option<&[Question]> {
        self.state
            .category_answer
            .as_deref()
            .and_then(|c| self.bank.branch(c))
    }

    fn ensure_active(&self) -> Result<(), QuizError> {
        if self.state.completed {
            return Err(QuizError::AlreadyCompleted);
        }
        Ok(())
    }

    fn block(&mut self) -> QuizError {
        tracing::warn!(position = self.state.position, "advance blocked: step is unanswered");
        self.state.validation_error = Some(self.validation_message.clone());
        QuizError::SelectionRequired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QuizEngine {
        QuizEngine::new(Arc::new(QuestionBank::default()))
    }

    fn answer_all_first_options(engine: &mut QuizEngine) {
        loop {
            let first = engine.current_question().options[0].clone();
            engine.answer_current(&first).unwrap();
            if engine.is_last_step() {
                break;
            }
            engine.advance().unwrap();
        }
    }

    #[test]
    fn initial_state() {
        let engine = engine();
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.total_steps(), 1);
        assert_eq!(engine.current_progress(), 1.0);
        assert!(engine.category_answer().is_none());
        assert_eq!(
            engine.current_question().prompt,
            "How would you describe your investment knowledge?"
        );
    }

    #[test]
    fn select_category_sizes_branch() {
        let mut engine = engine();
        let event = engine.select_category("Moderate").unwrap();
        assert!(matches!(
            event,
            Some(Event::CategorySelected { total_steps: 8, .. })
        ));
        assert_eq!(engine.branch_answers(), vec![None::<String>; 7].as_slice());
        assert!((engine.current_progress() - 1.0 / 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reselecting_same_category_at_first_step_is_noop() {
        let mut engine = engine();
        engine.select_category("Basic").unwrap();
        assert_eq!(engine.select_category("Basic").unwrap(), None);
        assert_eq!(engine.category_answer(), Some("Basic"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut engine = engine();
        let err = engine.select_category("Expert").unwrap_err();
        assert_eq!(err, QuizError::UnknownCategory("Expert".to_string()));
        assert!(engine.category_answer().is_none());
    }

    #[test]
    fn advance_without_category_sets_validation_error() {
        let mut engine = engine();
        assert_eq!(engine.advance().unwrap_err(), QuizError::SelectionRequired);
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.validation_error(), Some(DEFAULT_VALIDATION_MESSAGE));

        engine.answer_current("None").unwrap();
        assert!(engine.validation_error().is_none());
    }

    #[test]
    fn answering_branch_question_clears_validation_error() {
        let mut engine = engine();
        engine.select_category("Moderate").unwrap();
        engine.advance().unwrap();
        engine.answer_current("Multiple assets").unwrap();
        engine.advance().unwrap();

        assert_eq!(engine.advance().unwrap_err(), QuizError::SelectionRequired);
        assert_eq!(engine.position(), 2);
        assert!(engine.validation_error().is_some());

        let option = engine.current_question().options[0].clone();
        engine.answer_current(&option).unwrap();
        assert!(engine.validation_error().is_none());
        assert_eq!(engine.position(), 2);
    }

    #[test]
    fn custom_validation_message() {
        let mut engine = engine().with_validation_message("Pick one");
        let _ = engine.advance();
        assert_eq!(engine.validation_error(), Some("Pick one"));
    }

    #[test]
    fn invalid_option_is_rejected() {
        let mut engine = engine();
        engine.select_category("Basic").unwrap();
        engine.advance().unwrap();

        let err = engine.answer_current("Maybe").unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidOption {
                position: 1,
                value: "Maybe".to_string()
            }
        );
        assert_eq!(engine.branch_answers()[0], None);
    }

    #[test]
    fn answer_can_be_changed_before_advancing() {
        let mut engine = engine();
        engine.select_category("Basic").unwrap();
        engine.advance().unwrap();
        engine.answer_current("Yes").unwrap();
        engine.answer_current("No").unwrap();
        assert_eq!(engine.current_answer(), Some("No"));
    }

    #[test]
    fn completes_with_ordered_answers() {
        let mut engine = engine();
        engine.select_category("Advanced").unwrap();
        engine.advance().unwrap();
        answer_all_first_options(&mut engine);

        assert!(engine.is_last_step());
        assert_eq!(engine.current_progress(), 1.0);

        let Event::QuizCompleted { answers, .. } = engine.advance().unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(answers.category(), "Advanced");
        assert_eq!(answers.as_slice().len(), 8);
        assert_eq!(answers.branch_answers()[1], "Hedging");
        assert!(engine.is_completed());
    }

    #[test]
    fn completed_engine_rejects_commands() {
        let mut engine = engine();
        engine.select_category("None").unwrap();
        engine.advance().unwrap();
        answer_all_first_options(&mut engine);
        engine.advance().unwrap();

        assert_eq!(engine.advance().unwrap_err(), QuizError::AlreadyCompleted);
        assert_eq!(engine.select_category("Basic").unwrap_err(), QuizError::AlreadyCompleted);
        assert_eq!(engine.answer_current("Yes").unwrap_err(), QuizError::AlreadyCompleted);
        assert_eq!(engine.go_back().unwrap_err(), QuizError::AlreadyCompleted);
    }

    #[test]
    fn go_back_clears_downstream_answers() {
        let mut engine = engine();
        engine.select_category("Basic").unwrap();
        engine.advance().unwrap();
        engine.answer_current("Yes").unwrap();
        engine.advance().unwrap();
        engine.answer_current("Buy more").unwrap();
        engine.advance().unwrap();
        engine.answer_current("3-5 years").unwrap();

        let event = engine.go_back().unwrap();
        assert!(matches!(
            event,
            Event::QuizSteppedBack {
                position: 2,
                cleared: 1,
                ..
            }
        ));
        assert_eq!(engine.current_answer(), Some("Buy more"));
        assert_eq!(engine.branch_answers()[2], None);
    }

    #[test]
    fn go_back_to_selector_keeps_category() {
        let mut engine = engine();
        engine.select_category("Basic").unwrap();
        engine.advance().unwrap();
        engine.answer_current("Yes").unwrap();
        engine.go_back().unwrap();

        assert_eq!(engine.position(), 0);
        assert_eq!(engine.category_answer(), Some("Basic"));
        assert!(engine.branch_answers().iter().all(Option::is_none));
        assert_eq!(engine.go_back().unwrap_err(), QuizError::AtFirstStep);
    }

    #[test]
    fn snapshot_reports_finish_on_last_step() {
        let mut engine = engine();
        let Event::QuizSnapshot { action, total_steps, .. } = engine.snapshot() else {
            panic!("expected snapshot");
        };
        assert_eq!(action, PrimaryAction::Next);
        assert_eq!(total_steps, 1);

        engine.select_category("None").unwrap();
        engine.advance().unwrap();
        answer_all_first_options(&mut engine);

        let Event::QuizSnapshot {
            action,
            progress_pct,
            selected,
            ..
        } = engine.snapshot()
        else {
            panic!("expected snapshot");
        };
        assert_eq!(action, PrimaryAction::Finish);
        assert!((progress_pct - 100.0).abs() < 1e-9);
        assert_eq!(selected.as_deref(), Some("None"));
    }
}
