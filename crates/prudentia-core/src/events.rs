use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::RiskAnswers;
use crate::wizard::Stage;

/// Label of the questionnaire's primary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Next,
    Finish,
}

/// Every state change in the system produces an Event.
/// Hosts render from snapshots and react to completion events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Category chosen; branch answers and position were reset.
    CategorySelected {
        category: String,
        total_steps: usize,
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        position: usize,
        answer: String,
        at: DateTime<Utc>,
    },
    QuizAdvanced {
        position: usize,
        total_steps: usize,
        progress: f64,
        at: DateTime<Utc>,
    },
    /// Moved one step back; `cleared` answers after it were dropped.
    QuizSteppedBack {
        position: usize,
        cleared: usize,
        at: DateTime<Utc>,
    },
    /// Terminal transition of a traversal.
    QuizCompleted {
        answers: RiskAnswers,
        at: DateTime<Utc>,
    },
    /// Full render state of the questionnaire.
    QuizSnapshot {
        position: usize,
        total_steps: usize,
        prompt: String,
        options: Vec<String>,
        selected: Option<String>,
        progress: f64,
        progress_pct: f64,
        validation_error: Option<String>,
        action: PrimaryAction,
        at: DateTime<Utc>,
    },
    StageCompleted {
        stage: Stage,
        next_stage: Stage,
        at: DateTime<Utc>,
    },
    StageSkipped {
        stage: Stage,
        next_stage: Stage,
        at: DateTime<Utc>,
    },
}
