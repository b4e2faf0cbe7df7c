//! Core error types for prudentia-core.
//!
//! One enum per concern. Each module returns its own enum; hosts that mix
//! them box the error at their boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::wizard::Stage;

/// Errors raised by the branching questionnaire engine.
///
/// `SelectionRequired` is the only user-facing error; the others are
/// contract violations by the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The current step has no answer yet.
    #[error("selection required")]
    SelectionRequired,

    /// Category label is not a key of the branch map.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// Value is not one of the current question's options.
    #[error("'{value}' is not an option for question {position}")]
    InvalidOption { position: usize, value: String },

    /// `go_back` at the category selector.
    #[error("already at the first question")]
    AtFirstStep,

    /// The traversal already produced its result.
    #[error("questionnaire already completed")]
    AlreadyCompleted,

    /// An answer list without the category answer in front.
    #[error("risk answers are empty; the category answer comes first")]
    MissingCategoryAnswer,
}

/// Question bank schema errors.
#[derive(Error, Debug)]
pub enum BankError {
    /// A category option has no branch.
    #[error("no branch defined for category '{0}'")]
    MissingBranch(String),

    /// A branch key is not a category option.
    #[error("branch '{0}' does not match any category option")]
    UnexpectedBranch(String),

    /// A branch has no questions.
    #[error("branch '{0}' has no questions")]
    EmptyBranch(String),

    /// A question has no options.
    #[error("question '{0}' has no options")]
    NoOptions(String),

    /// An option label appears twice within one question.
    #[error("option '{option}' is listed twice in question '{prompt}'")]
    DuplicateOption { prompt: String, option: String },

    /// Failed to read a bank file
    #[error("Failed to read question bank from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse bank TOML
    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Wizard orchestrator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// A stage other than the active one tried to complete.
    #[error("stage '{got}' completed out of order (active stage is '{expected}')")]
    OutOfOrder { expected: Stage, got: Stage },

    /// The result payload does not belong to the stage.
    #[error("result for stage '{got}' cannot complete stage '{stage}'")]
    ResultMismatch { stage: Stage, got: Stage },

    /// Only optional stages can be skipped.
    #[error("stage '{0}' is not optional")]
    NotOptional(Stage),

    /// The dashboard is the last stage and never completes.
    #[error("wizard already reached the dashboard")]
    Finished,

    /// Dashboard requested before every input stage finished.
    #[error("dashboard is not active yet (active stage is '{0}')")]
    NotAtDashboard(Stage),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key is not part of the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable config directory
    #[error("Config directory unavailable: {0}")]
    NoDataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_required_message() {
        assert_eq!(QuizError::SelectionRequired.to_string(), "selection required");
    }

    #[test]
    fn boxes_into_host_error() {
        let err: Box<dyn std::error::Error> = QuizError::UnknownCategory("Expert".into()).into();
        assert_eq!(err.to_string(), "unknown category 'Expert'");
    }

    #[test]
    fn out_of_order_names_both_stages() {
        let err = WizardError::OutOfOrder {
            expected: Stage::Income,
            got: Stage::Goals,
        };
        assert_eq!(
            err.to_string(),
            "stage 'Goals' completed out of order (active stage is 'Income')"
        );
    }
}
