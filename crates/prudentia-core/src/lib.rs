//! # Prudentia Core Library
//!
//! Business logic for the Prudentia financial-planning wizard. The CLI is
//! a thin host over this crate; any other front end drives the same types.
//!
//! ## Architecture
//!
//! - **Questionnaire Engine**: a synchronous state machine over a two-level
//!   question bank. The first answer picks the branch, so the number of
//!   steps is only known after it.
//! - **Wizard Orchestrator**: sequences the income, risk, goals and
//!   dashboard stages and threads each stage's result forward.
//! - **Dashboard**: read-only summary of the collected data, with sample
//!   values for anything a stage did not supply.
//! - **Storage**: TOML-based configuration.
//!
//! ## Key Components
//!
//! - [`QuizEngine`]: branching questionnaire state machine
//! - [`QuestionBank`]: validated question schema
//! - [`WizardOrchestrator`]: stage sequencing
//! - [`Config`]: application configuration management

pub mod dashboard;
pub mod error;
pub mod events;
pub mod quiz;
pub mod storage;
pub mod wizard;

pub use dashboard::{DashboardSummary, SampleData};
pub use error::{BankError, ConfigError, QuizError, WizardError};
pub use events::{Event, PrimaryAction};
pub use quiz::{Question, QuestionBank, QuizEngine, RiskAnswers};
pub use storage::Config;
pub use wizard::{Goal, GoalType, IncomeData, InvestmentDetails, Sip, Stage, StageResult, WizardOrchestrator, WizardResults};
