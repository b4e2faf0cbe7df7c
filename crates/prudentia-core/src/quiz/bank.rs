//! Question bank: the static schema of the risk questionnaire.
//!
//! The first question selects a category; each category maps to an ordered
//! branch of follow-up questions. Branching is exactly one level deep, so
//! the whole schema is a flat keyed lookup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::BankError;

/// A prompt with its ordered option labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: &[&str]) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// Unvalidated bank layout as written in TOML.
#[derive(Debug, Deserialize)]
struct BankDocument {
    first_question: Question,
    #[serde(default)]
    branches: IndexMap<String, Vec<Question>>,
}

/// Validated question bank.
///
/// Immutable once built; share it behind an `Arc` between engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BankDocument")]
pub struct QuestionBank {
    first_question: Question,
    branches: IndexMap<String, Vec<Question>>,
}

impl TryFrom<BankDocument> for QuestionBank {
    type Error = BankError;

    fn try_from(doc: BankDocument) -> Result<Self, Self::Error> {
        QuestionBank::new(doc.first_question, doc.branches)
    }
}

impl QuestionBank {
    /// Build a bank, checking that categories and branches line up.
    ///
    /// # Errors
    ///
    /// Returns a [`BankError`] if a category has no branch, a branch has no
    /// category, a branch is empty, or a question has no (or duplicate)
    /// options.
    pub fn new(
        first_question: Question,
        branches: IndexMap<String, Vec<Question>>,
    ) -> Result<Self, BankError> {
        check_options(&first_question)?;

        for category in &first_question.options {
            let branch = branches
                .get(category)
                .ok_or_else(|| BankError::MissingBranch(category.clone()))?;
            if branch.is_empty() {
                return Err(BankError::EmptyBranch(category.clone()));
            }
            for question in branch {
                check_options(question)?;
            }
        }

        if let Some(extra) = branches.keys().find(|k| !first_question.has_option(k)) {
            return Err(BankError::UnexpectedBranch(extra.clone()));
        }

        Ok(Self {
            first_question,
            branches,
        })
    }

    /// Parse and validate a bank from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, BankError> {
        let doc: BankDocument = toml::from_str(content)?;
        Self::try_from(doc)
    }

    /// Read and validate a bank file.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), categories = bank.categories().len(), "loaded question bank");
        Ok(bank)
    }

    pub fn first_question(&self) -> &Question {
        &self.first_question
    }

    /// Category labels in selector order.
    pub fn categories(&self) -> &[String] {
        &self.first_question.options
    }

    pub fn branch(&self, category: &str) -> Option<&[Question]> {
        self.branches.get(category).map(Vec::as_slice)
    }

    pub fn branch_len(&self, category: &str) -> Option<usize> {
        self.branches.get(category).map(Vec::len)
    }
}

fn check_options(question: &Question) -> Result<(), BankError> {
    if question.options.is_empty() {
        return Err(BankError::NoOptions(question.prompt.clone()));
    }
    let mut seen = HashSet::new();
    for option in &question.options {
        if !seen.insert(option.as_str()) {
            return Err(BankError::DuplicateOption {
                prompt: question.prompt.clone(),
                option: option.clone(),
            });
        }
    }
    Ok(())
}

const YES_NO: &[&str] = &["Yes", "No"];
const DEBT_LEVELS: &[&str] = &["None", "Low", "Moderate", "High"];
const HORIZONS: &[&str] = &["<1 year", "1-3 years", "3-5 years", ">5 years"];
const SAVINGS_RATES: &[&str] = &["<10%", "10-20%", "20-40%", ">40%"];
const FINANCIAL_GOALS: &[&str] = &["Wealth preservation", "Growth", "Income"];
const DEBTS_PROMPT: &str = "Do you have any debts or loans?";

impl Default for QuestionBank {
    /// The built-in investment-knowledge questionnaire.
    fn default() -> Self {
        let first_question = Question::new(
            "How would you describe your investment knowledge?",
            &["None", "Basic", "Moderate", "Advanced"],
        );

        let mut branches = IndexMap::new();
        branches.insert(
            "None".to_string(),
            vec![
                Question::new("Are you comfortable with basic savings accounts and FDs?", YES_NO),
                Question::new("Do you prefer guaranteed returns over higher but uncertain returns?", YES_NO),
                Question::new("How often do you review your finances?", &["Rarely", "Sometimes", "Often"]),
                Question::new("Would you like to learn more about investing?", YES_NO),
                Question::new("What is your main financial goal?", FINANCIAL_GOALS),
                Question::new(
                    "How do you feel about taking any risk with your money?",
                    &["Not comfortable", "Somewhat comfortable", "Comfortable"],
                ),
                Question::new(DEBTS_PROMPT, DEBT_LEVELS),
            ],
        );
        branches.insert(
            "Basic".to_string(),
            vec![
                Question::new("Have you invested in mutual funds or stocks before?", YES_NO),
                Question::new(
                    "How do you react to small losses in your investments?",
                    &["Sell immediately", "Wait and watch", "Buy more"],
                ),
                Question::new("What is your preferred investment horizon?", HORIZONS),
                Question::new("How much of your income do you save or invest monthly?", SAVINGS_RATES),
                Question::new("Do you track your expenses and investments regularly?", YES_NO),
                Question::new("What is your main financial goal?", FINANCIAL_GOALS),
                Question::new(DEBTS_PROMPT, DEBT_LEVELS),
            ],
        );
        branches.insert(
            "Moderate".to_string(),
            vec![
                Question::new(
                    "How do you diversify your investments?",
                    &["Single asset", "Multiple assets", "Across asset classes"],
                ),
                Question::new(
                    "What percentage of your portfolio is in equities?",
                    &["<20%", "20-50%", "50-80%", ">80%"],
                ),
                Question::new(
                    "How do you react to market volatility?",
                    &["Sell immediately", "Wait and watch", "Buy more", "No reaction"],
                ),
                Question::new("What is your investment horizon?", HORIZONS),
                Question::new("How much of your income do you invest monthly?", SAVINGS_RATES),
                Question::new("Do you rebalance your portfolio regularly?", YES_NO),
                Question::new(DEBTS_PROMPT, DEBT_LEVELS),
            ],
        );
        branches.insert(
            "Advanced".to_string(),
            vec![
                Question::new(
                    "Do you invest in derivatives, international markets, or alternative assets?",
                    YES_NO,
                ),
                Question::new(
                    "How do you manage risk in your portfolio?",
                    &["Hedging", "Diversification", "Stop-losses", "All of these"],
                ),
                Question::new(
                    "What is your annualized return expectation?",
                    &["<8%", "8-12%", "12-20%", ">20%"],
                ),
                Question::new(
                    "How do you react to a 20% drawdown?",
                    &["Sell immediately", "Wait and watch", "Buy more", "No reaction"],
                ),
                Question::new("What is your investment horizon?", HORIZONS),
                Question::new(
                    "How often do you review and adjust your portfolio?",
                    &["Monthly", "Quarterly", "Annually", "Never"],
                ),
                Question::new(DEBTS_PROMPT, DEBT_LEVELS),
            ],
        );

        Self {
            first_question,
            branches,
        }
    }
}
