use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Ordered output of one questionnaire traversal.
///
/// Element 0 is the category answer; the rest follow branch definition
/// order. Never empty. Serializes as a plain list of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct RiskAnswers(Vec<String>);

impl TryFrom<Vec<String>> for RiskAnswers {
    type Error = QuizError;

    fn try_from(answers: Vec<String>) -> Result<Self, Self::Error> {
        if answers.is_empty() {
            return Err(QuizError::MissingCategoryAnswer);
        }
        Ok(Self(answers))
    }
}

impl From<RiskAnswers> for Vec<String> {
    fn from(answers: RiskAnswers) -> Self {
        answers.0
    }
}

impl RiskAnswers {
    /// Assemble from the category slot and fully answered branch slots.
    ///
    /// Returns `None` if any branch slot is still unset.
    pub fn assemble(category: &str, branch_answers: &[Option<String>]) -> Option<Self> {
        let mut answers = Vec::with_capacity(branch_answers.len() + 1);
        answers.push(category.to_string());
        for slot in branch_answers {
            answers.push(slot.clone()?);
        }
        Some(Self(answers))
    }

    pub fn category(&self) -> &str {
        &self.0[0]
    }

    pub fn branch_answers(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_puts_category_first() {
        let slots = vec![Some("Yes".to_string()), Some("Buy more".to_string())];
        let answers = RiskAnswers::assemble("Basic", &slots).unwrap();
        assert_eq!(answers.category(), "Basic");
        assert_eq!(answers.branch_answers(), ["Yes", "Buy more"]);
        assert_eq!(answers.as_slice().len(), 3);
    }

    #[test]
    fn assemble_requires_every_slot() {
        let slots = vec![Some("Yes".to_string()), None];
        assert!(RiskAnswers::assemble("Basic", &slots).is_none());
    }

    #[test]
    fn serializes_as_flat_list() {
        let answers = RiskAnswers::assemble("None", &[Some("No".to_string())]).unwrap();
        assert_eq!(serde_json::to_string(&answers).unwrap(), r#"["None","No"]"#);
    }

    #[test]
    fn deserialize_requires_category_answer() {
        let err = serde_json::from_str::<RiskAnswers>("[]").unwrap_err();
        assert!(err.to_string().contains("category answer"));

        let answers: RiskAnswers = serde_json::from_str(r#"["Basic","Yes"]"#).unwrap();
        assert_eq!(answers.category(), "Basic");
        assert_eq!(answers.branch_answers(), ["Yes"]);
    }
}
