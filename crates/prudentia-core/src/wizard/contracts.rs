//! Data bags handed over by the form stages.
//!
//! Income and goal entry are plain forms; these types only fix the shape the
//! orchestrator stores and the dashboard reads. Blank amount fields arrive
//! as empty strings and are kept as `None`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Output of the income stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeData {
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub salary: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub additional_income: Option<Decimal>,
    #[serde(default)]
    pub investments: Option<InvestmentDetails>,
    #[serde(default)]
    pub sips: Vec<Sip>,
}

/// Current holdings by asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDetails {
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub fd: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub cash: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub gold: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub real_estate: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub esop: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub rsu: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub mutual_funds: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub other: Option<Decimal>,
}

/// A systematic investment plan: a recurring monthly fund contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sip {
    pub fund_name: String,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    #[default]
    Short,
    Mid,
    Long,
}

impl GoalType {
    pub fn label(self) -> &'static str {
        match self {
            GoalType::Short => "Short-term (<3 years)",
            GoalType::Mid => "Mid-term (3-5 years)",
            GoalType::Long => "Long-term (>5 years)",
        }
    }
}

/// One entry of the optional goals stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "type", default)]
    pub goal_type: GoalType,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub target_amount: Option<Decimal>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

/// Lenient amount parsing: numbers, numeric strings, or blank.
mod amount {
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(Decimal),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(trimmed)
                    .map(Some)
                    .map_err(|e| de::Error::custom(format!("invalid amount '{trimmed}': {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn income_accepts_form_strings() {
        let json = r#"{
            "salary": "95000",
            "additionalIncome": "",
            "investments": {
                "fd": "200000", "cash": "", "gold": 1500.5, "realEstate": "",
                "esop": "", "rsu": "", "mutualFunds": "40000", "other": ""
            },
            "sips": [{ "fundName": "UTI Nifty Index Fund", "amount": "2500" }]
        }"#;

        let income: IncomeData = serde_json::from_str(json).unwrap();
        assert_eq!(income.salary, Some(dec!(95000)));
        assert_eq!(income.additional_income, None);

        let investments = income.investments.unwrap();
        assert_eq!(investments.fd, Some(dec!(200000)));
        assert_eq!(investments.gold, Some(dec!(1500.5)));
        assert_eq!(investments.cash, None);
        assert_eq!(income.sips[0].amount, Some(dec!(2500)));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let income: IncomeData = serde_json::from_str("{}").unwrap();
        assert_eq!(income, IncomeData::default());
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let err = serde_json::from_str::<IncomeData>(r#"{"salary": "lots"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid amount 'lots'"));
    }

    #[test]
    fn goal_uses_form_field_names() {
        let goal: Goal = serde_json::from_str(
            r#"{"type": "long", "targetAmount": "1500000", "targetDate": "2031-04-01"}"#,
        )
        .unwrap();
        assert_eq!(goal.goal_type, GoalType::Long);
        assert_eq!(goal.goal_type.label(), "Long-term (>5 years)");
        assert_eq!(goal.target_amount, Some(dec!(1500000)));
        assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2031, 4, 1));
    }
}
