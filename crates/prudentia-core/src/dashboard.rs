//! Dashboard summary built from accumulated wizard results.
//!
//! Every section falls back to sample values when its stage supplied no
//! data, so the dashboard always renders. `uses_sample_data` reports which
//! sections did.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::quiz::RiskAnswers;
use crate::wizard::{Goal, InvestmentDetails, Sip, WizardResults};

const TREND_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Fallback values for absent stage data.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub salary: Decimal,
    pub sip_total: Decimal,
    pub investments: InvestmentDetails,
    pub sips: Vec<Sip>,
}

impl Default for SampleData {
    fn default() -> Self {
        Self {
            salary: dec!(80000),
            sip_total: dec!(5000),
            investments: InvestmentDetails {
                fd: Some(dec!(200000)),
                cash: Some(dec!(50000)),
                gold: Some(dec!(75000)),
                real_estate: Some(dec!(500000)),
                esop: Some(dec!(120000)),
                rsu: Some(dec!(90000)),
                mutual_funds: Some(dec!(180000)),
                other: Some(dec!(20000)),
            },
            sips: vec![
                sample_sip("Axis Bluechip Fund", dec!(3000)),
                sample_sip("Parag Parikh Flexi Cap Fund", dec!(2000)),
                sample_sip("UTI Nifty Index Fund", dec!(1000)),
            ],
        }
    }
}

fn sample_sip(fund_name: &str, amount: Decimal) -> Sip {
    Sip {
        fund_name: fund_name.to_string(),
        amount: Some(amount),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub salary: Decimal,
    pub sip: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentLine {
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipLine {
    pub fund_name: String,
    pub monthly_amount: Decimal,
}

/// Which sections fell back to sample values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleUsage {
    pub salary: bool,
    pub sips: bool,
    pub investments: bool,
}

/// Read-only view handed to the dashboard stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub salary: Decimal,
    pub sip_total: Decimal,
    pub trend: Vec<TrendPoint>,
    pub investments: Vec<InvestmentLine>,
    pub total_investments: Decimal,
    pub sips: Vec<SipLine>,
    pub risk_answers: Option<RiskAnswers>,
    pub goals: Vec<Goal>,
    pub uses_sample_data: SampleUsage,
}

impl DashboardSummary {
    pub fn build(results: &WizardResults, samples: &SampleData) -> Self {
        let income = results.income.as_ref();
        let mut usage = SampleUsage::default();

        let salary = match income.and_then(|i| i.salary) {
            Some(salary) => salary,
            None => {
                usage.salary = true;
                samples.salary
            }
        };

        let entered_sips = income.map(|i| i.sips.as_slice()).unwrap_or_default();
        let sip_total = if entered_sips.is_empty() {
            samples.sip_total
        } else {
            entered_sips.iter().filter_map(|s| s.amount).sum()
        };

        let sip_source = if entered_sips.is_empty() {
            usage.sips = true;
            samples.sips.as_slice()
        } else {
            entered_sips
        };
        let sips = sip_source
            .iter()
            .map(|s| SipLine {
                fund_name: s.fund_name.clone(),
                monthly_amount: s.amount.unwrap_or_default(),
            })
            .collect();

        let holdings = match income.and_then(|i| i.investments.as_ref()) {
            Some(investments) => investments,
            None => {
                usage.investments = true;
                &samples.investments
            }
        };
        let investments = investment_lines(holdings);
        let total_investments: Decimal = investments.iter().map(|l| l.value).sum();

        let trend = TREND_MONTHS
            .iter()
            .map(|month| TrendPoint {
                month: month.to_string(),
                salary,
                sip: sip_total,
            })
            .collect();

        if usage != SampleUsage::default() {
            tracing::debug!(?usage, "dashboard using sample data");
        }

        Self {
            salary,
            sip_total,
            trend,
            investments,
            total_investments,
            sips,
            risk_answers: results.risk_answers.clone(),
            goals: results.goals.clone().unwrap_or_default(),
            uses_sample_data: usage,
        }
    }
}

fn investment_lines(details: &InvestmentDetails) -> Vec<InvestmentLine> {
    [
        ("Fixed Deposits (FD)", details.fd),
        ("Cash", details.cash),
        ("Gold", details.gold),
        ("Real Estate", details.real_estate),
        ("ESOP", details.esop),
        ("RSU", details.rsu),
        ("Mutual Funds", details.mutual_funds),
        ("Other", details.other),
    ]
    .into_iter()
    .map(|(label, value)| InvestmentLine {
        label: label.to_string(),
        value: value.unwrap_or_default(),
    })
    .collect()
}

/// Format an amount with a currency symbol and thousands grouping (`₹1,235,000`).
pub fn format_amount(symbol: &str, value: Decimal) -> String {
    let rounded = value.round_dp(2).normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{symbol}{grouped}.{frac}"),
        None => format!("{sign}{symbol}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::IncomeData;

    #[test]
    fn empty_results_use_samples() {
        let summary = DashboardSummary::build(&WizardResults::default(), &SampleData::default());

        assert_eq!(summary.salary, dec!(80000));
        assert_eq!(summary.sip_total, dec!(5000));
        assert_eq!(summary.trend.len(), 6);
        assert_eq!(summary.trend[0].month, "Jan");
        assert_eq!(summary.investments.len(), 8);
        assert_eq!(summary.investments[3].label, "Real Estate");
        assert_eq!(summary.investments[3].value, dec!(500000));
        assert_eq!(summary.total_investments, dec!(1235000));
        assert_eq!(summary.sips.len(), 3);
        assert!(summary.goals.is_empty());
        assert_eq!(
            summary.uses_sample_data,
            SampleUsage {
                salary: true,
                sips: true,
                investments: true
            }
        );
    }

    #[test]
    fn entered_income_replaces_samples() {
        let income = IncomeData {
            salary: Some(dec!(120000)),
            additional_income: None,
            investments: Some(InvestmentDetails {
                fd: Some(dec!(10000)),
                ..Default::default()
            }),
            sips: vec![
                sample_sip("HDFC Top 100 Fund", dec!(4000)),
                Sip {
                    fund_name: "SBI Small Cap Fund".to_string(),
                    amount: None,
                },
            ],
        };
        let results = WizardResults {
            income: Some(income),
            ..Default::default()
        };

        let summary = DashboardSummary::build(&results, &SampleData::default());
        assert_eq!(summary.salary, dec!(120000));
        assert_eq!(summary.sip_total, dec!(4000));
        assert_eq!(summary.trend[5].sip, dec!(4000));
        assert_eq!(summary.investments[0].value, dec!(10000));
        assert_eq!(summary.investments[1].value, Decimal::ZERO);
        assert_eq!(summary.sips[1].monthly_amount, Decimal::ZERO);
        assert_eq!(summary.uses_sample_data, SampleUsage::default());
    }

    #[test]
    fn blank_salary_falls_back_alone() {
        let results = WizardResults {
            income: Some(IncomeData {
                sips: vec![sample_sip("UTI Nifty Index Fund", dec!(1500))],
                ..Default::default()
            }),
            ..Default::default()
        };
        let samples = SampleData {
            salary: dec!(50000),
            ..Default::default()
        };

        let summary = DashboardSummary::build(&results, &samples);
        assert_eq!(summary.salary, dec!(50000));
        assert!(summary.uses_sample_data.salary);
        assert!(!summary.uses_sample_data.sips);
        assert!(summary.uses_sample_data.investments);
    }

    #[test]
    fn formats_amounts_with_grouping() {
        assert_eq!(format_amount("₹", dec!(80000)), "₹80,000");
        assert_eq!(format_amount("₹", dec!(1235000)), "₹1,235,000");
        assert_eq!(format_amount("$", dec!(999)), "$999");
        assert_eq!(format_amount("$", dec!(1500.50)), "$1,500.5");
        assert_eq!(format_amount("$", dec!(-2500)), "-$2,500");
        assert_eq!(format_amount("$", Decimal::ZERO), "$0");
    }
}
