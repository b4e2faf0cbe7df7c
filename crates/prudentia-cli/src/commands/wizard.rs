use clap::Subcommand;
use prudentia_core::dashboard::format_amount;
use prudentia_core::{
    Config, DashboardSummary, Goal, IncomeData, Stage, StageResult, WizardOrchestrator,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::quiz::{answer_scripted, load_bank, run_interactive};

#[derive(Subcommand)]
pub enum WizardAction {
    /// Run every stage and print the dashboard
    Run {
        /// Income form data (JSON)
        #[arg(long)]
        income: PathBuf,
        /// Goals (JSON array); the goals stage is skipped when omitted
        #[arg(long)]
        goals: Option<PathBuf>,
        /// Comma-separated questionnaire answers; prompts on stdin when omitted
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,
        /// Question bank TOML (overrides config)
        #[arg(long)]
        bank: Option<PathBuf>,
        /// Print a text summary instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// List the wizard stages in order
    Stages,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON in {}: {e}", path.display()).into())
}

pub fn run(action: WizardAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WizardAction::Run {
            income,
            goals,
            answers,
            bank,
            text,
        } => {
            let config = Config::load_or_default();
            let mut wizard = WizardOrchestrator::new();
            tracing::info!(session = wizard.session_id(), started_at = %wizard.started_at(), "wizard started");

            let income: IncomeData = read_json(&income)?;
            wizard.complete_stage(Stage::Income, StageResult::Income(income))?;

            let bank = load_bank(&config, bank)?;
            let mut quiz = config.new_quiz(bank);
            let risk = match answers {
                Some(answers) => answer_scripted(&mut quiz, &answers)?,
                None => {
                    let stdin = std::io::stdin();
                    run_interactive(&mut quiz, stdin.lock(), &mut std::io::stderr())?
                }
            };
            wizard.complete_stage(Stage::RiskProfile, StageResult::RiskProfile(risk))?;

            match goals {
                Some(path) => {
                    let goals: Vec<Goal> = read_json(&path)?;
                    wizard.complete_stage(Stage::Goals, StageResult::Goals(goals))?;
                }
                None => {
                    wizard.skip_stage(Stage::Goals)?;
                }
            }

            let summary = wizard.dashboard(&config.sample_data())?;
            if text {
                print!("{}", render_text(&summary, &config.dashboard.currency_symbol));
            } else {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
        WizardAction::Stages => {
            for stage in Stage::ALL {
                let note = if stage.is_optional() { " (optional)" } else { "" };
                println!("{}. {}{note}", stage.index() + 1, stage.label());
            }
        }
    }
    Ok(())
}

fn render_text(summary: &DashboardSummary, symbol: &str) -> String {
    let sample = |used: bool| if used { " (sample)" } else { "" };
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Monthly salary: {}{}",
        format_amount(symbol, summary.salary),
        sample(summary.uses_sample_data.salary)
    );
    let _ = writeln!(
        out,
        "Monthly SIPs: {}{}",
        format_amount(symbol, summary.sip_total),
        sample(summary.uses_sample_data.sips)
    );
    for sip in &summary.sips {
        let _ = writeln!(out, "  {}: {}", sip.fund_name, format_amount(symbol, sip.monthly_amount));
    }

    let _ = writeln!(
        out,
        "Investments: {}{}",
        format_amount(symbol, summary.total_investments),
        sample(summary.uses_sample_data.investments)
    );
    for line in &summary.investments {
        let _ = writeln!(out, "  {}: {}", line.label, format_amount(symbol, line.value));
    }

    if let Some(answers) = &summary.risk_answers {
        let _ = writeln!(out, "Investment knowledge: {}", answers.category());
    }

    if summary.goals.is_empty() {
        let _ = writeln!(out, "Goals: none");
    } else {
        let _ = writeln!(out, "Goals:");
        for goal in &summary.goals {
            let amount = goal
                .target_amount
                .map(|a| format_amount(symbol, a))
                .unwrap_or_else(|| "-".to_string());
            let date = goal
                .target_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "  {}: {amount} by {date}", goal.goal_type.label());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use prudentia_core::{GoalType, SampleData, WizardResults};
    use rust_decimal_macros::dec;

    #[test]
    fn text_summary_marks_sample_sections() {
        let results = WizardResults {
            goals: Some(vec![Goal {
                goal_type: GoalType::Long,
                target_amount: Some(dec!(2500000)),
                target_date: None,
            }]),
            ..WizardResults::default()
        };
        let summary = DashboardSummary::build(&results, &SampleData::default());
        let text = render_text(&summary, "₹");

        assert!(text.contains("Monthly salary: ₹80,000 (sample)"));
        assert!(text.contains("Monthly SIPs: ₹5,000 (sample)"));
        assert!(text.contains("Axis Bluechip Fund: ₹3,000"));
        assert!(text.contains("Investments: ₹1,235,000 (sample)"));
        assert!(text.contains(": ₹2,500,000 by -"));
        assert!(!text.contains("Investment knowledge"));
    }
}
