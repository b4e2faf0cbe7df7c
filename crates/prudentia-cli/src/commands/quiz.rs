use clap::Subcommand;
use prudentia_core::{Config, Event, QuestionBank, QuizEngine, QuizError, RiskAnswers};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand)]
pub enum QuizAction {
    /// Run the questionnaire (interactive unless --answers is given)
    Run {
        /// Comma-separated answers, category first
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,
        /// Question bank TOML (overrides config)
        #[arg(long)]
        bank: Option<PathBuf>,
    },
    /// Print the question bank as JSON
    Bank {
        /// Only print the branch for this category
        #[arg(long)]
        category: Option<String>,
        /// Question bank TOML (overrides config)
        #[arg(long)]
        bank: Option<PathBuf>,
    },
}

/// Bank from `--bank`, else from config.
pub fn load_bank(config: &Config, path: Option<PathBuf>) -> Result<Arc<QuestionBank>, Box<dyn std::error::Error>> {
    let bank = match path {
        Some(path) => QuestionBank::load(&path)?,
        None => config.question_bank()?,
    };
    Ok(Arc::new(bank))
}

/// Feed answers in order, advancing after each one.
pub fn answer_scripted(quiz: &mut QuizEngine, answers: &[String]) -> Result<RiskAnswers, Box<dyn std::error::Error>> {
    let mut remaining = answers.iter().map(|a| a.trim());
    loop {
        let Some(answer) = remaining.next() else {
            return Err(format!(
                "answers ended at question {} of {}",
                quiz.position() + 1,
                quiz.total_steps()
            )
            .into());
        };
        quiz.answer_current(answer)?;
        if let Event::QuizCompleted { answers: result, .. } = quiz.advance()? {
            let extra = remaining.count();
            if extra > 0 {
                return Err(format!("{extra} answer(s) left over after the last question").into());
            }
            return Ok(result);
        }
    }
}

/// Prompt on `out`, read choices from `input`.
///
/// A number or option label answers and advances, an empty line advances,
/// `b` goes back one question.
pub fn run_interactive<R: BufRead, W: Write>(
    quiz: &mut QuizEngine,
    mut input: R,
    out: &mut W,
) -> Result<RiskAnswers, Box<dyn std::error::Error>> {
    let mut line = String::new();
    loop {
        render(quiz, out)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err("input closed before the questionnaire finished".into());
        }
        let entry = line.trim();

        if entry.eq_ignore_ascii_case("b") {
            if let Err(QuizError::AtFirstStep) = quiz.go_back() {
                writeln!(out, "Already at the first question.")?;
            }
            continue;
        }

        if !entry.is_empty() {
            let options = &quiz.current_question().options;
            let choice = match entry.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].clone(),
                _ if quiz.current_question().has_option(entry) => entry.to_string(),
                _ => {
                    writeln!(out, "Unknown choice '{entry}'.")?;
                    continue;
                }
            };
            quiz.answer_current(&choice)?;
        }

        match quiz.advance() {
            Ok(Event::QuizCompleted { answers, .. }) => return Ok(answers),
            Ok(_) | Err(QuizError::SelectionRequired) => {}
            Err(e) => return Err(e.into()),
        }
    }
}

fn render<W: Write>(quiz: &QuizEngine, out: &mut W) -> std::io::Result<()> {
    let Event::QuizSnapshot {
        position,
        total_steps,
        prompt,
        options,
        selected,
        progress_pct,
        validation_error,
        ..
    } = quiz.snapshot()
    else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(out, "[{}/{}] {:.0}%  {}", position + 1, total_steps, progress_pct, prompt)?;
    for (i, option) in options.iter().enumerate() {
        let marker = if selected.as_deref() == Some(option.as_str()) { "*" } else { " " };
        writeln!(out, " {marker}{}. {option}", i + 1)?;
    }
    if let Some(message) = validation_error {
        writeln!(out, "{message}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        QuizAction::Run { answers, bank } => {
            let bank = load_bank(&config, bank)?;
            let mut quiz = config.new_quiz(bank);
            let result = match answers {
                Some(answers) => answer_scripted(&mut quiz, &answers)?,
                None => {
                    let stdin = std::io::stdin();
                    run_interactive(&mut quiz, stdin.lock(), &mut std::io::stderr())?
                }
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        QuizAction::Bank { category, bank } => {
            let bank = load_bank(&config, bank)?;
            match category {
                Some(category) => {
                    let branch = bank
                        .branch(&category)
                        .ok_or_else(|| format!("unknown category: {category}"))?;
                    println!("{}", serde_json::to_string_pretty(branch)?);
                }
                None => println!("{}", serde_json::to_string_pretty(bank.as_ref())?),
            }
        }
    }
    Ok(())
}
