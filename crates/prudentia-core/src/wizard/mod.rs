mod contracts;
mod orchestrator;
mod stage;

pub use contracts::{Goal, GoalType, IncomeData, InvestmentDetails, Sip};
pub use orchestrator::{StageResult, WizardOrchestrator, WizardResults};
pub use stage::Stage;
