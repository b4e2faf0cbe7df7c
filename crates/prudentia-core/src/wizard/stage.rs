use serde::{Deserialize, Serialize};
use std::fmt;

/// Wizard stages in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Income,
    RiskProfile,
    Goals,
    Dashboard,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Income, Stage::RiskProfile, Stage::Goals, Stage::Dashboard];

    pub fn index(self) -> usize {
        match self {
            Stage::Income => 0,
            Stage::RiskProfile => 1,
            Stage::Goals => 2,
            Stage::Dashboard => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The stage after this one; `None` for the dashboard.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Step indicator label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Income => "Income",
            Stage::RiskProfile => "Risk Profile",
            Stage::Goals => "Goals",
            Stage::Dashboard => "Dashboard",
        }
    }

    /// Optional stages may be skipped without data.
    pub fn is_optional(self) -> bool {
        matches!(self, Stage::Goals)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
