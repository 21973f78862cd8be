//! Which steps an orchestration run performs, decided without any I/O.

use std::fmt;

use buildman_types::build::{Build, FractionId};
use buildman_types::error::ChangeStep;

/// How a run was planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeMode {
    /// Live starting state unknown: every step runs.
    Force,
    /// Starting state known: only differing parts run.
    Diff,
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeMode::Force => "force",
            ChangeMode::Diff => "diff",
        })
    }
}

/// Ordered list of steps plus what is already known about the starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePlan {
    pub mode: ChangeMode,
    pub steps: Vec<ChangeStep>,
    /// Faction the account starts from. `None` means it must be read live
    /// before the fraction step.
    pub from_fraction: Option<FractionId>,
}

impl ChangePlan {
    /// Every step, in the fixed order the game's preconditions require.
    pub fn force() -> Self {
        Self {
            mode: ChangeMode::Force,
            steps: vec![
                ChangeStep::Fraction,
                ChangeStep::Skill,
                ChangeStep::Army,
                ChangeStep::Inventory,
                ChangeStep::AttributeReset,
                ChangeStep::AttributeAllocate,
            ],
            from_fraction: None,
        }
    }

    /// Only the steps whose inputs differ between `from` and `to`.
    ///
    /// A faction change re-sends skills and army even when their values are
    /// unchanged: both are faction-relative in the game. The name is never
    /// part of the plan.
    pub fn diff(from: &Build, to: &Build) -> Self {
        let fraction_changed = from.fraction != to.fraction;
        let skill_changed = fraction_changed || from.skill != to.skill;
        let army_changed = fraction_changed || from.army != to.army;
        let inventory_changed = from.inventory != to.inventory;
        let attribute_changed = from.attribute != to.attribute;

        let mut steps = Vec::new();
        if fraction_changed {
            steps.push(ChangeStep::Fraction);
        }
        if skill_changed {
            steps.push(ChangeStep::Skill);
        }
        if army_changed {
            steps.push(ChangeStep::Army);
        }
        if inventory_changed {
            steps.push(ChangeStep::Inventory);
        }
        if attribute_changed {
            steps.push(ChangeStep::AttributeReset);
            steps.push(ChangeStep::AttributeAllocate);
        }

        Self {
            mode: ChangeMode::Diff,
            steps,
            from_fraction: Some(from.fraction.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, step: ChangeStep) -> bool {
        self.steps.contains(&step)
    }
}
