use pasture_core::StepError;

use crate::agent::{Actor, Body, StepContext, Steppable};

/// A stationary grass patch.
///
/// Local state machine, no interaction with other agents: a grazed patch
/// counts the ticks it has been bare and regrows once the count exceeds
/// `grass_regrowth_time`. Patches never die.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    /// Whether grass is available to graze.
    pub has_grass: bool,
    /// Ticks since the patch was last grazed.
    pub ticks_without_grass: u32,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            has_grass: true,
            ticks_without_grass: 0,
        }
    }
}

impl Patch {
    /// A freshly grazed patch.
    pub fn bare() -> Self {
        Self {
            has_grass: false,
            ticks_without_grass: 0,
        }
    }

    /// Advance the regrowth clock by one tick.
    pub fn regrow(&mut self, regrowth_time: u32) {
        if self.ticks_without_grass > regrowth_time {
            self.ticks_without_grass = 0;
            self.has_grass = true;
        } else if !self.has_grass {
            self.ticks_without_grass += 1;
        }
    }
}

impl Steppable for Patch {
    fn step(&mut self, _actor: &mut Actor, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        self.regrow(ctx.config.grass_regrowth_time);
        Ok(())
    }
}

impl From<Patch> for Body {
    fn from(patch: Patch) -> Self {
        Self::Patch(patch)
    }
}
