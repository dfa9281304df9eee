//! Growth / predator state machine
//!
//! A fish is `Normal` below full growth and `Predator` at it. Growth only
//! rises through pill meals (clamped at 1.0) and only falls through the
//! halving that follows a successful hunt. There is no passive decay and no
//! hysteresis band.

use crate::entity::fish::{Fish, PREDATOR_GROWTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthState {
    Normal,
    Predator,
}

impl GrowthState {
    pub fn of(growth: f32) -> Self {
        if growth >= PREDATOR_GROWTH {
            GrowthState::Predator
        } else {
            GrowthState::Normal
        }
    }
}

/// Result of a growth change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthTransition {
    Unchanged(GrowthState),
    BecamePredator,
    ReturnedToNormal,
}

fn transition(before: GrowthState, after: GrowthState) -> GrowthTransition {
    match (before, after) {
        (GrowthState::Normal, GrowthState::Predator) => GrowthTransition::BecamePredator,
        (GrowthState::Predator, GrowthState::Normal) => GrowthTransition::ReturnedToNormal,
        (_, state) => GrowthTransition::Unchanged(state),
    }
}

/// Apply one pill meal
pub fn feed(fish: &mut Fish, step: f32) -> GrowthTransition {
    let before = GrowthState::of(fish.growth);
    fish.growth = (fish.growth + step).clamp(0.0, PREDATOR_GROWTH);
    transition(before, GrowthState::of(fish.growth))
}

/// Energy cost of a hunt: growth halves
pub fn spend_on_hunt(fish: &mut Fish) -> GrowthTransition {
    let before = GrowthState::of(fish.growth);
    fish.growth = (fish.growth * 0.5).clamp(0.0, PREDATOR_GROWTH);
    transition(before, GrowthState::of(fish.growth))
}
