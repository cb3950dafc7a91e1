//! Mission resolution.
//!
//! [`resolve`] is pure: it takes an order, a snapshot of the party, and an
//! RNG, and returns the finished [`MissionReport`] without touching any
//! state. [`apply_report`] then writes the report into the roster and the
//! ledger. Splitting the two keeps the random part reproducible from a seed
//! and testable without an engine.
//!
//! Draw order: chance noise, outcome draw, then for each member in party
//! order a death draw and, for the living only, an injury draw.

use guild_logic::progression::{grant_experience, LevelCurve, Progression};
use guild_logic::resolution::{
    experience_reward, member_risk, mission_rewards, roll_casualty, roll_outcome,
    roll_success_chance, Casualty, ResolutionConfig,
};
use guild_logic::stats::TraitTotals;
use rand::Rng;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::orders::Order;
use crate::report::{HunterOutcome, MissionReport};
use crate::roster::{HunterId, HunterState, Roster};

/// Everything resolution needs to know about one party member.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub hunter: HunterId,
    pub name: String,
    pub strength: i32,
    pub traits: TraitTotals,
    pub progression: Progression,
    pub curve: LevelCurve,
}

/// Roll a mission outcome for `order` with `party`.
pub fn resolve(
    order: &Order,
    party: &[Combatant],
    config: &ResolutionConfig,
    rng: &mut impl Rng,
) -> MissionReport {
    let strength: i32 = party.iter().map(|c| c.strength).sum();
    let bonus: f32 = party.iter().map(|c| c.traits.success_bonus).sum();
    let chance = roll_success_chance(strength, order.difficulty(), bonus, config, rng);
    let success = roll_outcome(chance, rng);

    let rewards = mission_rewards(success, order.spec().gold_reward, order.difficulty());
    let xp = experience_reward(success, order.spec().xp_reward);

    let outcomes = party
        .iter()
        .map(|member| {
            let risk = member_risk(success, &member.traits, config);
            let casualty = roll_casualty(&risk, rng);
            let mut progression = member.progression;
            let (xp_gained, levels) = if casualty == Casualty::Died {
                (0, 0)
            } else {
                (xp, grant_experience(&mut progression, xp, &member.curve))
            };
            HunterOutcome {
                hunter: member.hunter,
                name: member.name.clone(),
                casualty,
                xp_gained,
                leveled_up: levels > 0,
                level: progression.level,
            }
        })
        .collect();

    MissionReport {
        order: order.id(),
        title: order.title().to_string(),
        difficulty: order.difficulty(),
        success,
        chance,
        party_strength: strength,
        gold: rewards.gold,
        standing: rewards.standing,
        outcomes,
    }
}

/// Apply a report: credit rewards, bury the dead, return survivors to
/// `Available` with their experience.
///
/// Every member is looked up before anything changes, so an unknown hunter
/// leaves roster and ledger untouched.
pub fn apply_report(
    report: &MissionReport,
    roster: &mut Roster,
    ledger: &mut Ledger,
) -> Result<()> {
    for outcome in &report.outcomes {
        roster.state(outcome.hunter)?;
    }

    ledger.credit_gold(report.gold);
    if report.standing > 0 {
        ledger.credit_standing(report.standing);
    }

    for outcome in &report.outcomes {
        if outcome.died() {
            roster.set_state(outcome.hunter, HunterState::Deceased)?;
        } else {
            roster.set_state(outcome.hunter, HunterState::Available)?;
            roster.grant_experience(outcome.hunter, outcome.xp_gained)?;
        }
    }
    Ok(())
}
