//! Party formation - drafting and validating the hunters sent on an order.
//!
//! A [`PartyFormation`] is a working draft for one accepted order. It only
//! validates; hunters stay `Available` until the order is dispatched, so the
//! same hunter may sit in several drafts at once and the first dispatch wins.

use std::collections::HashSet;

use guild_logic::resolution::{preview_success_chance, ResolutionConfig, RiskTier};

use crate::error::{GuildError, Result};
use crate::orders::{OrderId, OrderSpec};
use crate::roster::{HunterId, HunterState, Roster};

/// Check a complete party against an order's bounds and the roster.
pub fn validate_party(
    members: &[HunterId],
    min: usize,
    max: usize,
    roster: &Roster,
) -> Result<()> {
    if members.len() < min || members.len() > max {
        return Err(GuildError::PartySize {
            size: members.len(),
            min,
            max,
        });
    }
    let mut seen = HashSet::with_capacity(members.len());
    for &hunter in members {
        if !seen.insert(hunter) {
            return Err(GuildError::DuplicateMember(hunter));
        }
        check_available(hunter, roster)?;
    }
    Ok(())
}

fn check_available(hunter: HunterId, roster: &Roster) -> Result<()> {
    match roster.state(hunter)? {
        HunterState::Available => Ok(()),
        state => Err(GuildError::HunterUnavailable { hunter, state }),
    }
}

/// Sum of member combat strengths.
pub fn party_strength(members: &[HunterId], roster: &Roster) -> Result<i32> {
    members.iter().map(|&id| roster.combat_strength(id)).sum()
}

/// Live estimate shown while drafting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartyPreview {
    pub strength: i32,
    /// Summed trait success bonus, percent points.
    pub trait_bonus: f32,
    /// Noise-free, clamped success chance in percent.
    pub chance: f32,
    pub risk: RiskTier,
}

/// Working party draft for one accepted order.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyFormation {
    order: OrderId,
    min: usize,
    max: usize,
    difficulty: i32,
    members: Vec<HunterId>,
}

impl PartyFormation {
    pub fn new(order: OrderId, spec: &OrderSpec) -> Self {
        Self {
            order,
            min: spec.min_party,
            max: spec.max_party,
            difficulty: spec.difficulty,
            members: Vec::new(),
        }
    }

    pub fn order(&self) -> OrderId {
        self.order
    }

    pub fn members(&self) -> &[HunterId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, hunter: HunterId) -> bool {
        self.members.contains(&hunter)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max
    }

    /// Add one hunter. Rejects a full draft, duplicates, and hunters that
    /// are unknown or not available.
    pub fn add(&mut self, hunter: HunterId, roster: &Roster) -> Result<()> {
        if self.is_full() {
            return Err(GuildError::PartyFull { max: self.max });
        }
        if self.contains(hunter) {
            return Err(GuildError::DuplicateMember(hunter));
        }
        check_available(hunter, roster)?;
        self.members.push(hunter);
        Ok(())
    }

    pub fn remove(&mut self, hunter: HunterId) -> Result<()> {
        let index = self
            .members
            .iter()
            .position(|&m| m == hunter)
            .ok_or(GuildError::NotInParty(hunter))?;
        self.members.remove(index);
        Ok(())
    }

    /// Replace the draft with `members` if they form a valid party.
    pub fn propose(&mut self, members: &[HunterId], roster: &Roster) -> Result<()> {
        validate_party(members, self.min, self.max, roster)?;
        self.members = members.to_vec();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Whether the current draft could be dispatched right now.
    pub fn validate(&self, roster: &Roster) -> Result<()> {
        validate_party(&self.members, self.min, self.max, roster)
    }

    pub fn strength(&self, roster: &Roster) -> Result<i32> {
        party_strength(&self.members, roster)
    }

    /// Noise-free chance for the current draft; an empty draft previews at 0.
    pub fn preview(&self, roster: &Roster, config: &ResolutionConfig) -> Result<PartyPreview> {
        let mut strength = 0;
        let mut trait_bonus = 0.0;
        for &id in &self.members {
            let combatant = roster.combatant(id)?;
            strength += combatant.strength;
            trait_bonus += combatant.traits.success_bonus;
        }
        let chance = if self.members.is_empty() {
            0.0
        } else {
            preview_success_chance(strength, self.difficulty, trait_bonus, config)
        };
        Ok(PartyPreview {
            strength,
            trait_bonus,
            chance,
            risk: RiskTier::from_chance(chance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HunterProfile;
    use guild_logic::progression::LevelCurve;
    use guild_logic::stats::{BaseStats, StatGrowth, TraitModifiers};
    use std::sync::Arc;

    fn profile(id: &str, bonus: f32) -> Arc<HunterProfile> {
        Arc::new(HunterProfile {
            definition_id: id.to_string(),
            name: id.to_string(),
            class: "Ranger".to_string(),
            base: BaseStats {
                power: 4,
                defense: 3,
                resolve: 3,
            },
            growth: StatGrowth::default(),
            trait_names: Vec::new(),
            traits: vec![TraitModifiers {
                success_chance_bonus: bonus,
                ..TraitModifiers::default()
            }],
            daily_upkeep: 5,
            starting_level: 1,
            starting_xp: 0,
            curve: LevelCurve::default(),
            unlock_standing: 0,
        })
    }

    fn setup() -> (Roster, Vec<HunterId>) {
        let mut roster = Roster::new(vec![
            profile("a", 0.0),
            profile("b", 5.0),
            profile("c", 0.0),
            profile("d", 0.0),
        ]);
        let ids = roster.recruit_unlocked(0);
        (roster, ids)
    }

    fn spec(min: usize, max: usize, difficulty: i32) -> OrderSpec {
        OrderSpec {
            title: "Test".to_string(),
            description: String::new(),
            monster: None,
            difficulty,
            gold_reward: 100,
            xp_reward: 50,
            staffing_secs: 600.0,
            mission_secs: 600.0,
            min_party: min,
            max_party: max,
        }
    }

    #[test]
    fn test_validate_bounds() {
        let (roster, ids) = setup();
        assert_eq!(
            validate_party(&[], 1, 3, &roster),
            Err(GuildError::PartySize { size: 0, min: 1, max: 3 })
        );
        assert_eq!(
            validate_party(&ids, 1, 3, &roster),
            Err(GuildError::PartySize { size: 4, min: 1, max: 3 })
        );
        assert!(validate_party(&ids[..2], 2, 2, &roster).is_ok());
    }

    #[test]
    fn test_validate_duplicates() {
        let (roster, ids) = setup();
        assert_eq!(
            validate_party(&[ids[0], ids[0]], 1, 3, &roster),
            Err(GuildError::DuplicateMember(ids[0]))
        );
    }

    #[test]
    fn test_validate_availability() {
        let (mut roster, ids) = setup();
        roster.set_state(ids[1], HunterState::Deployed).unwrap();
        assert_eq!(
            validate_party(&ids[..2], 1, 3, &roster),
            Err(GuildError::HunterUnavailable {
                hunter: ids[1],
                state: HunterState::Deployed
            })
        );
    }

    #[test]
    fn test_incremental_draft() {
        let (roster, ids) = setup();
        let mut draft = PartyFormation::new(OrderId(1), &spec(1, 2, 20));
        draft.add(ids[0], &roster).unwrap();
        assert_eq!(draft.add(ids[0], &roster), Err(GuildError::DuplicateMember(ids[0])));
        draft.add(ids[1], &roster).unwrap();
        assert_eq!(draft.add(ids[2], &roster), Err(GuildError::PartyFull { max: 2 }));
        draft.remove(ids[0]).unwrap();
        assert_eq!(draft.remove(ids[0]), Err(GuildError::NotInParty(ids[0])));
        assert_eq!(draft.members(), &[ids[1]]);
        assert!(draft.validate(&roster).is_ok());
    }

    #[test]
    fn test_propose_is_all_or_nothing() {
        let (roster, ids) = setup();
        let mut draft = PartyFormation::new(OrderId(1), &spec(2, 3, 20));
        draft.propose(&ids[..2], &roster).unwrap();
        assert!(draft.propose(&ids[2..3], &roster).is_err());
        assert_eq!(draft.members(), &ids[..2]);
    }

    #[test]
    fn test_preview() {
        let (roster, ids) = setup();
        let mut draft = PartyFormation::new(OrderId(1), &spec(1, 3, 20));
        // two level-1 hunters of strength 10, one with +5
        draft.propose(&ids[..2], &roster).unwrap();
        let preview = draft.preview(&roster, &ResolutionConfig::default()).unwrap();
        assert_eq!(preview.strength, 20);
        assert_eq!(preview.chance, 55.0);
        assert_eq!(preview.risk, RiskTier::High);

        draft.clear();
        let empty = draft.preview(&roster, &ResolutionConfig::default()).unwrap();
        // no party, no chance; the clamp floor only applies to real parties
        assert_eq!(empty.chance, 0.0);
        assert_eq!(empty.strength, 0);
        assert_eq!(empty.risk, RiskTier::VeryHigh);
    }
}
