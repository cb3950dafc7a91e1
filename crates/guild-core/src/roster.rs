//! Hunter roster.
//!
//! Hunters are entities in an `hecs::World` with three components: a shared
//! profile, their [`Progression`], and their [`HunterState`]. A hunter is
//! recruited the first time guild standing reaches its unlock threshold and
//! is never removed; death is recorded as the terminal `Deceased` state.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use guild_logic::progression::{self, Progression};
use hecs::{Entity, World};
use serde::{Serialize, Serializer};

use crate::data::{GameData, HunterProfile};
use crate::error::{DataError, GuildError, Result};
use crate::events::{EventBus, RosterEvent};
use crate::resolver::Combatant;

/// Handle of a recruited hunter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HunterId(Entity);

impl HunterId {
    pub(crate) fn from_entity(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn entity(self) -> Entity {
        self.0
    }
}

impl fmt::Display for HunterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.id())
    }
}

impl Serialize for HunterId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0.to_bits().get())
    }
}

/// Hunter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HunterState {
    Available,
    /// Assigned to a dispatched order.
    Deployed,
    /// Terminal.
    Deceased,
}

/// Shared profile component.
#[derive(Debug, Clone)]
struct Profile(Arc<HunterProfile>);

/// Read-only snapshot of one hunter for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct HunterView {
    pub id: HunterId,
    pub definition_id: String,
    pub name: String,
    pub class: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub state: HunterState,
    pub strength: i32,
    pub daily_upkeep: i64,
    pub traits: Vec<String>,
}

/// All recruited hunters plus the pool of not-yet-unlocked profiles.
pub struct Roster {
    world: World,
    profiles: Vec<Arc<HunterProfile>>,
    recruited: HashSet<String>,
    /// Recruitment order; world iteration order is unspecified.
    ids: Vec<HunterId>,
    events: EventBus<RosterEvent>,
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("hunters", &self.ids.len())
            .field("profiles", &self.profiles.len())
            .finish()
    }
}

impl Roster {
    pub fn new(profiles: Vec<Arc<HunterProfile>>) -> Self {
        Self {
            world: World::new(),
            profiles,
            recruited: HashSet::new(),
            ids: Vec::new(),
            events: EventBus::new(),
        }
    }

    pub fn from_data(data: &GameData) -> std::result::Result<Self, DataError> {
        Ok(Self::new(data.hunter_profiles()?))
    }

    /// Recruit every profile whose unlock threshold is at or below
    /// `standing` and that has not been recruited yet.
    pub fn recruit_unlocked(&mut self, standing: i64) -> Vec<HunterId> {
        let unlocked: Vec<Arc<HunterProfile>> = self
            .profiles
            .iter()
            .filter(|p| p.unlock_standing <= standing && !self.recruited.contains(&p.definition_id))
            .cloned()
            .collect();

        unlocked
            .into_iter()
            .map(|profile| self.spawn(profile))
            .collect()
    }

    fn spawn(&mut self, profile: Arc<HunterProfile>) -> HunterId {
        let progression = Progression::new(profile.starting_level, profile.starting_xp);
        let definition = profile.definition_id.clone();
        let name = profile.name.clone();
        let entity = self
            .world
            .spawn((Profile(profile), progression, HunterState::Available));
        let id = HunterId(entity);
        self.recruited.insert(definition.clone());
        self.ids.push(id);
        log::info!("recruited {name} ({definition}) as hunter {id}");
        self.events.emit(&RosterEvent::Recruited {
            hunter: id,
            definition,
        });
        id
    }

    pub fn contains(&self, id: HunterId) -> bool {
        self.world.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Every recruited hunter, in recruitment order.
    pub fn ids(&self) -> &[HunterId] {
        &self.ids
    }

    /// Profiles not yet recruited.
    pub fn locked_profiles(&self) -> impl Iterator<Item = &Arc<HunterProfile>> {
        self.profiles
            .iter()
            .filter(|p| !self.recruited.contains(&p.definition_id))
    }

    pub fn state(&self, id: HunterId) -> Result<HunterState> {
        self.world
            .get::<&HunterState>(id.0)
            .map(|s| *s)
            .map_err(|_| GuildError::UnknownHunter(id))
    }

    pub fn progression(&self, id: HunterId) -> Result<Progression> {
        self.world
            .get::<&Progression>(id.0)
            .map(|p| *p)
            .map_err(|_| GuildError::UnknownHunter(id))
    }

    pub fn profile(&self, id: HunterId) -> Result<Arc<HunterProfile>> {
        self.world
            .get::<&Profile>(id.0)
            .map(|p| Arc::clone(&p.0))
            .map_err(|_| GuildError::UnknownHunter(id))
    }

    pub fn is_available(&self, id: HunterId) -> bool {
        matches!(self.state(id), Ok(HunterState::Available))
    }

    /// Available hunters, in recruitment order.
    pub fn available(&self) -> Vec<HunterId> {
        self.in_state(HunterState::Available)
    }

    pub fn in_state(&self, state: HunterState) -> Vec<HunterId> {
        self.ids
            .iter()
            .copied()
            .filter(|&id| self.state(id) == Ok(state))
            .collect()
    }

    /// Current combat strength, derived from level and traits.
    pub fn combat_strength(&self, id: HunterId) -> Result<i32> {
        let profile = self.profile(id)?;
        let progression = self.progression(id)?;
        Ok(profile.strength_at(progression.level))
    }

    /// Snapshot used as resolver input.
    pub fn combatant(&self, id: HunterId) -> Result<Combatant> {
        let profile = self.profile(id)?;
        let progression = self.progression(id)?;
        Ok(Combatant {
            hunter: id,
            name: profile.name.clone(),
            strength: profile.strength_at(progression.level),
            traits: profile.trait_totals(),
            progression,
            curve: profile.curve,
        })
    }

    pub fn view(&self, id: HunterId) -> Result<HunterView> {
        let profile = self.profile(id)?;
        let progression = self.progression(id)?;
        let state = self.state(id)?;
        Ok(HunterView {
            id,
            definition_id: profile.definition_id.clone(),
            name: profile.name.clone(),
            class: profile.class.clone(),
            level: progression.level,
            xp: progression.xp,
            xp_to_next: profile.curve.threshold(progression.level),
            state,
            strength: profile.strength_at(progression.level),
            daily_upkeep: profile.daily_upkeep,
            traits: profile.trait_names.clone(),
        })
    }

    /// Move a hunter to `state`. A deceased hunter cannot leave `Deceased`.
    pub fn set_state(&mut self, id: HunterId, state: HunterState) -> Result<()> {
        let current = self.state(id)?;
        if current == HunterState::Deceased && state != HunterState::Deceased {
            return Err(GuildError::HunterDeceased(id));
        }
        if current == state {
            return Ok(());
        }
        if let Ok(mut s) = self.world.get::<&mut HunterState>(id.0) {
            *s = state;
        }
        log::debug!("hunter {id}: {current:?} -> {state:?}");
        self.events.emit(&RosterEvent::StateChanged { hunter: id, state });
        Ok(())
    }

    /// Grant experience and apply the promotion cascade. Returns levels gained.
    pub fn grant_experience(&mut self, id: HunterId, amount: u32) -> Result<u32> {
        if self.state(id)? == HunterState::Deceased {
            return Err(GuildError::HunterDeceased(id));
        }
        let curve = self.profile(id)?.curve;
        let (gained, level) = {
            let mut p = self
                .world
                .get::<&mut Progression>(id.0)
                .map_err(|_| GuildError::UnknownHunter(id))?;
            let gained = progression::grant_experience(&mut p, amount, &curve);
            (gained, p.level)
        };
        if gained > 0 {
            log::info!("hunter {id} reached level {level}");
            self.events.emit(&RosterEvent::LeveledUp { hunter: id, level });
        }
        Ok(gained)
    }

    /// Add exactly one level without touching experience. Returns the new level.
    pub fn promote(&mut self, id: HunterId) -> Result<u32> {
        if self.state(id)? == HunterState::Deceased {
            return Err(GuildError::HunterDeceased(id));
        }
        let level = {
            let mut p = self
                .world
                .get::<&mut Progression>(id.0)
                .map_err(|_| GuildError::UnknownHunter(id))?;
            p.level += 1;
            p.level
        };
        self.events.emit(&RosterEvent::LeveledUp { hunter: id, level });
        Ok(level)
    }

    /// Gold price of promoting `id` one level.
    pub fn level_up_cost(&self, id: HunterId, base_cost: i64) -> Result<i64> {
        Ok(progression::level_up_cost(base_cost, self.progression(id)?.level))
    }

    /// Combined daily upkeep of every living hunter.
    pub fn daily_upkeep(&self) -> i64 {
        self.world
            .query::<(&Profile, &HunterState)>()
            .iter()
            .filter(|(_, (_, state))| **state != HunterState::Deceased)
            .map(|(_, (profile, _))| profile.0.daily_upkeep)
            .sum()
    }

    pub fn events_mut(&mut self) -> &mut EventBus<RosterEvent> {
        &mut self.events
    }
}
