//! Mission reports and the running history of resolved missions.

use guild_logic::resolution::Casualty;
use serde::Serialize;

use crate::orders::OrderId;
use crate::roster::HunterId;

/// What happened to one dispatched hunter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HunterOutcome {
    pub hunter: HunterId,
    pub name: String,
    pub casualty: Casualty,
    /// Experience granted; zero for the dead.
    pub xp_gained: u32,
    pub leveled_up: bool,
    /// Level after experience was applied.
    pub level: u32,
}

impl HunterOutcome {
    pub fn died(&self) -> bool {
        self.casualty == Casualty::Died
    }

    pub fn injured(&self) -> bool {
        self.casualty == Casualty::Injured
    }
}

/// Immutable record of one resolved mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionReport {
    pub order: OrderId,
    pub title: String,
    pub difficulty: i32,
    pub success: bool,
    /// Chance the outcome draw was made against, percent.
    pub chance: f32,
    pub party_strength: i32,
    pub gold: i64,
    pub standing: i64,
    pub outcomes: Vec<HunterOutcome>,
}

impl MissionReport {
    pub fn total_xp(&self) -> u32 {
        self.outcomes.iter().map(|o| o.xp_gained).sum()
    }

    pub fn survivors(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.died()).count()
    }

    pub fn deaths(&self) -> usize {
        self.outcomes.iter().filter(|o| o.died()).count()
    }

    pub fn injuries(&self) -> usize {
        self.outcomes.iter().filter(|o| o.injured()).count()
    }
}

/// Aggregate numbers over the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub missions: usize,
    pub successes: usize,
    pub failures: usize,
    pub injuries: usize,
    pub deaths: usize,
    pub gold_earned: i64,
    pub standing_gained: i64,
}

impl HistorySummary {
    /// Fraction of missions that succeeded, 0.0 with no missions.
    pub fn success_rate(&self) -> f64 {
        if self.missions == 0 {
            0.0
        } else {
            self.successes as f64 / self.missions as f64
        }
    }
}

/// Append-only list of mission reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionHistory {
    reports: Vec<MissionReport>,
}

impl MissionHistory {
    pub fn push(&mut self, report: MissionReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[MissionReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn last(&self) -> Option<&MissionReport> {
        self.reports.last()
    }

    pub fn summary(&self) -> HistorySummary {
        self.reports
            .iter()
            .fold(HistorySummary::default(), |mut s, r| {
                s.missions += 1;
                if r.success {
                    s.successes += 1;
                } else {
                    s.failures += 1;
                }
                s.injuries += r.injuries();
                s.deaths += r.deaths();
                s.gold_earned += r.gold;
                s.standing_gained += r.standing;
                s
            })
    }
}
