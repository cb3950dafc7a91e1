//! Guildhall Headless Campaign Harness
//!
//! Validates the balance data, the pure mission math, and a seeded
//! multi-day campaign driven through the engine. No wall clock, no UI.
//!
//! Usage:
//!   cargo run -p guild-simtest
//!   cargo run -p guild-simtest -- --verbose

use std::collections::BTreeMap;

use guild_core::orders::generate_spec;
use guild_core::prelude::*;
use guild_logic::constants::SECONDS_PER_DAY;
use guild_logic::progression::{grant_experience, LevelCurve, Progression};
use guild_logic::resolution::{preview_success_chance, ResolutionConfig};
use guild_logic::weighting::{select_by_roll, total_weight};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Balance data (same JSON the engine tests use) ──────────────────────
const BALANCE_JSON: &str = include_str!("../../../data/balance.json");

const CAMPAIGN_SEED: u64 = 20_240_601;
const CAMPAIGN_DAYS: u64 = 7;
/// Virtual seconds per campaign step.
const STEP_SECS: f64 = 300.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Guildhall Campaign Harness ===\n");

    let mut results = Vec::new();

    // 1. Balance data validation
    let data = match GameData::from_json_str(BALANCE_JSON) {
        Ok(data) => data,
        Err(e) => {
            println!("  ✗ balance_parse: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_balance(&data, verbose));

    // 2. Mission math sweep
    results.extend(validate_mission_math(verbose));

    // 3. Order generation distribution
    results.extend(validate_generation(&data, verbose));

    // 4. Seeded campaign
    results.extend(validate_campaign(&data, verbose));

    // 5. Reproducibility
    results.extend(validate_reproducibility(&data, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Balance Data ─────────────────────────────────────────────────────

fn validate_balance(data: &GameData, verbose: bool) -> Vec<TestResult> {
    println!("--- Balance Data ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "balance_has_content".into(),
        passed: !data.difficulty_tiers.is_empty()
            && !data.monsters.is_empty()
            && !data.hunters.is_empty(),
        detail: format!(
            "{} tiers, {} monsters, {} traits, {} hunters",
            data.difficulty_tiers.len(),
            data.monsters.len(),
            data.traits.len(),
            data.hunters.len()
        ),
    });

    // Every standing a fresh guild can reach must have a tier
    let gaps: Vec<i64> = (0..1_000)
        .filter(|&s| data.eligible_tiers(s).is_empty())
        .collect();
    results.push(TestResult {
        name: "balance_tier_coverage".into(),
        passed: gaps.is_empty(),
        detail: if gaps.is_empty() {
            "standing 0..1000 covered".into()
        } else {
            format!("{} uncovered standings, first {}", gaps.len(), gaps[0])
        },
    });

    let starters = data.hunters.iter().filter(|h| h.unlock_standing == 0).count();
    results.push(TestResult {
        name: "balance_starting_roster".into(),
        passed: starters > 0,
        detail: format!("{} hunters available on day one", starters),
    });

    // A fresh roster must be able to field a party for some day-one tier
    let smallest_party = data
        .eligible_tiers(0)
        .iter()
        .map(|t| t.min_party)
        .min()
        .unwrap_or(usize::MAX);
    results.push(TestResult {
        name: "balance_day_one_staffable".into(),
        passed: smallest_party <= starters,
        detail: format!(
            "smallest day-one party {}, starters {}",
            smallest_party, starters
        ),
    });

    let monster_traits: Vec<&String> = data.monsters.iter().flat_map(|m| &m.traits).collect();
    let dangling: Vec<String> = data
        .traits
        .iter()
        .flat_map(|t| &t.counters)
        .filter(|c| !monster_traits.contains(c))
        .cloned()
        .collect();
    results.push(TestResult {
        name: "balance_counters_resolve".into(),
        passed: dangling.is_empty(),
        detail: if dangling.is_empty() {
            "every trait counter names a monster trait".into()
        } else {
            format!("unknown monster traits: {}", dangling.join(", "))
        },
    });

    match data.hunter_profiles() {
        Ok(profiles) => {
            let weak: Vec<&str> = profiles
                .iter()
                .filter(|p| p.strength_at(p.starting_level) <= 0)
                .map(|p| p.name.as_str())
                .collect();
            results.push(TestResult {
                name: "balance_positive_strength".into(),
                passed: weak.is_empty(),
                detail: if weak.is_empty() {
                    "all hunters start with positive strength".into()
                } else {
                    format!("non-positive strength: {}", weak.join(", "))
                },
            });

            if verbose {
                println!("  Hunters:");
                for p in &profiles {
                    println!(
                        "    {:8} {:8} str {:3} (L5 {:3})  upkeep {:3}  unlock {}",
                        p.name,
                        p.class,
                        p.strength_at(p.starting_level),
                        p.strength_at(5),
                        p.daily_upkeep,
                        p.unlock_standing
                    );
                }
            }
        }
        Err(e) => results.push(TestResult {
            name: "balance_profiles".into(),
            passed: false,
            detail: format!("profile resolution failed: {}", e),
        }),
    }

    results
}

// ── 2. Mission Math ─────────────────────────────────────────────────────

fn validate_mission_math(verbose: bool) -> Vec<TestResult> {
    println!("--- Mission Math ---");
    let mut results = Vec::new();
    let config = ResolutionConfig::default();

    // Preview chance never decreases with strength and stays in band
    let chances: Vec<f32> = (0..=80)
        .map(|s| preview_success_chance(s, 30, 0.0, &config))
        .collect();
    let monotonic = chances.windows(2).all(|w| w[0] <= w[1]);
    let in_band = chances
        .iter()
        .all(|&c| c >= config.min_chance && c <= config.max_chance);
    results.push(TestResult {
        name: "chance_monotonic".into(),
        passed: monotonic,
        detail: format!(
            "strength 0..80 vs difficulty 30: {:.0}% .. {:.0}%",
            chances[0],
            chances[chances.len() - 1]
        ),
    });
    results.push(TestResult {
        name: "chance_clamped".into(),
        passed: in_band,
        detail: format!("band {}..{}", config.min_chance, config.max_chance),
    });

    // One big grant cascades through several levels
    let curve = LevelCurve::flat(100);
    let mut progression = Progression::new(1, 50);
    let gained = grant_experience(&mut progression, 260, &curve);
    results.push(TestResult {
        name: "xp_cascade".into(),
        passed: gained == 3 && progression == Progression::new(4, 10),
        detail: format!(
            "+260 xp from L1/50: +{} levels, now L{}/{}",
            gained, progression.level, progression.xp
        ),
    });

    // Weighted roll covers every slot in proportion, zero weights count as one
    let weights = [3u32, 0, 1];
    let total = total_weight(&weights);
    let mut hits = [0u32; 3];
    for roll in 0..total {
        if let Some(i) = select_by_roll(&weights, roll) {
            hits[i] += 1;
        }
    }
    results.push(TestResult {
        name: "weighting_proportional".into(),
        passed: total == 5 && hits == [3, 1, 1],
        detail: format!("weights {:?} -> hits {:?}", weights, hits),
    });

    if verbose {
        println!("  Preview chance vs difficulty 30:");
        for s in (0..=80).step_by(10) {
            println!("    strength {:3}: {:5.1}%", s, chances[s as usize]);
        }
    }

    results
}

// ── 3. Order Generation ─────────────────────────────────────────────────

fn validate_generation(data: &GameData, verbose: bool) -> Vec<TestResult> {
    println!("--- Order Generation ---");
    let mut results = Vec::new();
    let config = GuildConfig::default().generation;
    let mut rng = StdRng::seed_from_u64(CAMPAIGN_SEED);

    for standing in [0i64, 15, 60, 250] {
        let specs: Vec<OrderSpec> = (0..2_000)
            .map(|_| generate_spec(data, standing, &config, &mut rng))
            .collect();

        let out_of_bounds = specs
            .iter()
            .filter(|s| {
                s.difficulty < config.min_difficulty
                    || s.difficulty > config.max_difficulty
                    || s.gold_reward < 0
                    || s.staffing_secs < config.min_duration_secs
                    || s.mission_secs < config.min_duration_secs
                    || s.min_party == 0
                    || s.min_party > s.max_party
            })
            .count();
        results.push(TestResult {
            name: format!("generation_bounds_standing_{}", standing),
            passed: out_of_bounds == 0,
            detail: format!("{} of {} specs out of bounds", out_of_bounds, specs.len()),
        });

        let named = specs.iter().filter(|s| s.monster.is_some()).count();
        results.push(TestResult {
            name: format!("generation_named_standing_{}", standing),
            passed: named == specs.len(),
            detail: format!("{} of {} orders target a monster", named, specs.len()),
        });

        if verbose {
            let mut by_monster: BTreeMap<&str, u32> = BTreeMap::new();
            for s in &specs {
                *by_monster.entry(s.title.as_str()).or_default() += 1;
            }
            let mean_difficulty =
                specs.iter().map(|s| f64::from(s.difficulty)).sum::<f64>() / specs.len() as f64;
            println!(
                "  standing {:3}: mean difficulty {:5.1}, monsters {:?}",
                standing, mean_difficulty, by_monster
            );
        }
    }

    results
}

// ── 4. Campaign ─────────────────────────────────────────────────────────

/// Keep two orders on offer, accept them, and send every free hunter out.
fn operate(engine: &mut GuildEngine) {
    if engine.board().offered().len() < 2 {
        engine.generate_order();
    }
    let offered: Vec<OrderId> = engine.board().offered().iter().map(|o| o.id()).collect();
    for id in offered {
        let _ = engine.accept(id);
    }
    let accepted: Vec<(OrderId, usize, usize)> = engine
        .board()
        .active()
        .iter()
        .filter(|o| o.state() == OrderState::Accepted)
        .map(|o| (o.id(), o.spec().min_party, o.spec().max_party))
        .collect();
    for (id, min, max) in accepted {
        let free = engine.roster().available();
        if free.len() >= min {
            let party: Vec<HunterId> = free.into_iter().take(max).collect();
            let _ = engine.dispatch(id, &party);
        }
    }
    // Spend spare gold on promotions, keeping a week of upkeep in reserve
    let reserve = engine.roster().daily_upkeep() * 7;
    for hunter in engine.roster().available() {
        let cost = engine
            .roster()
            .level_up_cost(hunter, engine.config().level_up_base_cost)
            .unwrap_or(i64::MAX);
        if engine.ledger().gold() - cost >= reserve {
            let _ = engine.level_up(hunter);
        }
    }
}

struct CampaignOutcome {
    gold: i64,
    standing: i64,
    summary: HistorySummary,
    roster_size: usize,
    deceased: usize,
    missed_upkeep: u64,
    violations: Vec<String>,
    history: String,
}

fn run_campaign(data: &GameData, seed: u64) -> CampaignOutcome {
    let config = GuildConfig {
        time_scale: 1.0,
        ..GuildConfig::seeded(seed)
    };
    let mut violations = Vec::new();
    let mut engine = match GuildEngine::new(data.clone(), config) {
        Ok(engine) => engine,
        Err(e) => {
            violations.push(format!("engine rejected balance data: {}", e));
            return CampaignOutcome {
                gold: 0,
                standing: 0,
                summary: HistorySummary::default(),
                roster_size: 0,
                deceased: 0,
                missed_upkeep: 0,
                violations,
                history: String::new(),
            };
        }
    };
    engine.start();

    let steps = (CAMPAIGN_DAYS as f64 * SECONDS_PER_DAY / STEP_SECS) as usize;
    for step in 0..steps {
        operate(&mut engine);
        engine.update(STEP_SECS);

        if engine.ledger().gold() < 0 || engine.ledger().standing() < 0 {
            violations.push(format!("step {}: negative ledger", step));
        }
        for order in engine.board().orders() {
            let size = order.party().len();
            let staffed = order.state() == OrderState::Dispatched;
            let ok = if staffed {
                size >= order.spec().min_party && size <= order.spec().max_party
            } else {
                size == 0
            };
            if !ok {
                violations.push(format!(
                    "step {}: order {} in {:?} has party of {}",
                    step,
                    order.id(),
                    order.state(),
                    size
                ));
            }
        }
        let deployed = engine.roster().in_state(HunterState::Deployed).len();
        let in_field: usize = engine
            .board()
            .dispatched()
            .iter()
            .map(|o| o.party().len())
            .sum();
        if deployed != in_field {
            violations.push(format!(
                "step {}: {} deployed hunters but {} party seats",
                step, deployed, in_field
            ));
        }
    }

    if engine.clock().current_day() != CAMPAIGN_DAYS {
        violations.push(format!(
            "campaign ended on day {}, expected {}",
            engine.clock().current_day(),
            CAMPAIGN_DAYS
        ));
    }

    let history = serde_json::to_string(engine.board().history().reports()).unwrap_or_default();
    CampaignOutcome {
        gold: engine.ledger().gold(),
        standing: engine.ledger().standing(),
        summary: engine.board().history().summary(),
        roster_size: engine.roster().len(),
        deceased: engine.roster().in_state(HunterState::Deceased).len(),
        missed_upkeep: engine.missed_upkeep(),
        violations,
        history,
    }
}

fn validate_campaign(data: &GameData, verbose: bool) -> Vec<TestResult> {
    println!("--- Campaign ({} days) ---", CAMPAIGN_DAYS);
    let mut results = Vec::new();
    let outcome = run_campaign(data, CAMPAIGN_SEED);

    results.push(TestResult {
        name: "campaign_invariants".into(),
        passed: outcome.violations.is_empty(),
        detail: if outcome.violations.is_empty() {
            "ledger, party, and deployment invariants held every step".into()
        } else {
            format!(
                "{} violations, first: {}",
                outcome.violations.len(),
                outcome.violations[0]
            )
        },
    });

    let summary = outcome.summary;
    results.push(TestResult {
        name: "campaign_missions_resolved".into(),
        passed: summary.missions > 0 && summary.missions == summary.successes + summary.failures,
        detail: format!(
            "{} missions, {} won, {} lost ({:.0}% success)",
            summary.missions,
            summary.successes,
            summary.failures,
            summary.success_rate() * 100.0
        ),
    });

    results.push(TestResult {
        name: "campaign_standing_grows".into(),
        passed: summary.successes == 0 || outcome.standing > 0,
        detail: format!("standing {} after {} wins", outcome.standing, summary.successes),
    });

    if verbose {
        println!("  Gold:           {}", outcome.gold);
        println!("  Standing:       {}", outcome.standing);
        println!("  Gold earned:    {}", summary.gold_earned);
        println!(
            "  Roster:         {} recruited, {} deceased",
            outcome.roster_size, outcome.deceased
        );
        println!(
            "  Casualties:     {} injuries, {} deaths",
            summary.injuries, summary.deaths
        );
        println!("  Missed upkeep:  {} days", outcome.missed_upkeep);
    }

    results
}

// ── 5. Reproducibility ──────────────────────────────────────────────────

fn validate_reproducibility(data: &GameData, _verbose: bool) -> Vec<TestResult> {
    println!("--- Reproducibility ---");
    let mut results = Vec::new();

    let a = run_campaign(data, 7);
    let b = run_campaign(data, 7);
    let same = a.history == b.history && a.gold == b.gold && a.standing == b.standing;
    results.push(TestResult {
        name: "seed_reproducible".into(),
        passed: same,
        detail: format!(
            "two runs with seed 7: {} and {} missions",
            a.summary.missions, b.summary.missions
        ),
    });

    let c = run_campaign(data, 8);
    results.push(TestResult {
        name: "seed_sensitive".into(),
        passed: c.history != a.history,
        detail: "a different seed gives a different history".into(),
    });

    results
}
