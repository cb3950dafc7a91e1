//! Integration tests for the full guild loop.
//!
//! Exercises: balance data → engine start → order generation → accept →
//! party drafting → dispatch → countdown expiry → resolution → rewards,
//! driven through the public engine API with the bundled balance file.
//!
//! All tests are headless and seeded, no wall clock involved.

use std::sync::{Arc, Mutex};

use guild_core::clock::{Clock, CountdownId};
use guild_core::ledger::Ledger;
use guild_core::orders::{OrderBoard, OrderSpec};
use guild_core::prelude::*;
use guild_core::roster::Roster;
use guild_logic::constants::SECONDS_PER_DAY;
use guild_logic::resolution::ResolutionConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

const BALANCE_JSON: &str = include_str!("../../../data/balance.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn balance() -> GameData {
    GameData::from_json_str(BALANCE_JSON).expect("bundled balance data parses")
}

fn engine(seed: u64) -> GuildEngine {
    let config = GuildConfig {
        time_scale: 1.0,
        starting_gold: 2_000,
        ..GuildConfig::seeded(seed)
    };
    GuildEngine::new(balance(), config).expect("engine builds")
}

/// One step of a simple operator: keep a few orders on the board, accept
/// them, and send out whoever is free.
fn operate(e: &mut GuildEngine) {
    if e.board().offered().len() < 2 {
        e.generate_order();
    }
    let offered: Vec<OrderId> = e.board().offered().iter().map(|o| o.id()).collect();
    for id in offered {
        e.accept(id).expect("offered orders accept");
    }
    let accepted: Vec<(OrderId, usize, usize)> = e
        .board()
        .active()
        .iter()
        .filter(|o| o.state() == OrderState::Accepted)
        .map(|o| (o.id(), o.spec().min_party, o.spec().max_party))
        .collect();
    for (id, min, max) in accepted {
        let free = e.roster().available();
        if free.len() >= min {
            let party: Vec<HunterId> = free.into_iter().take(max).collect();
            e.dispatch(id, &party).expect("valid party dispatches");
        }
    }
}

fn assert_party_invariant(e: &GuildEngine) {
    for order in e.board().orders() {
        let size = order.party().len();
        if order.state() == OrderState::Dispatched {
            assert!(size >= order.spec().min_party && size <= order.spec().max_party);
        } else {
            assert_eq!(size, 0, "order {} in {:?} holds a party", order.id(), order.state());
        }
    }
}

fn spec(staffing: f64) -> OrderSpec {
    OrderSpec {
        title: "Ghoul".to_string(),
        description: "A Ghoul is causing trouble.".to_string(),
        monster: Some("ghoul".to_string()),
        difficulty: 12,
        gold_reward: 90,
        xp_reward: 40,
        staffing_secs: staffing,
        mission_secs: 600.0,
        min_party: 1,
        max_party: 2,
    }
}

// ── Data ───────────────────────────────────────────────────────────────

#[test]
fn bundled_balance_is_valid() {
    let data = balance();
    assert!(data.difficulty_tiers.len() >= 3);
    assert!(!data.monsters.is_empty());
    let profiles = data.hunter_profiles().unwrap();
    assert_eq!(profiles.len(), data.hunters.len());
    // someone must be hireable on day one
    assert!(profiles.iter().any(|p| p.unlock_standing == 0));
    // every standing from zero up is covered by some tier
    for standing in 0..300 {
        assert!(!data.eligible_tiers(standing).is_empty(), "gap at {standing}");
    }
}

// ── Lifecycle ──────────────────────────────────────────────────────────

#[test]
fn long_run_keeps_invariants() {
    let mut e = engine(1234);
    e.start();
    for _ in 0..(3 * 24 * 12) {
        operate(&mut e);
        e.update(300.0);
        assert_party_invariant(&e);
        assert!(e.ledger().gold() >= 0);
        assert!(e.ledger().standing() >= 0);
        for &id in e.roster().ids() {
            let view = e.roster().view(id).unwrap();
            assert!(view.level >= 1);
            assert!(view.xp < view.xp_to_next);
        }
    }
    let summary = e.board().history().summary();
    assert!(summary.missions > 3, "only {} missions", summary.missions);
    assert_eq!(summary.missions, summary.successes + summary.failures);
    assert_eq!(e.clock().current_day(), 3);
}

#[test]
fn same_seed_same_history() {
    let run = |seed| {
        let mut e = engine(seed);
        e.start();
        for _ in 0..200 {
            operate(&mut e);
            e.update(300.0);
        }
        (
            e.board().history().reports().to_vec(),
            e.ledger().gold(),
            e.ledger().standing(),
        )
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn deployed_hunters_return_or_die() {
    let mut e = engine(9);
    let hunters = e.start();
    let order = e.generate_order();
    e.accept(order).unwrap();
    let (max, xp_reward) = {
        let spec = e.board().order(order).unwrap().spec();
        (spec.max_party, spec.xp_reward)
    };
    let party: Vec<HunterId> = hunters.iter().copied().take(max).collect();
    e.dispatch(order, &party).unwrap();
    for &h in &party {
        assert_eq!(e.roster().state(h).unwrap(), HunterState::Deployed);
    }

    let mut reports = Vec::new();
    while reports.is_empty() {
        reports = e.update(600.0).reports;
    }
    let report = &reports[0];
    assert_eq!(report.outcomes.len(), party.len());
    let survivor_xp = if report.success { xp_reward } else { xp_reward / 2 };
    for outcome in &report.outcomes {
        let state = e.roster().state(outcome.hunter).unwrap();
        if outcome.died() {
            assert_eq!(state, HunterState::Deceased);
            assert_eq!(outcome.xp_gained, 0);
            assert!(!outcome.injured());
        } else {
            assert_eq!(state, HunterState::Available);
            assert_eq!(outcome.xp_gained, survivor_xp);
        }
    }
}

#[test]
fn staffing_expiry_fires_once_while_registry_changes() {
    let mut board = OrderBoard::new();
    let mut clock = Clock::new(1.0);
    let mut roster = Roster::from_data(&balance()).unwrap();
    let mut ledger = Ledger::new(0, 0);
    let mut rng = StdRng::seed_from_u64(3);
    let cfg = ResolutionConfig::default();
    let hunters = roster.recruit_unlocked(0);

    let a = board.offer(spec(120.0));
    let b = board.offer(spec(120.0));
    board.accept(a, &mut clock).unwrap();
    board.accept(b, &mut clock).unwrap();
    board.draft_add(a, hunters[0], &roster).unwrap();
    clock.advance(120.0);

    let mut fired = Vec::new();
    while let Some(id) = clock.pop_due() {
        fired.push(id);
        board
            .handle_expiry(id, &mut clock, &mut roster, &mut ledger, &cfg, &mut rng)
            .unwrap();
        // the first handler's side effect: staff the other order in time
        if id.order == a {
            board.dispatch(b, &hunters[..1], &mut clock, &mut roster).unwrap();
        }
    }

    assert_eq!(fired, vec![CountdownId::staffing(a)]);
    assert!(board.order(a).is_none());
    assert!(board.draft(a).is_none());
    assert_eq!(board.order(b).unwrap().state(), OrderState::Dispatched);
    assert!(clock.is_registered(CountdownId::mission(b)));
    assert!(!clock.is_registered(CountdownId::staffing(a)));
    clock.advance(1.0);
    assert_eq!(clock.pop_due(), None);
}

// ── Economy ────────────────────────────────────────────────────────────

#[test]
fn upkeep_is_charged_every_day() {
    let mut e = engine(4);
    e.start();
    let daily = e.roster().daily_upkeep();
    assert!(daily > 0);
    assert_eq!(e.ledger().gold(), 2_000 - daily);
    let summary = e.update(SECONDS_PER_DAY * 2.0);
    assert_eq!(summary.days_started, vec![1, 2]);
    assert_eq!(e.ledger().gold(), 2_000 - 3 * daily);
}

#[test]
fn failed_level_up_changes_nothing() {
    let config = GuildConfig {
        starting_gold: 0,
        ..GuildConfig::seeded(2)
    };
    let mut e = GuildEngine::new(balance(), config).unwrap();
    let hunter = e.start()[0];
    let before = e.roster().progression(hunter).unwrap();
    assert!(matches!(
        e.level_up(hunter),
        Err(GuildError::InsufficientFunds { available: 0, .. })
    ));
    assert_eq!(e.roster().progression(hunter).unwrap(), before);
    assert_eq!(e.ledger().gold(), 0);
}

#[test]
fn rejected_actions_are_side_effect_free() {
    let mut e = engine(6);
    let hunters = e.start();
    let gold = e.ledger().gold();
    let order = e.generate_order();
    assert!(e.dispatch(order, &hunters[..1]).is_err());
    e.accept(order).unwrap();
    assert!(e.refer(order).is_err());
    assert!(e.dispatch(order, &[hunters[0], hunters[0]]).is_err());
    assert_eq!(e.ledger().gold(), gold);
    assert_eq!(e.roster().available().len(), hunters.len());
    assert_eq!(e.board().order(order).unwrap().state(), OrderState::Accepted);
}

// ── Notifications ──────────────────────────────────────────────────────

#[test]
fn observers_see_changes_in_order() {
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut e = engine(8);

    let l = Arc::clone(&log);
    e.on_orders(move |ev| {
        let line = match ev {
            OrderEvent::Offered(id) => format!("offered {id}"),
            OrderEvent::Accepted(id) => format!("accepted {id}"),
            OrderEvent::Dispatched(id) => format!("dispatched {id}"),
            OrderEvent::MissionResolved(r) => format!("resolved {}", r.order),
            OrderEvent::Closed { order, state } => format!("closed {order} {state:?}"),
        };
        l.lock().unwrap().push(line);
    });
    let l = Arc::clone(&log);
    e.on_ledger(move |ev| {
        if let LedgerEvent::StandingChanged(s) = ev {
            l.lock().unwrap().push(format!("standing {s}"));
        }
    });

    let hunters = e.start();
    let order = e.generate_order();
    e.accept(order).unwrap();
    e.dispatch(order, &hunters[..1]).unwrap();
    let mut reports = Vec::new();
    while reports.is_empty() {
        reports = e.update(600.0).reports;
    }

    let log = log.lock().unwrap();
    assert_eq!(log[0], format!("offered {order}"));
    assert_eq!(log[1], format!("accepted {order}"));
    assert_eq!(log[2], format!("dispatched {order}"));
    let resolved = log.iter().position(|l| l.starts_with("resolved")).unwrap();
    let closed = log.iter().position(|l| l.starts_with("closed")).unwrap();
    assert!(resolved < closed);
    if reports[0].success {
        // standing is credited while the mission is applied, before the report goes out
        let standing = log.iter().position(|l| l.starts_with("standing")).unwrap();
        assert!(standing < resolved);
    }
}
