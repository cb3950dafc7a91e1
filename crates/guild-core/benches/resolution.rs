use criterion::{black_box, criterion_group, criterion_main, Criterion};
use guild_core::orders::generate_spec;
use guild_core::prelude::*;
use guild_core::resolver::{resolve, Combatant};
use rand::rngs::StdRng;
use rand::SeedableRng;

const BALANCE_JSON: &str = include_str!("../../../data/balance.json");

fn balance() -> GameData {
    GameData::from_json_str(BALANCE_JSON).expect("bundled balance data parses")
}

fn bench_generation(c: &mut Criterion) {
    let data = balance();
    let config = GuildConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("generate_spec", |b| {
        b.iter(|| generate_spec(&data, black_box(40), &config.generation, &mut rng))
    });
}

fn bench_resolution(c: &mut Criterion) {
    let mut engine = GuildEngine::new(balance(), GuildConfig::seeded(1)).expect("engine builds");
    let hunters = engine.start();
    let order = engine.generate_order();
    engine.accept(order).expect("fresh order accepts");

    let party: Vec<Combatant> = hunters
        .iter()
        .map(|&h| engine.roster().combatant(h).expect("recruited hunter"))
        .collect();
    let order = engine.board().order(order).expect("order on board");
    let config = engine.resolution_config().clone();
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("resolve_party", |b| {
        b.iter(|| resolve(order, black_box(&party), &config, &mut rng))
    });
}

criterion_group!(benches, bench_generation, bench_resolution);
criterion_main!(benches);
