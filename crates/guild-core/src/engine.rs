//! Guild engine - main entry point for running the guild.
//!
//! Owns the clock, ledger, roster, and order board and passes them to each
//! other explicitly. A host drives it by calling [`GuildEngine::update`] once
//! per frame with the real elapsed time, and forwards operator actions to the
//! action methods. Every action either applies fully or returns an error.

use guild_logic::resolution::ResolutionConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, CountdownPurpose};
use crate::config::GuildConfig;
use crate::data::GameData;
use crate::error::{DataError, GuildError, Result};
use crate::events::{ClockEvent, LedgerEvent, OrderEvent, RosterEvent};
use crate::ledger::Ledger;
use crate::orders::{generate_spec, OrderBoard, OrderId, OrderSink, OrderSpec};
use crate::party::PartyPreview;
use crate::report::MissionReport;
use crate::roster::{HunterId, HunterState, Roster};

/// What happened during one [`GuildEngine::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSummary {
    pub virtual_delta: f64,
    pub days_started: Vec<u64>,
    /// Orders whose staffing window ran out.
    pub expired: Vec<OrderId>,
    pub reports: Vec<MissionReport>,
    /// Hunters unlocked by standing gained this update.
    pub recruited: Vec<HunterId>,
}

/// Main guild engine.
#[derive(Debug)]
pub struct GuildEngine {
    config: GuildConfig,
    data: GameData,
    clock: Clock,
    ledger: Ledger,
    roster: Roster,
    board: OrderBoard,
    rng: StdRng,
    missed_upkeep: u64,
}

impl GuildEngine {
    /// Build an engine. Nothing happens until [`GuildEngine::start`] (or the
    /// first update), so subscribers can attach first.
    pub fn new(data: GameData, config: GuildConfig) -> std::result::Result<Self, DataError> {
        config.validate()?;
        data.validate()?;
        let roster = Roster::from_data(&data)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            clock: Clock::new(config.time_scale),
            ledger: Ledger::new(config.starting_gold, config.starting_standing),
            roster,
            board: OrderBoard::new(),
            rng,
            missed_upkeep: 0,
            config,
            data,
        })
    }

    /// Recruit the starting roster and begin day 0 (paying its upkeep).
    /// Calling it again does nothing.
    pub fn start(&mut self) -> Vec<HunterId> {
        if self.clock.is_started() {
            return Vec::new();
        }
        let recruited = self.roster.recruit_unlocked(self.ledger.standing());
        if let Some(day) = self.clock.start() {
            self.day_started(day);
        }
        recruited
    }

    /// Advance by `real_delta` real seconds.
    ///
    /// Day boundaries are settled first, then expired countdowns are handled
    /// one at a time in expiry order.
    pub fn update(&mut self, real_delta: f64) -> UpdateSummary {
        let mut summary = UpdateSummary {
            recruited: self.start(),
            ..UpdateSummary::default()
        };

        let tick = self.clock.advance(real_delta);
        summary.virtual_delta = tick.virtual_delta;
        for &day in &tick.days_started {
            self.day_started(day);
        }
        summary.days_started = tick.days_started;

        while let Some(countdown) = self.clock.pop_due() {
            let handled = self.board.handle_expiry(
                countdown,
                &mut self.clock,
                &mut self.roster,
                &mut self.ledger,
                &self.config.resolution,
                &mut self.rng,
            );
            match handled {
                Ok(Some(report)) => {
                    summary
                        .recruited
                        .extend(self.roster.recruit_unlocked(self.ledger.standing()));
                    summary.reports.push(report);
                }
                Ok(None) => summary.expired.push(countdown.order),
                Err(err) => {
                    log::warn!("countdown for order {} failed: {err}", countdown.order);
                    // an unresolvable mission is closed and its party released
                    if countdown.purpose == CountdownPurpose::Mission {
                        self.board
                            .abandon(countdown.order, &mut self.clock, &mut self.roster);
                    }
                }
            }
        }
        summary
    }

    fn day_started(&mut self, day: u64) {
        if let Err(err) = self.pay_upkeep() {
            self.missed_upkeep += 1;
            log::warn!("day {day}: unable to pay upkeep ({err})");
        }
    }

    // ── Orders ─────────────────────────────────────────────────────────

    /// Generate an order for the current standing and offer it.
    pub fn generate_order(&mut self) -> OrderId {
        let spec = self.roll_spec();
        self.board.offer(spec)
    }

    /// Generate an order and hand it to `sink` instead of the board.
    pub fn generate_into(&mut self, sink: &mut impl OrderSink) {
        let spec = self.roll_spec();
        sink.receive_order(spec);
    }

    fn roll_spec(&mut self) -> OrderSpec {
        generate_spec(
            &self.data,
            self.ledger.standing(),
            &self.config.generation,
            &mut self.rng,
        )
    }

    /// Offer a previously generated order.
    pub fn offer(&mut self, spec: OrderSpec) -> OrderId {
        self.board.offer(spec)
    }

    pub fn accept(&mut self, order: OrderId) -> Result<()> {
        self.board.accept(order, &mut self.clock)
    }

    pub fn decline(&mut self, order: OrderId) -> Result<()> {
        self.board.decline(order)
    }

    pub fn refer(&mut self, order: OrderId) -> Result<()> {
        self.board
            .refer(order, &mut self.ledger, self.config.referral_payout)
    }

    pub fn draft_add(&mut self, order: OrderId, hunter: HunterId) -> Result<()> {
        self.board.draft_add(order, hunter, &self.roster)
    }

    pub fn draft_remove(&mut self, order: OrderId, hunter: HunterId) -> Result<()> {
        self.board.draft_remove(order, hunter)
    }

    pub fn propose(&mut self, order: OrderId, party: &[HunterId]) -> Result<()> {
        self.board.propose(order, party, &self.roster)
    }

    pub fn withdraw(&mut self, order: OrderId) -> Result<()> {
        self.board.withdraw(order)
    }

    pub fn preview(&self, order: OrderId) -> Result<PartyPreview> {
        self.board
            .preview(order, &self.roster, &self.config.resolution)
    }

    pub fn dispatch(&mut self, order: OrderId, party: &[HunterId]) -> Result<()> {
        self.board
            .dispatch(order, party, &mut self.clock, &mut self.roster)
    }

    pub fn dispatch_draft(&mut self, order: OrderId) -> Result<()> {
        self.board
            .dispatch_draft(order, &mut self.clock, &mut self.roster)
    }

    // ── Economy ────────────────────────────────────────────────────────

    /// Paid promotion: debit `base_cost * level`, then add one level.
    pub fn level_up(&mut self, hunter: HunterId) -> Result<u32> {
        if self.roster.state(hunter)? == HunterState::Deceased {
            return Err(GuildError::HunterDeceased(hunter));
        }
        let cost = self
            .roster
            .level_up_cost(hunter, self.config.level_up_base_cost)?;
        self.ledger.debit_gold(cost)?;
        let level = self.roster.promote(hunter)?;
        log::info!("hunter {hunter} promoted to level {level} for {cost} gold");
        Ok(level)
    }

    /// Debit the roster's daily upkeep. Returns the remaining gold.
    pub fn pay_upkeep(&mut self) -> Result<i64> {
        let upkeep = self.roster.daily_upkeep();
        self.ledger.debit_gold(upkeep)
    }

    // ── Time ───────────────────────────────────────────────────────────

    pub fn set_time_scale(&mut self, scale: f64) {
        self.clock.set_time_scale(scale);
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    // ── Subscriptions ──────────────────────────────────────────────────

    pub fn on_clock(&mut self, f: impl FnMut(&ClockEvent) + Send + 'static) {
        self.clock.events_mut().subscribe(f);
    }

    pub fn on_ledger(&mut self, f: impl FnMut(&LedgerEvent) + Send + 'static) {
        self.ledger.events_mut().subscribe(f);
    }

    pub fn on_roster(&mut self, f: impl FnMut(&RosterEvent) + Send + 'static) {
        self.roster.events_mut().subscribe(f);
    }

    pub fn on_orders(&mut self, f: impl FnMut(&OrderEvent) + Send + 'static) {
        self.board.events_mut().subscribe(f);
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn board(&self) -> &OrderBoard {
        &self.board
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn config(&self) -> &GuildConfig {
        &self.config
    }

    pub fn resolution_config(&self) -> &ResolutionConfig {
        &self.config.resolution
    }

    /// Days on which upkeep could not be paid.
    pub fn missed_upkeep(&self) -> u64 {
        self.missed_upkeep
    }
}
