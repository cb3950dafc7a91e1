//! The order board - every live order and its state machine.
//!
//! The board owns orders from the moment they are offered until they reach
//! a terminal state, then drops them (resolved missions live on in the
//! [`MissionHistory`]). Collaborators are passed in explicitly: the clock
//! for countdowns, the roster for party members, the ledger for payouts.

use std::collections::BTreeMap;

use guild_logic::resolution::ResolutionConfig;
use rand::Rng;
use serde::Serialize;

use super::order::{Order, OrderId, OrderSpec, OrderState};
use crate::clock::{Clock, CountdownId, CountdownPurpose};
use crate::error::{GuildError, Result};
use crate::events::{EventBus, OrderEvent};
use crate::ledger::Ledger;
use crate::party::{validate_party, PartyFormation, PartyPreview};
use crate::report::{MissionHistory, MissionReport};
use crate::resolver::{apply_report, resolve};
use crate::roster::{HunterId, HunterState, Roster};

/// Receiver of freshly generated orders.
///
/// Whatever triggers order generation hands the result to a sink; the board
/// is the usual one, but a caller may queue specs elsewhere and offer them
/// later.
pub trait OrderSink {
    fn receive_order(&mut self, spec: OrderSpec);
}

impl OrderSink for Vec<OrderSpec> {
    fn receive_order(&mut self, spec: OrderSpec) {
        self.push(spec);
    }
}

/// Lifetime counters per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub offered: u64,
    pub accepted: u64,
    pub dispatched: u64,
    pub completed: u64,
    pub failed: u64,
    pub expired: u64,
    pub declined: u64,
    pub referred: u64,
}

impl BoardStats {
    fn record_close(&mut self, state: OrderState) {
        match state {
            OrderState::Completed => self.completed += 1,
            OrderState::Failed => self.failed += 1,
            OrderState::Expired => self.expired += 1,
            OrderState::Declined => self.declined += 1,
            OrderState::Referred => self.referred += 1,
            OrderState::Offered | OrderState::Accepted | OrderState::Dispatched => {}
        }
    }
}

/// Live orders, party drafts, and mission history.
#[derive(Debug, Default)]
pub struct OrderBoard {
    next_id: u64,
    orders: BTreeMap<OrderId, Order>,
    drafts: BTreeMap<OrderId, PartyFormation>,
    history: MissionHistory,
    stats: BoardStats,
    events: EventBus<OrderEvent>,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new order in `Offered`.
    pub fn offer(&mut self, spec: OrderSpec) -> OrderId {
        self.next_id += 1;
        let id = OrderId(self.next_id);
        log::info!(
            "order {id} offered: {} (difficulty {}, {} gold)",
            spec.title,
            spec.difficulty,
            spec.gold_reward
        );
        self.orders.insert(id, Order::new(id, spec));
        self.stats.offered += 1;
        self.events.emit(&OrderEvent::Offered(id));
        id
    }

    /// Offered → Accepted; starts the staffing countdown and an empty draft.
    pub fn accept(&mut self, id: OrderId, clock: &mut Clock) -> Result<()> {
        let order = self.expect_state(id, OrderState::Offered, "accept")?;
        let staffing = order.spec().staffing_secs;
        let draft = PartyFormation::new(id, order.spec());

        let countdown = CountdownId::staffing(id);
        clock.register(countdown, staffing);
        if let Some(order) = self.orders.get_mut(&id) {
            order.set_state(OrderState::Accepted);
            order.set_countdown(Some(countdown));
        }
        self.drafts.insert(id, draft);
        self.stats.accepted += 1;
        log::info!("order {id} accepted, {staffing:.0}s to staff");
        self.events.emit(&OrderEvent::Accepted(id));
        Ok(())
    }

    /// Offered → Declined.
    pub fn decline(&mut self, id: OrderId) -> Result<()> {
        self.expect_state(id, OrderState::Offered, "decline")?;
        self.close(id, OrderState::Declined);
        Ok(())
    }

    /// Offered → Referred; credits the referral payout.
    pub fn refer(&mut self, id: OrderId, ledger: &mut Ledger, payout: i64) -> Result<()> {
        self.expect_state(id, OrderState::Offered, "refer")?;
        ledger.credit_gold(payout);
        self.close(id, OrderState::Referred);
        Ok(())
    }

    /// Accepted → Dispatched with an explicit party.
    ///
    /// Cancels the staffing countdown, deploys every member, and starts the
    /// mission countdown. Nothing changes if the party is rejected.
    pub fn dispatch(
        &mut self,
        id: OrderId,
        party: &[HunterId],
        clock: &mut Clock,
        roster: &mut Roster,
    ) -> Result<()> {
        let order = self.expect_state(id, OrderState::Accepted, "dispatch")?;
        let spec = order.spec();
        validate_party(party, spec.min_party, spec.max_party, roster)?;
        let mission = spec.mission_secs;

        for &hunter in party {
            roster.set_state(hunter, HunterState::Deployed)?;
        }
        clock.unregister(CountdownId::staffing(id));
        let countdown = CountdownId::mission(id);
        clock.register(countdown, mission);
        if let Some(order) = self.orders.get_mut(&id) {
            order.assign_party(party.to_vec());
            order.set_state(OrderState::Dispatched);
            order.set_countdown(Some(countdown));
        }
        self.drafts.remove(&id);
        self.stats.dispatched += 1;
        log::info!("order {id} dispatched with {} hunters", party.len());
        self.events.emit(&OrderEvent::Dispatched(id));
        Ok(())
    }

    /// Dispatch the order's current draft.
    pub fn dispatch_draft(
        &mut self,
        id: OrderId,
        clock: &mut Clock,
        roster: &mut Roster,
    ) -> Result<()> {
        let members = self.draft_of(id)?.members().to_vec();
        self.dispatch(id, &members, clock, roster)
    }

    /// Staffing window ran out: Accepted → Expired.
    pub fn expire(&mut self, id: OrderId, clock: &mut Clock) -> Result<()> {
        self.expect_state(id, OrderState::Accepted, "expire")?;
        clock.unregister(CountdownId::staffing(id));
        self.close(id, OrderState::Expired);
        Ok(())
    }

    /// Mission countdown ran out: resolve, apply, and close the order.
    pub fn complete(
        &mut self,
        id: OrderId,
        clock: &mut Clock,
        roster: &mut Roster,
        ledger: &mut Ledger,
        config: &ResolutionConfig,
        rng: &mut impl Rng,
    ) -> Result<MissionReport> {
        let order = self.expect_state(id, OrderState::Dispatched, "complete")?;
        let party = order
            .party()
            .iter()
            .map(|&h| roster.combatant(h))
            .collect::<Result<Vec<_>>>()?;
        let report = resolve(order, &party, config, rng);
        apply_report(&report, roster, ledger)?;

        clock.unregister(CountdownId::mission(id));
        if let Some(order) = self.orders.get_mut(&id) {
            order.take_party();
        }
        let state = if report.success {
            OrderState::Completed
        } else {
            OrderState::Failed
        };
        log::info!(
            "order {id} {}: {:.1}% chance, {} gold, {} standing, {} dead",
            if report.success { "succeeded" } else { "failed" },
            report.chance,
            report.gold,
            report.standing,
            report.deaths()
        );
        self.history.push(report.clone());
        self.events.emit(&OrderEvent::MissionResolved(report.clone()));
        self.close(id, state);
        Ok(report)
    }

    /// Route an expired countdown to its transition.
    ///
    /// Returns the mission report when the countdown was a mission.
    pub fn handle_expiry(
        &mut self,
        countdown: CountdownId,
        clock: &mut Clock,
        roster: &mut Roster,
        ledger: &mut Ledger,
        config: &ResolutionConfig,
        rng: &mut impl Rng,
    ) -> Result<Option<MissionReport>> {
        match countdown.purpose {
            CountdownPurpose::Staffing => {
                self.expire(countdown.order, clock)?;
                Ok(None)
            }
            CountdownPurpose::Mission => self
                .complete(countdown.order, clock, roster, ledger, config, rng)
                .map(Some),
        }
    }

    /// Close an order whose countdown could not be handled, without
    /// resolving it.
    ///
    /// Both countdowns are cancelled and deployed members go back to
    /// `Available`. A dispatched order closes as `Failed`, an accepted one as
    /// `Expired`, an offered one as `Declined`. Returns `false` if the order
    /// is not on the board.
    pub fn abandon(&mut self, id: OrderId, clock: &mut Clock, roster: &mut Roster) -> bool {
        let (state, party) = match self.orders.get_mut(&id) {
            Some(order) => (order.state(), order.take_party()),
            None => return false,
        };
        clock.unregister(CountdownId::staffing(id));
        clock.unregister(CountdownId::mission(id));
        for hunter in party {
            if matches!(roster.state(hunter), Ok(HunterState::Deployed)) {
                if let Err(err) = roster.set_state(hunter, HunterState::Available) {
                    log::warn!("order {id}: could not release hunter {hunter}: {err}");
                }
            }
        }
        let closed = match state {
            OrderState::Offered => OrderState::Declined,
            OrderState::Accepted => OrderState::Expired,
            _ => OrderState::Failed,
        };
        log::warn!("order {id} abandoned in {state:?}");
        self.close(id, closed);
        true
    }

    // ── Drafts ─────────────────────────────────────────────────────────

    pub fn draft(&self, id: OrderId) -> Option<&PartyFormation> {
        self.drafts.get(&id)
    }

    pub fn draft_add(&mut self, id: OrderId, hunter: HunterId, roster: &Roster) -> Result<()> {
        self.draft_mut(id, "draft")?.add(hunter, roster)
    }

    pub fn draft_remove(&mut self, id: OrderId, hunter: HunterId) -> Result<()> {
        self.draft_mut(id, "draft")?.remove(hunter)
    }

    /// Replace the draft with a complete, valid party.
    pub fn propose(&mut self, id: OrderId, members: &[HunterId], roster: &Roster) -> Result<()> {
        self.draft_mut(id, "propose")?.propose(members, roster)
    }

    /// Empty the draft.
    pub fn withdraw(&mut self, id: OrderId) -> Result<()> {
        self.draft_mut(id, "withdraw")?.clear();
        Ok(())
    }

    pub fn preview(
        &self,
        id: OrderId,
        roster: &Roster,
        config: &ResolutionConfig,
    ) -> Result<PartyPreview> {
        self.draft_of(id)?.preview(roster, config)
    }

    fn draft_of(&self, id: OrderId) -> Result<&PartyFormation> {
        self.expect_state(id, OrderState::Accepted, "draft")?;
        self.drafts.get(&id).ok_or(GuildError::UnknownOrder(id))
    }

    fn draft_mut(&mut self, id: OrderId, action: &'static str) -> Result<&mut PartyFormation> {
        self.expect_state(id, OrderState::Accepted, action)?;
        self.drafts.get_mut(&id).ok_or(GuildError::UnknownOrder(id))
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Every tracked order, oldest first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn offered(&self) -> Vec<&Order> {
        self.in_state(|s| s == OrderState::Offered)
    }

    /// Accepted and dispatched orders.
    pub fn active(&self) -> Vec<&Order> {
        self.in_state(OrderState::is_active)
    }

    pub fn dispatched(&self) -> Vec<&Order> {
        self.in_state(|s| s == OrderState::Dispatched)
    }

    fn in_state(&self, pred: impl Fn(OrderState) -> bool) -> Vec<&Order> {
        self.orders.values().filter(|o| pred(o.state())).collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn history(&self) -> &MissionHistory {
        &self.history
    }

    pub fn stats(&self) -> &BoardStats {
        &self.stats
    }

    pub fn events_mut(&mut self) -> &mut EventBus<OrderEvent> {
        &mut self.events
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn expect_state(
        &self,
        id: OrderId,
        expected: OrderState,
        action: &'static str,
    ) -> Result<&Order> {
        let order = self.orders.get(&id).ok_or(GuildError::UnknownOrder(id))?;
        if order.state() != expected {
            return Err(GuildError::InvalidTransition {
                order: id,
                state: order.state(),
                action,
            });
        }
        Ok(order)
    }

    fn close(&mut self, id: OrderId, state: OrderState) {
        self.drafts.remove(&id);
        self.orders.remove(&id);
        self.stats.record_close(state);
        log::info!("order {id} closed as {state:?}");
        self.events.emit(&OrderEvent::Closed { order: id, state });
    }
}

impl OrderSink for OrderBoard {
    fn receive_order(&mut self, spec: OrderSpec) {
        self.offer(spec);
    }
}
