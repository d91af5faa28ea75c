//! Cargo announcements and auctions.
//!
//! Announcements tell the market which trades will come up at a future
//! time, then schedule the auction for that time together with their own
//! successor. The cycle keeps itself alive through the queue; there is
//! no external timer.

use tracing::{debug, info};

use crate::error::KernelResult;
use crate::observer::ActionData;
use crate::simulation::ExecutionContext;
use crate::time::SimTime;

use super::Event;

/// Announce the trades available at `target` and schedule what follows.
///
/// `seed_initial_auction` is set for the bootstrap announcement: it also
/// schedules the auction at time zero so the very first auction runs.
pub(super) fn announce(
    target: SimTime,
    seed_initial_auction: bool,
    info_label: &mut Option<String>,
    ctx: &mut ExecutionContext<'_>,
) -> KernelResult<ActionData> {
    let trades = ctx.shipping.get_trades(target);
    let companies = ctx.headquarters.get_companies();
    ctx.market.inform_future_trades(&trades, target, &companies);
    *info_label = Some(format!("#Trades: {}. For time {}", trades.len(), target));
    info!(
        now = %ctx.now(),
        for_time = %target,
        trades = trades.len(),
        "announced future trades"
    );

    if seed_initial_auction {
        ctx.schedule(Event::cargo_auction(SimTime::ZERO))?;
    }
    ctx.schedule(Event::cargo_auction(target))?;

    let next_target = target.plus(ctx.config.announcement_interval);
    if ctx.config.renews_announcement_for(next_target) {
        ctx.schedule(Event::cargo_announcement(target, next_target))?;
    } else {
        debug!(next_target = %next_target, "announcement horizon reached");
    }

    Ok(ActionData::Announced {
        for_time: target,
        trades: trades.len(),
    })
}

/// Hand the trades available at `time` to the market for distribution.
pub(super) fn auction(
    time: SimTime,
    info_label: &mut Option<String>,
    ctx: &mut ExecutionContext<'_>,
) -> KernelResult<ActionData> {
    let trades = ctx.shipping.get_trades(time);
    *info_label = Some(format!("#Trades: {}", trades.len()));
    let companies = ctx.headquarters.get_companies();
    let distribution = ctx.market.distribute_trades(time, &trades, &companies);
    info!(
        now = %ctx.now(),
        %time,
        trades = trades.len(),
        allocated = distribution.allocated_count(),
        "cargo auction held"
    );
    Ok(ActionData::Auction(distribution))
}
