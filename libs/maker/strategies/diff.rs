//! Slot diffing shared by every strategy.
//!
//! Expected orders are grouped by slot and compared against the open orders
//! of the current snapshot. The engine matches quoting slots, never order
//! ids, so partially filled and topped-up orders reconcile naturally.

use super::OrderDiff;
use crate::constants::{MIN_SIZE, SIZE_DECIMALS};
use crate::domain::math::round_to;
use crate::domain::{Order, Slot};
use std::collections::BTreeMap;

struct SlotTarget {
    price: f64,
    size: f64,
}

/// Compute the minimal diff from `open` toward `expected`.
///
/// - an open order whose slot is not expected is cancelled;
/// - a slot whose open size exceeds its expected size is cancelled wholesale
///   and re-placed at the expected size;
/// - a slot whose open size falls short places exactly the shortfall, so the
///   resting portion is never churned;
/// - placements below [`MIN_SIZE`] are dropped.
///
/// Slots are visited in a fixed order, so the output is deterministic.
pub fn diff_orders(open: &[Order], expected: &[Order]) -> OrderDiff {
    let mut targets: BTreeMap<Slot, SlotTarget> = BTreeMap::new();
    for order in expected {
        targets
            .entry(order.slot())
            .and_modify(|target| target.size += order.size)
            .or_insert(SlotTarget {
                price: order.price,
                size: order.size,
            });
    }

    let mut diff = OrderDiff::default();
    for order in open {
        if !targets.contains_key(&order.slot()) {
            diff.to_cancel.push(order.clone());
        }
    }

    for (slot, target) in targets {
        let open_in_slot: Vec<&Order> =
            open.iter().filter(|order| order.slot() == slot).collect();
        let open_size: f64 = open_in_slot.iter().map(|order| order.size).sum();

        let new_size = if open_size > target.size {
            diff.to_cancel
                .extend(open_in_slot.into_iter().cloned());
            target.size
        } else {
            round_to(target.size - open_size, SIZE_DECIMALS)
        };

        if new_size >= MIN_SIZE {
            diff.to_place
                .push(Order::new(target.price, new_size, slot.side, slot.token));
        }
    }

    diff
}
