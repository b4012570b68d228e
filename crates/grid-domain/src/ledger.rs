use alloy::primitives::Address;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

use crate::NodeIdentity;

/// Position of a chain event: block number, then log index within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventPosition {
    pub block_number: u64,
    pub log_index: u64,
}

impl EventPosition {
    pub fn new(block_number: u64, log_index: u64) -> Self {
        Self {
            block_number,
            log_index,
        }
    }
}

impl std::fmt::Display for EventPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.block_number, self.log_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub address: Address,
    pub name: String,
    pub ip: String,
    pub domain: String,
    pub port: String,
}

/// Compute node offered by a provider. Prices are per second, in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderNode {
    pub identity: NodeIdentity,
    pub cpu_price: BigInt,
    pub cpu_model: String,
    pub gpu_price: BigInt,
    pub gpu_model: String,
    pub mem_price: BigInt,
    pub mem_capacity: u64,
    pub disk_price: BigInt,
    pub disk_capacity: u64,
}

impl ProviderNode {
    pub fn price_per_second(&self) -> BigInt {
        &self.cpu_price + &self.gpu_price + &self.mem_price + &self.disk_price
    }
}

/// A rental of one provider node. `order_id` names the rented node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub provider_address: Address,
    pub order_id: u64,
    pub activate_time: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub probation_seconds: i64,
    pub duration_seconds: i64,
    pub position: EventPosition,
}

impl Order {
    /// Returns `None` when the computed start or end does not fit in an i64.
    pub fn new(
        provider_address: Address,
        order_id: u64,
        activate_time: i64,
        probation_seconds: i64,
        duration_seconds: i64,
        position: EventPosition,
    ) -> Option<Self> {
        let start_time = activate_time.checked_add(probation_seconds)?;
        let end_time = start_time.checked_add(duration_seconds)?;
        Some(Self {
            provider_address,
            order_id,
            activate_time,
            start_time,
            end_time,
            probation_seconds,
            duration_seconds,
            position,
        })
    }

    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity::new(self.provider_address, self.order_id)
    }

    pub fn is_active(&self, now: i64) -> bool {
        self.start_time < now && now < self.end_time
    }

    /// Total price of the order on `node`: per-second price times duration.
    pub fn price_on(&self, node: &ProviderNode) -> BigInt {
        node.price_per_second() * BigInt::from(self.duration_seconds)
    }
}

/// Result of settling one challenge outcome against a ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub reward: BigInt,
    pub remaining: BigInt,
    pub penalty: BigInt,
}

/// Running profit/balance/penalty account of one provider address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitLedgerRow {
    pub provider_address: Address,
    pub balance: BigInt,
    pub profit: BigInt,
    pub penalty: BigInt,
    pub last_time: i64,
    pub end_time: i64,
    /// Withdrawal counter, signed into withdrawal authorizations.
    pub nonce: u64,
    /// Last chain event applied to this row.
    pub applied_through: Option<EventPosition>,
}

impl ProfitLedgerRow {
    pub fn opened(provider_address: Address, now: i64) -> Self {
        Self {
            provider_address,
            balance: BigInt::zero(),
            profit: BigInt::zero(),
            penalty: BigInt::zero(),
            last_time: now,
            end_time: now,
            nonce: 0,
            applied_through: None,
        }
    }

    /// Share of `profit` earned between `last_time` and `cycle_anchor`.
    pub fn reward_at(&self, cycle_anchor: i64) -> BigInt {
        if cycle_anchor <= self.last_time {
            return BigInt::zero();
        }
        if cycle_anchor >= self.end_time {
            return self.profit.clone();
        }
        if self.last_time >= self.end_time {
            return BigInt::zero();
        }

        let elapsed = BigInt::from(cycle_anchor) - BigInt::from(self.last_time);
        let window = BigInt::from(self.end_time) - BigInt::from(self.last_time);
        (&self.profit * elapsed).div_floor(&window)
    }

    /// Applies one cycle outcome: pays out the earned reward and, on failure,
    /// burns one percent of what is left.
    pub fn settle(&mut self, cycle_anchor: i64, success: bool) -> Settlement {
        let reward = self.reward_at(cycle_anchor);
        let remaining = &self.profit - &reward;
        let penalty = if success {
            BigInt::zero()
        } else {
            remaining.div_floor(&BigInt::from(100))
        };

        self.last_time = cycle_anchor;
        self.balance += &reward;
        self.profit = &remaining - &penalty;
        self.penalty += &penalty;

        Settlement {
            reward,
            remaining,
            penalty,
        }
    }

    /// Adds an order's price to `profit` and extends `end_time` to the order end.
    ///
    /// Returns false without touching the row when `position` was already applied.
    pub fn accrue_order(&mut self, position: EventPosition, price: &BigInt, order_end: i64) -> bool {
        if !self.claim(position) {
            return false;
        }
        self.profit += price;
        if order_end > self.end_time {
            self.end_time = order_end;
        }
        true
    }

    /// Debits `balance` and bumps the withdrawal nonce.
    ///
    /// Returns false without touching the row when `position` was already applied.
    pub fn apply_withdrawal(&mut self, position: EventPosition, amount: &BigInt) -> bool {
        if !self.claim(position) {
            return false;
        }
        self.balance -= amount;
        self.nonce += 1;
        true
    }

    fn claim(&mut self, position: EventPosition) -> bool {
        if self
            .applied_through
            .is_some_and(|applied| position <= applied)
        {
            return false;
        }
        self.applied_through = Some(position);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(profit: i64, last_time: i64, end_time: i64) -> ProfitLedgerRow {
        ProfitLedgerRow {
            profit: BigInt::from(profit),
            last_time,
            end_time,
            ..ProfitLedgerRow::opened(Address::repeat_byte(0xab), 0)
        }
    }

    #[test]
    fn reward_is_pro_rated_and_floored() {
        let row = row(1000, 100, 400);
        // 1000 * 100 / 300 = 333.33
        assert_eq!(row.reward_at(200), BigInt::from(333));
    }

    #[test]
    fn reward_is_zero_before_last_time() {
        assert_eq!(row(1000, 100, 400).reward_at(100), BigInt::zero());
        assert_eq!(row(1000, 100, 400).reward_at(50), BigInt::zero());
    }

    #[test]
    fn settlement_at_end_time_pays_everything_without_penalty() {
        for success in [true, false] {
            let mut row = row(500, 100, 400);
            let settlement = row.settle(400, success);

            assert_eq!(settlement.reward, BigInt::from(500));
            assert_eq!(settlement.remaining, BigInt::zero());
            assert_eq!(settlement.penalty, BigInt::zero());
            assert_eq!(row.balance, BigInt::from(500));
            assert_eq!(row.profit, BigInt::zero());
            assert_eq!(row.last_time, 400);
        }
    }

    #[test]
    fn failed_outcome_burns_one_percent_of_remaining() {
        // Anchor at last_time: no reward, remaining is the whole profit.
        let mut row = row(250, 100, 400);
        let settlement = row.settle(100, false);

        assert_eq!(settlement.remaining, BigInt::from(250));
        assert_eq!(settlement.penalty, BigInt::from(2));
        assert_eq!(row.profit, BigInt::from(248));
        assert_eq!(row.penalty, BigInt::from(2));
        assert_eq!(row.balance, BigInt::zero());
    }

    #[test]
    fn settling_twice_at_same_anchor_does_not_double_credit() {
        let mut row = row(900, 0, 300);
        let first = row.settle(100, true);
        let snapshot = row.clone();
        let second = row.settle(100, true);

        assert_eq!(first.reward, BigInt::from(300));
        assert_eq!(second.reward, BigInt::zero());
        assert_eq!(row, snapshot);
    }

    #[test]
    fn order_accrual_extends_end_time_once() {
        let mut row = row(0, 0, 0);
        let position = EventPosition::new(10, 0);

        assert!(row.accrue_order(position, &BigInt::from(1000), 110));
        assert!(!row.accrue_order(position, &BigInt::from(1000), 110));

        assert_eq!(row.profit, BigInt::from(1000));
        assert_eq!(row.end_time, 110);
    }

    #[test]
    fn withdrawal_debits_balance_and_bumps_nonce() {
        let mut row = row(0, 0, 0);
        row.balance = BigInt::from(70);

        assert!(row.apply_withdrawal(EventPosition::new(5, 1), &BigInt::from(20)));
        assert!(!row.apply_withdrawal(EventPosition::new(5, 0), &BigInt::from(20)));

        assert_eq!(row.balance, BigInt::from(50));
        assert_eq!(row.nonce, 1);
    }

    #[test]
    fn order_times_and_activity_window() {
        let order = Order::new(Address::ZERO, 1, 100, 20, 10, EventPosition::new(1, 0)).unwrap();

        assert_eq!(order.start_time, 120);
        assert_eq!(order.end_time, 130);
        assert!(!order.is_active(120));
        assert!(order.is_active(125));
        assert!(!order.is_active(130));
    }

    #[test]
    fn order_rejects_overflowing_times() {
        assert!(Order::new(Address::ZERO, 1, i64::MAX, 1, 1, EventPosition::new(1, 0)).is_none());
    }
}
