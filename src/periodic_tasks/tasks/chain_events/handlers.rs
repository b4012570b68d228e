//! Ledger effects of the four ingested events.
//!
//! Every handler is safe to run twice for the same log: providers and nodes are
//! upserted, orders are keyed by event position and profit-row mutations are
//! guarded by the row's last applied position.

use grid_blockchain::{Market, Registry, U256};
use grid_domain::{
    EventPosition, NodeIdentity, Order, ProfitLedgerRow, Provider, ProviderNode, amount_from_u256,
};
use grid_repository::RepositoryError;

use crate::ledger::ProfitLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum HandlerOutcome {
    Applied,
    /// The event position was already applied to the ledger row.
    Duplicate,
    Skipped(&'static str),
}

impl HandlerOutcome {
    pub(super) fn label(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Duplicate => "duplicate",
            Self::Skipped(reason) => reason,
        }
    }
}

pub(super) async fn handle_register(
    ledger: &ProfitLedger,
    event: Registry::Register,
    now: i64,
) -> Result<HandlerOutcome, RepositoryError> {
    let provider = Provider {
        address: event.cp,
        name: event.name,
        ip: event.ip,
        domain: event.domain,
        port: event.port,
    };
    ledger.store().upsert_provider(&provider).await?;

    let created = ledger
        .store()
        .create_profit_if_absent(&ProfitLedgerRow::opened(provider.address, now))
        .await?;
    tracing::info!(
        address = %provider.address,
        name = %provider.name,
        profit_row_created = created,
        "Provider registered"
    );
    Ok(HandlerOutcome::Applied)
}

pub(super) async fn handle_add_node(
    ledger: &ProfitLedger,
    event: Registry::AddNode,
) -> Result<HandlerOutcome, RepositoryError> {
    let node = ProviderNode {
        identity: NodeIdentity::new(event.cp, event.id),
        cpu_price: amount_from_u256(event.cpu.priceSec),
        cpu_model: event.cpu.model,
        gpu_price: amount_from_u256(event.gpu.priceSec),
        gpu_model: event.gpu.model,
        mem_price: amount_from_u256(event.mem.priceSec),
        mem_capacity: event.mem.num,
        disk_price: amount_from_u256(event.disk.priceSec),
        disk_capacity: event.disk.num,
    };
    ledger.store().upsert_node(&node).await?;

    tracing::info!(
        identity = %node.identity,
        price_per_second = %node.price_per_second(),
        "Provider node added"
    );
    Ok(HandlerOutcome::Applied)
}

pub(super) async fn handle_create_order(
    ledger: &ProfitLedger,
    event: Market::CreateOrder,
    position: EventPosition,
) -> Result<HandlerOutcome, RepositoryError> {
    let Some(order) = order_from_event(&event, position) else {
        tracing::warn!(
            address = %event.cp,
            node_id = event.id,
            active_time = %event.activeTime,
            probation = %event.probation,
            duration = %event.duration,
            position = %position,
            "Order times out of range, skipping"
        );
        return Ok(HandlerOutcome::Skipped("out_of_range"));
    };

    let inserted = ledger.store().insert_order_if_absent(&order).await?;
    if !inserted {
        tracing::debug!(position = %position, "Order already stored");
    }

    let Some(node) = ledger.store().node(order.identity()).await? else {
        tracing::warn!(
            identity = %order.identity(),
            position = %position,
            "Order references an unknown node, skipping accrual"
        );
        return Ok(HandlerOutcome::Skipped("unknown_node"));
    };

    let price = order.price_on(&node);
    let accrued = ledger
        .update_profit(order.provider_address, |row| {
            row.accrue_order(position, &price, order.end_time)
        })
        .await;

    match accrued {
        Ok(true) => {
            tracing::info!(
                identity = %order.identity(),
                price = %price,
                end_time = order.end_time,
                "Order accrued"
            );
            Ok(HandlerOutcome::Applied)
        }
        Ok(false) => Ok(HandlerOutcome::Duplicate),
        Err(RepositoryError::NotFound(_)) => {
            tracing::warn!(
                address = %order.provider_address,
                position = %position,
                "Order for a provider without a profit row, skipping accrual"
            );
            Ok(HandlerOutcome::Skipped("missing_profit_row"))
        }
        Err(error) => Err(error),
    }
}

pub(super) async fn handle_withdraw(
    ledger: &ProfitLedger,
    event: Market::Withdraw,
    position: EventPosition,
) -> Result<HandlerOutcome, RepositoryError> {
    let amount = amount_from_u256(event.amount);
    let applied = ledger
        .update_profit(event.cp, |row| row.apply_withdrawal(position, &amount))
        .await;

    match applied {
        Ok(true) => {
            tracing::info!(address = %event.cp, amount = %amount, "Withdrawal applied");
            Ok(HandlerOutcome::Applied)
        }
        Ok(false) => Ok(HandlerOutcome::Duplicate),
        Err(RepositoryError::NotFound(_)) => {
            tracing::warn!(
                address = %event.cp,
                position = %position,
                "Withdrawal for a provider without a profit row, skipping"
            );
            Ok(HandlerOutcome::Skipped("missing_profit_row"))
        }
        Err(error) => Err(error),
    }
}

fn order_from_event(event: &Market::CreateOrder, position: EventPosition) -> Option<Order> {
    Order::new(
        event.cp,
        event.id,
        to_i64(event.activeTime)?,
        to_i64(event.probation)?,
        to_i64(event.duration)?,
        position,
    )
}

fn to_i64(value: U256) -> Option<i64> {
    i64::try_from(value).ok()
}
