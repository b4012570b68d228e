use std::{sync::Arc, time::Instant};

use alloy::primitives::Address;
use grid_domain::{EventPosition, ProfitLedgerRow};
use sea_orm::{
    ActiveValue, DatabaseConnection, DbErr, EntityTrait, sea_query::OnConflict,
};

use crate::{
    error::{RepositoryError, Result},
    models::profits::{ActiveModel, Column, Entity, Model},
    observability::record_query_result,
    repositories::{address_from_db, address_to_db, amount_from_db, u64_from_db, u64_to_db},
};

#[derive(Clone)]
pub struct ProfitRepository {
    conn: Arc<DatabaseConnection>,
}

impl ProfitRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Inserts `row` unless the address already has one. Returns whether it was inserted.
    pub async fn create_if_absent(&self, row: &ProfitLedgerRow) -> Result<bool> {
        let started = Instant::now();
        let result: Result<bool> = async {
            let inserted = Entity::insert(Self::to_active_model(row)?)
                .on_conflict(OnConflict::column(Column::Address).do_nothing().to_owned())
                .exec_without_returning(self.conn.as_ref())
                .await?;
            Ok(inserted > 0)
        }
        .await;

        record_query_result("profits", "create_if_absent", started, &result, |inserted| {
            usize::from(*inserted)
        });
        result
    }

    pub async fn find(&self, address: &Address) -> Result<Option<ProfitLedgerRow>> {
        let started = Instant::now();
        let result = async {
            Entity::find_by_id(address_to_db(address))
                .one(self.conn.as_ref())
                .await?
                .map(Self::to_row)
                .transpose()
        }
        .await;

        record_query_result("profits", "find", started, &result, |row| {
            usize::from(row.is_some())
        });
        result
    }

    /// Overwrites the stored row. Fails with `NotFound` when the address has no row.
    pub async fn update(&self, row: &ProfitLedgerRow) -> Result<()> {
        let started = Instant::now();
        let result: Result<()> = async {
            match Entity::update(Self::to_active_model(row)?)
                .exec(self.conn.as_ref())
                .await
            {
                Ok(_) => Ok(()),
                Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound(format!(
                    "profit row for {}",
                    row.provider_address
                ))),
                Err(err) => Err(err.into()),
            }
        }
        .await;

        record_query_result("profits", "update", started, &result, |_| 1);
        result
    }

    fn to_active_model(row: &ProfitLedgerRow) -> Result<ActiveModel> {
        let (cursor_block, cursor_log_index) = match row.applied_through {
            Some(position) => (
                Some(u64_to_db("cursor_block", position.block_number)?),
                Some(u64_to_db("cursor_log_index", position.log_index)?),
            ),
            None => (None, None),
        };

        Ok(ActiveModel {
            address: ActiveValue::Set(address_to_db(&row.provider_address)),
            balance: ActiveValue::Set(row.balance.to_string()),
            profit: ActiveValue::Set(row.profit.to_string()),
            penalty: ActiveValue::Set(row.penalty.to_string()),
            last_time: ActiveValue::Set(row.last_time),
            end_time: ActiveValue::Set(row.end_time),
            nonce: ActiveValue::Set(u64_to_db("nonce", row.nonce)?),
            cursor_block: ActiveValue::Set(cursor_block),
            cursor_log_index: ActiveValue::Set(cursor_log_index),
        })
    }

    fn to_row(model: Model) -> Result<ProfitLedgerRow> {
        let applied_through = match (model.cursor_block, model.cursor_log_index) {
            (Some(block), Some(index)) => Some(EventPosition::new(
                u64_from_db("cursor_block", block)?,
                u64_from_db("cursor_log_index", index)?,
            )),
            _ => None,
        };

        Ok(ProfitLedgerRow {
            provider_address: address_from_db(&model.address)?,
            balance: amount_from_db("balance", &model.balance)?,
            profit: amount_from_db("profit", &model.profit)?,
            penalty: amount_from_db("penalty", &model.penalty)?,
            last_time: model.last_time,
            end_time: model.end_time,
            nonce: u64_from_db("nonce", model.nonce)?,
            applied_through,
        })
    }
}
