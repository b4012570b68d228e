use std::{sync::Arc, time::Instant};

use grid_domain::{EventPosition, Order};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};

use crate::{
    error::Result,
    models::orders::{ActiveModel, Column, Entity, Model},
    observability::record_query_result,
    repositories::{address_from_db, address_to_db, u64_from_db, u64_to_db},
};

#[derive(Clone)]
pub struct OrderRepository {
    conn: Arc<DatabaseConnection>,
}

impl OrderRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Stores the order under its event position. Returns false when an order
    /// for that position already exists.
    pub async fn insert_if_absent(&self, order: &Order) -> Result<bool> {
        let started = Instant::now();
        let result: Result<bool> = async {
            let model = ActiveModel {
                block_number: ActiveValue::Set(u64_to_db(
                    "block_number",
                    order.position.block_number,
                )?),
                log_index: ActiveValue::Set(u64_to_db("log_index", order.position.log_index)?),
                provider_address: ActiveValue::Set(address_to_db(&order.provider_address)),
                order_id: ActiveValue::Set(u64_to_db("order_id", order.order_id)?),
                activate_time: ActiveValue::Set(order.activate_time),
                start_time: ActiveValue::Set(order.start_time),
                end_time: ActiveValue::Set(order.end_time),
                probation_seconds: ActiveValue::Set(order.probation_seconds),
                duration_seconds: ActiveValue::Set(order.duration_seconds),
            };

            let inserted = Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::BlockNumber, Column::LogIndex])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(self.conn.as_ref())
                .await?;
            Ok(inserted > 0)
        }
        .await;

        record_query_result("orders", "insert_if_absent", started, &result, |inserted| {
            usize::from(*inserted)
        });
        result
    }

    /// Orders with `start_time < now < end_time`, in event order.
    pub async fn find_active(&self, now: i64) -> Result<Vec<Order>> {
        let started = Instant::now();
        let result = async {
            Entity::find()
                .filter(Column::StartTime.lt(now))
                .filter(Column::EndTime.gt(now))
                .order_by_asc(Column::BlockNumber)
                .order_by_asc(Column::LogIndex)
                .all(self.conn.as_ref())
                .await?
                .into_iter()
                .map(Self::to_order)
                .collect::<Result<Vec<_>>>()
        }
        .await;

        record_query_result("orders", "find_active", started, &result, Vec::len);
        result
    }

    fn to_order(model: Model) -> Result<Order> {
        Ok(Order {
            provider_address: address_from_db(&model.provider_address)?,
            order_id: u64_from_db("order_id", model.order_id)?,
            activate_time: model.activate_time,
            start_time: model.start_time,
            end_time: model.end_time,
            probation_seconds: model.probation_seconds,
            duration_seconds: model.duration_seconds,
            position: EventPosition::new(
                u64_from_db("block_number", model.block_number)?,
                u64_from_db("log_index", model.log_index)?,
            ),
        })
    }
}
