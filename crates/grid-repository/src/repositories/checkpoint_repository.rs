use std::{sync::Arc, time::Instant};

use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, sea_query::OnConflict};

use crate::{
    error::Result,
    models::ingestion_checkpoint::{ActiveModel, CHECKPOINT_ROW_ID, Column, Entity},
    observability::record_query_result,
    repositories::{u64_from_db, u64_to_db},
};

#[derive(Clone)]
pub struct CheckpointRepository {
    conn: Arc<DatabaseConnection>,
}

impl CheckpointRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Next block to scan; 0 before the first persisted batch.
    pub async fn get(&self) -> Result<u64> {
        let started = Instant::now();
        let result = async {
            match Entity::find_by_id(CHECKPOINT_ROW_ID)
                .one(self.conn.as_ref())
                .await?
            {
                Some(model) => u64_from_db("next_block", model.next_block),
                None => Ok(0),
            }
        }
        .await;

        record_query_result("ingestion_checkpoint", "get", started, &result, |_| 1);
        result
    }

    pub async fn set(&self, next_block: u64) -> Result<()> {
        let started = Instant::now();
        let result: Result<()> = async {
            let model = ActiveModel {
                id: ActiveValue::Set(CHECKPOINT_ROW_ID),
                next_block: ActiveValue::Set(u64_to_db("next_block", next_block)?),
            };
            Entity::insert(model)
                .on_conflict(
                    OnConflict::column(Column::Id)
                        .update_column(Column::NextBlock)
                        .to_owned(),
                )
                .exec_without_returning(self.conn.as_ref())
                .await?;
            Ok(())
        }
        .await;

        record_query_result("ingestion_checkpoint", "set", started, &result, |_| 1);
        result
    }
}
