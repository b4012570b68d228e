use std::{sync::Arc, time::Instant};

use grid_domain::{NodeIdentity, ProviderNode};
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, sea_query::OnConflict};

use crate::{
    error::Result,
    models::provider_nodes::{ActiveModel, Column, Entity, Model},
    observability::record_query_result,
    repositories::{address_from_db, address_to_db, amount_from_db, u64_from_db, u64_to_db},
};

#[derive(Clone)]
pub struct NodeRepository {
    conn: Arc<DatabaseConnection>,
}

impl NodeRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Inserts the node keyed by address and node id, overwriting a previous row.
    pub async fn upsert(&self, node: &ProviderNode) -> Result<()> {
        let started = Instant::now();
        let result: Result<()> = async {
            let model = ActiveModel {
                address: ActiveValue::Set(address_to_db(&node.identity.provider_address)),
                node_id: ActiveValue::Set(u64_to_db("node_id", node.identity.node_id)?),
                cpu_price: ActiveValue::Set(node.cpu_price.to_string()),
                cpu_model: ActiveValue::Set(node.cpu_model.clone()),
                gpu_price: ActiveValue::Set(node.gpu_price.to_string()),
                gpu_model: ActiveValue::Set(node.gpu_model.clone()),
                mem_price: ActiveValue::Set(node.mem_price.to_string()),
                mem_capacity: ActiveValue::Set(u64_to_db("mem_capacity", node.mem_capacity)?),
                disk_price: ActiveValue::Set(node.disk_price.to_string()),
                disk_capacity: ActiveValue::Set(u64_to_db("disk_capacity", node.disk_capacity)?),
            };

            Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::Address, Column::NodeId])
                        .update_columns([
                            Column::CpuPrice,
                            Column::CpuModel,
                            Column::GpuPrice,
                            Column::GpuModel,
                            Column::MemPrice,
                            Column::MemCapacity,
                            Column::DiskPrice,
                            Column::DiskCapacity,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(self.conn.as_ref())
                .await?;
            Ok(())
        }
        .await;

        record_query_result("provider_nodes", "upsert", started, &result, |_| 1);
        result
    }

    pub async fn find(&self, identity: NodeIdentity) -> Result<Option<ProviderNode>> {
        let started = Instant::now();
        let result = async {
            let key = (
                address_to_db(&identity.provider_address),
                u64_to_db("node_id", identity.node_id)?,
            );
            Entity::find_by_id(key)
                .one(self.conn.as_ref())
                .await?
                .map(Self::to_node)
                .transpose()
        }
        .await;

        record_query_result("provider_nodes", "find", started, &result, |row| {
            usize::from(row.is_some())
        });
        result
    }

    fn to_node(model: Model) -> Result<ProviderNode> {
        Ok(ProviderNode {
            identity: NodeIdentity::new(
                address_from_db(&model.address)?,
                u64_from_db("node_id", model.node_id)?,
            ),
            cpu_price: amount_from_db("cpu_price", &model.cpu_price)?,
            cpu_model: model.cpu_model,
            gpu_price: amount_from_db("gpu_price", &model.gpu_price)?,
            gpu_model: model.gpu_model,
            mem_price: amount_from_db("mem_price", &model.mem_price)?,
            mem_capacity: u64_from_db("mem_capacity", model.mem_capacity)?,
            disk_price: amount_from_db("disk_price", &model.disk_price)?,
            disk_capacity: u64_from_db("disk_capacity", model.disk_capacity)?,
        })
    }
}
