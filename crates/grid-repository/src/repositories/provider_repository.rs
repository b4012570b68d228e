use std::{sync::Arc, time::Instant};

use grid_domain::Provider;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, sea_query::OnConflict};

use crate::{
    error::Result,
    models::providers::{ActiveModel, Column, Entity},
    observability::record_query_result,
    repositories::address_to_db,
};

#[derive(Clone)]
pub struct ProviderRepository {
    conn: Arc<DatabaseConnection>,
}

impl ProviderRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Inserts the provider or overwrites its contact details.
    pub async fn upsert(&self, provider: &Provider) -> Result<()> {
        let started = Instant::now();
        let model = ActiveModel {
            address: ActiveValue::Set(address_to_db(&provider.address)),
            name: ActiveValue::Set(provider.name.clone()),
            ip: ActiveValue::Set(provider.ip.clone()),
            domain: ActiveValue::Set(provider.domain.clone()),
            port: ActiveValue::Set(provider.port.clone()),
        };

        let result: Result<()> = Entity::insert(model)
            .on_conflict(
                OnConflict::column(Column::Address)
                    .update_columns([Column::Name, Column::Ip, Column::Domain, Column::Port])
                    .to_owned(),
            )
            .exec_without_returning(self.conn.as_ref())
            .await
            .map(|_| ())
            .map_err(Into::into);

        record_query_result("providers", "upsert", started, &result, |_| 1);
        result
    }
}
