use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity,
    error::BmiResult,
    models::{BmiRecord, Measurement, NewBmiRecord},
    repository::BmiRepository,
};

pub struct PgBmiRepository {
    db: DatabaseConnection,
}

impl PgBmiRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BmiRepository for PgBmiRepository {
    async fn insert(&self, input: NewBmiRecord) -> BmiResult<i64> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(bmi_id = model.id, value = model.value, "Stored BMI record");
        Ok(model.id)
    }

    async fn get_by_id(&self, id: i64) -> BmiResult<Option<BmiRecord>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> BmiResult<Vec<BmiRecord>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, measurement: Measurement) -> BmiResult<u64> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Height, Expr::value(measurement.height))
            .col_expr(entity::Column::Weight, Expr::value(measurement.weight))
            .col_expr(entity::Column::Value, Expr::value(measurement.value))
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(bmi_id = id, value = measurement.value, "Updated BMI record");
        }
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i64) -> BmiResult<u64> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(bmi_id = id, "Deleted BMI record");
        }
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BmiError;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn model(id: i64, height: f64, weight: f64) -> entity::Model {
        entity::Model {
            id,
            height,
            weight,
            value: weight / (height * height),
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap().into(),
        }
    }

    #[tokio::test]
    async fn test_insert_returns_generated_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model(5, 1.70, 70.0)]])
            .into_connection();
        let repo = PgBmiRepository::new(db);

        let id = repo
            .insert(NewBmiRecord::now(Measurement::new(1.70, 70.0)))
            .await
            .unwrap();
        assert_eq!(id, 5);
    }

    #[tokio::test]
    async fn test_get_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, 1.70, 70.0)], vec![]])
            .into_connection();
        let repo = PgBmiRepository::new(db);

        let record = repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.height, 1.70);
        assert_eq!(record.weight, 70.0);
        assert_eq!(record.created_at, Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        assert!(record.category.is_none());

        assert!(repo.get_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_store_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model(1, 1.70, 70.0), model(2, 1.80, 60.0)]])
            .into_connection();
        let repo = PgBmiRepository::new(db);

        let records = repo.list().await.unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_update_and_delete_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgBmiRepository::new(db);

        assert_eq!(repo.update(1, Measurement::new(1.75, 72.0)).await.unwrap(), 1);
        assert_eq!(repo.delete(9).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_db_error_maps_to_storage() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgBmiRepository::new(db);

        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, BmiError::Storage(msg) if msg.contains("connection reset")));
    }
}
