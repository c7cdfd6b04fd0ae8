use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{BmiRecord, NewBmiRecord};

/// Sea-ORM Entity for the bmi_records table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bmi_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Double")]
    pub height: f64,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    #[sea_orm(column_type = "Double")]
    pub value: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BmiRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            height: model.height,
            weight: model.weight,
            value: model.value,
            category: None,
            risk: None,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewBmiRecord> for ActiveModel {
    fn from(input: NewBmiRecord) -> Self {
        ActiveModel {
            id: NotSet,
            height: Set(input.measurement.height),
            weight: Set(input.measurement.weight),
            value: Set(input.measurement.value),
            created_at: Set(input.created_at.into()),
        }
    }
}
