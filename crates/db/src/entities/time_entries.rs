//! `SeaORM` Entity for time_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "time_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub entry_date: Date,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub regular_hours: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub regular_rate: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub overtime_hours: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub overtime_rate: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub double_time_hours: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub double_time_rate: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
