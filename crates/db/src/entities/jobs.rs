//! `SeaORM` Entity for jobs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub job_number: String,
    pub status: String,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::job_labor_costs::Entity")]
    JobLaborCosts,
    #[sea_orm(has_many = "super::job_material_costs::Entity")]
    JobMaterialCosts,
    #[sea_orm(has_many = "super::job_equipment_costs::Entity")]
    JobEquipmentCosts,
}

impl Related<super::job_labor_costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobLaborCosts.def()
    }
}

impl Related<super::job_material_costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobMaterialCosts.def()
    }
}

impl Related<super::job_equipment_costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobEquipmentCosts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
