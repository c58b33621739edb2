use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gig lifecycle status, stored as a lowercase string in the database.
///
/// `Open` accepts bids; `Assigned` is terminal. The only path from `Open` to
/// `Assigned` is the hire transition, which also sets `hiring_bid_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GigStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "assigned")]
    Assigned,
}

/// SeaORM entity for the `gigs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gigs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub budget: f64,
    pub owner_id: Uuid,
    pub status: GigStatus,
    /// Set exactly once, by the hire transition, together with `status = assigned`.
    pub hiring_bid_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGig {
    pub title: String,
    pub description: String,
    pub budget: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GigListQuery {
    pub search: Option<String>,
}

/// Gig detail enriched with the number of bids it has received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GigWithBidCount {
    #[serde(flatten)]
    pub gig: Model,
    pub bid_count: u64,
}
