use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub serial_number: String,
    pub passport_id: i64,
    pub purchase_date: Date,
    pub owner_id: Option<Uuid>,
    pub comment: Option<String>,
    pub warranty_expiration_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::passport::Entity",
        from = "Column::PassportId",
        to = "super::passport::Column::Id",
        on_delete = "Restrict"
    )]
    Passport,
    #[sea_orm(has_many = "super::renovation::Entity")]
    Renovations,
}

impl Related<super::passport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passport.def()
    }
}

impl Related<super::renovation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renovations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
