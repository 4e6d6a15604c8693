//! Catalog product entity, keyed by `(catalogo_id, ref)`

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalogo_produtos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub catalogo_id: i32,

    /// Part code, unique within its catalog. `ref` is a Rust keyword, hence
    /// the renamed field.
    #[sea_orm(primary_key, auto_increment = false, column_name = "ref")]
    #[serde(rename = "ref")]
    pub reference: String,

    pub pagina: i32,

    #[sea_orm(column_type = "Text")]
    pub nome: String,

    pub qtd_multiplo: i32,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub preco: Decimal,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::catalogo::Entity",
        from = "Column::CatalogoId",
        to = "super::catalogo::Column::Id",
        on_delete = "Cascade"
    )]
    Catalogo,
}

impl Related<super::catalogo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Catalogo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for catalogo_core::types::Product {
    fn from(m: Model) -> Self {
        Self {
            pagina: m.pagina,
            nome: m.nome,
            r#ref: m.reference,
            qtd_multiplo: m.qtd_multiplo,
            preco: m.preco,
        }
    }
}
