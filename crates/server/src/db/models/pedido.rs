//! Order entity (`pedido`)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pedidos")]
pub struct Model {
    /// Opaque order token, shareable as a "resume my order" link.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub catalogo_id: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub cliente_nome: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub cliente_contato: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub observacao: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub status: String,

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

    #[sea_orm(has_many = "super::pedido_item::Entity")]
    Itens,
}

impl Related<super::catalogo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Catalogo.def()
    }
}

impl Related<super::pedido_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Itens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for catalogo_core::types::Order {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            catalogo_id: m.catalogo_id,
            cliente_nome: m.cliente_nome,
            cliente_contato: m.cliente_contato,
            observacao: m.observacao,
            status: m.status,
            created_at: m.created_at.with_timezone(&chrono::Utc),
            updated_at: m.updated_at.with_timezone(&chrono::Utc),
        }
    }
}
