//! Catalog entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalogos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub nome: String,

    pub ano: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub pdf_url: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub empresa_nome: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub whatsapp_phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub politica: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::produto::Entity")]
    Produtos,

    #[sea_orm(has_many = "super::pedido::Entity")]
    Pedidos,
}

impl Related<super::produto::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Produtos.def()
    }
}

impl Related<super::pedido::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pedidos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for catalogo_core::types::Catalog {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            ano: m.ano,
            pdf_url: m.pdf_url,
            empresa_nome: m.empresa_nome,
            whatsapp_phone: m.whatsapp_phone,
            politica: m.politica,
            created_at: m.created_at.with_timezone(&chrono::Utc),
        }
    }
}
