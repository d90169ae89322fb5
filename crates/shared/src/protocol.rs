use serde::{Deserialize, Serialize};

/// Body for `POST /produtos`. The id is assigned by the service, so the
/// creation payload carries every field except it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "imagem", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
