use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(ProductId);

/// A catalog record as the service stores it. Wire field names follow the
/// service contract; `id` is server-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "imagem", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Case-insensitive substring match against name and description.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_field_names() {
        let product: Product = serde_json::from_str(
            r#"{"id":3,"nome":"Caneca","preco":24.9,"descricao":"Ceramica branca","imagem":"http://img.example/caneca.png"}"#,
        )
        .expect("decode");
        assert_eq!(product.id, ProductId(3));
        assert_eq!(product.name, "Caneca");
        assert_eq!(product.price, 24.9);
        assert_eq!(product.image.as_deref(), Some("http://img.example/caneca.png"));
    }

    #[test]
    fn missing_image_decodes_as_none() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"nome":"Cabo USB","preco":9.5,"descricao":"2m"}"#,
        )
        .expect("decode");
        assert!(product.image.is_none());
    }

    #[test]
    fn encodes_with_service_field_names() {
        let product = Product {
            id: ProductId(7),
            name: "Teclado".to_string(),
            price: 120.0,
            description: "ABNT2".to_string(),
            image: None,
        };
        let json = serde_json::to_value(&product).expect("encode");
        assert_eq!(json["nome"], "Teclado");
        assert_eq!(json["preco"], 120.0);
        assert_eq!(json["descricao"], "ABNT2");
        assert!(json.get("imagem").is_none());
    }
}
