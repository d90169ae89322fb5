//! Backend commands queued from UI to backend worker.

use shared::{
    domain::{Product, ProductId},
    protocol::CreateProductRequest,
};

pub enum BackendCommand {
    LoadProducts,
    DeleteProduct {
        id: ProductId,
    },
    SaveProduct {
        product: Product,
    },
    CreateProduct {
        request: CreateProductRequest,
    },
    FetchImagePreview {
        product_id: ProductId,
        url: String,
    },
}
