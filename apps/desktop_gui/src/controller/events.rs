//! UI/backend events and failure wording for the desktop controller.

use catalog_client::CatalogOp;
use shared::domain::{Product, ProductId};

use crate::ui::app::PreviewImage;

pub enum UiEvent {
    BackendStartupFailed(String),
    ProductsLoaded(Vec<Product>),
    LoadFailed(String),
    ProductDeleted(ProductId),
    ProductSaved(Product),
    ProductCreated(Product),
    MutationFailed {
        op: CatalogOp,
        message: String,
    },
    ImagePreviewLoaded {
        product_id: ProductId,
        image: PreviewImage,
    },
    ImagePreviewFailed {
        product_id: ProductId,
        reason: String,
    },
}

pub fn op_label(op: CatalogOp) -> &'static str {
    match op {
        CatalogOp::Load => "Load",
        CatalogOp::Delete => "Delete",
        CatalogOp::Save => "Save",
        CatalogOp::Create => "Create",
    }
}

/// Reword the common transport failures into something actionable; anything
/// unrecognized passes through unchanged.
pub fn classify_transport_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
        || lower.contains("error sending request")
    {
        "Catalog service unreachable; check the server URL and that the service is running."
            .to_string()
    } else {
        message.to_string()
    }
}
