//! In-memory mirror of the remote record set and its edit lifecycle.

use shared::domain::{Product, ProductId};

/// Which remote operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOp {
    Load,
    Delete,
    Save,
    Create,
}

/// A surfaced failure from a delete/save/create call. Kept separate from
/// [`CatalogPhase`] so a failed mutation never blanks out the loaded grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    pub op: CatalogOp,
    pub message: String,
}

/// Explicit view phase. The edit draft lives inside `Editing`, which makes
/// contradictory combinations (loading while editing, two drafts) unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPhase {
    Loading,
    Ready,
    LoadFailed { message: String },
    Editing { draft: ProductDraft },
}

/// Owned, mutable copy of exactly one record under edit. Forked from the
/// mirror on enter-edit and merged back only through a confirmed save, so
/// in-progress edits cannot corrupt the displayed list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

impl ProductDraft {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            image: product.image.clone().unwrap_or_default(),
        }
    }

    /// Wire payload for `PUT /produtos/{id}`. Price is clamped to keep the
    /// non-negative invariant at the draft boundary; a blank image field
    /// means "no image reference".
    pub fn to_product(&self) -> Product {
        let image = self.image.trim();
        Product {
            id: self.id,
            name: self.name.clone(),
            price: self.price.max(0.0),
            description: self.description.clone(),
            image: (!image.is_empty()).then(|| image.to_string()),
        }
    }
}

/// The view's authoritative in-memory copy of the remote record set, plus
/// the derived filter query, phase, and last mutation error.
///
/// All methods are pure and synchronous; network results are fed in by the
/// caller via the `finish_*`/`apply_*` transitions.
#[derive(Debug)]
pub struct CatalogState {
    products: Vec<Product>,
    query: String,
    phase: CatalogPhase,
    mutation_error: Option<OperationError>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            query: String::new(),
            phase: CatalogPhase::Loading,
            mutation_error: None,
        }
    }

    pub fn phase(&self) -> &CatalogPhase {
        &self.phase
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut String {
        &mut self.query
    }

    pub fn mutation_error(&self) -> Option<&OperationError> {
        self.mutation_error.as_ref()
    }

    /// The filtered projection: case-insensitive substring match against
    /// name and description. An empty (trimmed) query shows everything.
    pub fn visible_products(&self) -> Vec<&Product> {
        let query = self.query.trim();
        if query.is_empty() {
            self.products.iter().collect()
        } else {
            self.products
                .iter()
                .filter(|product| product.matches_query(query))
                .collect()
        }
    }

    /// Outcome of the one startup fetch. Failure leaves the mirror empty;
    /// there is no automatic retry.
    pub fn finish_load(&mut self, result: Result<Vec<Product>, String>) {
        match result {
            Ok(products) => {
                self.products = products;
                self.phase = CatalogPhase::Ready;
            }
            Err(message) => {
                self.products.clear();
                self.phase = CatalogPhase::LoadFailed { message };
            }
        }
    }

    /// Fork the matching record into an edit draft. Only possible from
    /// `Ready`; returns false if the id is unknown or the view is not ready.
    pub fn begin_edit(&mut self, id: ProductId) -> bool {
        if !matches!(self.phase, CatalogPhase::Ready) {
            return false;
        }
        let Some(product) = self.products.iter().find(|product| product.id == id) else {
            return false;
        };
        self.phase = CatalogPhase::Editing {
            draft: ProductDraft::from_product(product),
        };
        true
    }

    /// Discard the draft without touching the mirror.
    pub fn cancel_edit(&mut self) {
        if matches!(self.phase, CatalogPhase::Editing { .. }) {
            self.phase = CatalogPhase::Ready;
        }
    }

    pub fn draft(&self) -> Option<&ProductDraft> {
        match &self.phase {
            CatalogPhase::Editing { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        match &mut self.phase {
            CatalogPhase::Editing { draft } => Some(draft),
            _ => None,
        }
    }

    /// A confirmed server-side delete: drop exactly the matching record,
    /// leaving every other record in its original relative order.
    pub fn apply_delete(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|product| product.id != id);
        let removed = self.products.len() != before;
        if removed {
            self.mutation_error = None;
        }
        removed
    }

    /// A confirmed server-side update: replace the matching record with the
    /// server's returned representation (not the local draft). If the record
    /// was deleted while the save was in flight the response is dropped;
    /// the later operation wins.
    pub fn apply_save(&mut self, updated: Product) {
        let editing_this = matches!(&self.phase, CatalogPhase::Editing { draft } if draft.id == updated.id);
        if let Some(existing) = self
            .products
            .iter_mut()
            .find(|product| product.id == updated.id)
        {
            *existing = updated;
        }
        if editing_this {
            self.phase = CatalogPhase::Ready;
        }
        self.mutation_error = None;
    }

    /// A confirmed server-side create: the new record joins the end of the
    /// mirror so the grid stays current without a re-fetch.
    pub fn apply_create(&mut self, created: Product) {
        if self
            .products
            .iter()
            .any(|product| product.id == created.id)
        {
            return;
        }
        self.products.push(created);
        self.mutation_error = None;
    }

    /// A failed delete/save/create. Prior state stays intact: the mirror is
    /// untouched and an in-flight draft survives for retry or cancel.
    pub fn record_mutation_failure(&mut self, op: CatalogOp, message: impl Into<String>) {
        self.mutation_error = Some(OperationError {
            op,
            message: message.into(),
        });
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}
