use shared::domain::{Product, ProductId};

use crate::state::{CatalogOp, CatalogPhase, CatalogState};

fn product(id: i64, name: &str, price: f64, description: &str) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        price,
        description: description.to_string(),
        image: None,
    }
}

fn ready_state(products: Vec<Product>) -> CatalogState {
    let mut state = CatalogState::new();
    state.finish_load(Ok(products));
    state
}

#[test]
fn starts_loading_and_empty() {
    let state = CatalogState::new();
    assert_eq!(state.phase(), &CatalogPhase::Loading);
    assert!(state.products().is_empty());
    assert!(state.mutation_error().is_none());
}

#[test]
fn load_failure_keeps_sequence_empty() {
    let mut state = CatalogState::new();
    state.finish_load(Err("connection refused".to_string()));
    assert!(state.products().is_empty());
    assert_eq!(
        state.phase(),
        &CatalogPhase::LoadFailed {
            message: "connection refused".to_string()
        }
    );
}

#[test]
fn empty_query_shows_full_sequence() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    *state.query_mut() = "   ".to_string();
    assert_eq!(state.visible_products().len(), 2);
}

#[test]
fn filter_matches_name_case_insensitively() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    *state.query_mut() = "a".to_string();
    let visible = state.visible_products();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, ProductId(1));
}

#[test]
fn filter_matches_description_too() {
    let mut state = ready_state(vec![
        product(1, "Mouse", 49.9, "wireless, USB receiver"),
        product(2, "Keyboard", 120.0, "mechanical"),
    ]);
    *state.query_mut() = "USB".to_string();
    let visible = state.visible_products();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, ProductId(1));
}

#[test]
fn filter_partitions_exactly_by_predicate() {
    let products = vec![
        product(1, "Cabo HDMI", 25.0, "2 metros"),
        product(2, "Cabo USB", 15.0, "1 metro"),
        product(3, "Mousepad", 30.0, "com cabo? nao"),
        product(4, "Monitor", 900.0, "27 polegadas"),
    ];
    let mut state = ready_state(products.clone());
    *state.query_mut() = "cabo".to_string();

    let visible: Vec<ProductId> = state.visible_products().iter().map(|p| p.id).collect();
    for p in &products {
        let should_match = p.matches_query("cabo");
        assert_eq!(
            visible.contains(&p.id),
            should_match,
            "product {} filtered incorrectly",
            p.id
        );
    }
    assert_eq!(visible, vec![ProductId(1), ProductId(2), ProductId(3)]);
}

#[test]
fn filtering_never_reorders() {
    let mut state = ready_state(vec![
        product(5, "abc", 1.0, ""),
        product(3, "zabc", 2.0, ""),
        product(9, "abcz", 3.0, ""),
    ]);
    *state.query_mut() = "abc".to_string();
    let visible: Vec<ProductId> = state.visible_products().iter().map(|p| p.id).collect();
    assert_eq!(visible, vec![ProductId(5), ProductId(3), ProductId(9)]);
}

#[test]
fn delete_removes_exactly_the_matching_record() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
        product(3, "C", 30.0, "z"),
    ]);
    assert!(state.apply_delete(ProductId(2)));
    let remaining: Vec<ProductId> = state.products().iter().map(|p| p.id).collect();
    assert_eq!(remaining, vec![ProductId(1), ProductId(3)]);
}

#[test]
fn delete_of_unknown_id_is_a_noop() {
    let mut state = ready_state(vec![product(1, "A", 10.0, "x")]);
    assert!(!state.apply_delete(ProductId(99)));
    assert_eq!(state.products().len(), 1);
}

#[test]
fn delete_failure_leaves_sequence_unchanged() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    let before = state.products().to_vec();
    state.record_mutation_failure(CatalogOp::Delete, "500 Internal Server Error");
    assert_eq!(state.products(), before.as_slice());
    assert_eq!(state.phase(), &CatalogPhase::Ready);
    assert_eq!(state.mutation_error().expect("error").op, CatalogOp::Delete);
}

#[test]
fn begin_edit_forks_a_draft_without_aliasing() {
    let mut state = ready_state(vec![product(1, "A", 10.0, "x")]);
    assert!(state.begin_edit(ProductId(1)));

    let draft = state.draft_mut().expect("draft");
    draft.name = "scratch".to_string();
    draft.price = 999.0;

    // The displayed list is untouched by in-progress edits.
    assert_eq!(state.products()[0].name, "A");
    assert_eq!(state.products()[0].price, 10.0);
}

#[test]
fn begin_edit_requires_ready_phase_and_known_id() {
    let mut state = CatalogState::new();
    assert!(!state.begin_edit(ProductId(1)));

    let mut state = ready_state(vec![product(1, "A", 10.0, "x")]);
    assert!(!state.begin_edit(ProductId(42)));
    assert_eq!(state.phase(), &CatalogPhase::Ready);
}

#[test]
fn cancel_restores_the_exact_prior_sequence() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    let before = state.products().to_vec();

    assert!(state.begin_edit(ProductId(2)));
    {
        let draft = state.draft_mut().expect("draft");
        draft.name = "B edited".to_string();
        draft.description = "changed".to_string();
        draft.price = 0.01;
        draft.image = "http://img.example/new.png".to_string();
    }
    state.cancel_edit();

    assert_eq!(state.products(), before.as_slice());
    assert_eq!(state.phase(), &CatalogPhase::Ready);
    assert!(state.draft().is_none());
}

#[test]
fn save_replaces_exactly_the_matching_record_with_server_value() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    assert!(state.begin_edit(ProductId(1)));
    state.draft_mut().expect("draft").name = "A2".to_string();

    // The server normalizes the payload; its representation wins.
    let server_value = product(1, "A2", 10.0, "x (revised)");
    state.apply_save(server_value.clone());

    assert_eq!(state.products()[0], server_value);
    assert_eq!(state.products()[1], product(2, "B", 20.0, "y"));
    assert!(state.draft().is_none());
    assert_eq!(state.phase(), &CatalogPhase::Ready);
}

#[test]
fn save_failure_preserves_draft_and_editing_phase() {
    let mut state = ready_state(vec![product(1, "A", 10.0, "x")]);
    assert!(state.begin_edit(ProductId(1)));
    state.draft_mut().expect("draft").name = "A2".to_string();

    state.record_mutation_failure(CatalogOp::Save, "error sending request");

    let draft = state.draft().expect("draft survives failure");
    assert_eq!(draft.name, "A2");
    assert!(matches!(state.phase(), CatalogPhase::Editing { .. }));
    assert_eq!(state.mutation_error().expect("error").op, CatalogOp::Save);
    assert_eq!(state.products()[0].name, "A");
}

#[test]
fn save_response_for_a_deleted_record_is_dropped() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    state.apply_delete(ProductId(1));
    state.apply_save(product(1, "A2", 10.0, "x"));

    let ids: Vec<ProductId> = state.products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId(2)]);
}

#[test]
fn successful_mutation_clears_prior_error() {
    let mut state = ready_state(vec![
        product(1, "A", 10.0, "x"),
        product(2, "B", 20.0, "y"),
    ]);
    state.record_mutation_failure(CatalogOp::Delete, "timed out");
    assert!(state.mutation_error().is_some());

    state.apply_delete(ProductId(2));
    assert!(state.mutation_error().is_none());
}

#[test]
fn create_appends_to_the_mirror() {
    let mut state = ready_state(vec![product(1, "A", 10.0, "x")]);
    state.apply_create(product(2, "B", 20.0, "y"));
    let ids: Vec<ProductId> = state.products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId(1), ProductId(2)]);

    // Identifier uniqueness holds even if the same response is applied twice.
    state.apply_create(product(2, "B", 20.0, "y"));
    assert_eq!(state.products().len(), 2);
}

#[test]
fn draft_payload_clamps_price_and_normalizes_image() {
    let mut state = ready_state(vec![product(1, "A", 10.0, "x")]);
    assert!(state.begin_edit(ProductId(1)));
    {
        let draft = state.draft_mut().expect("draft");
        draft.price = -5.0;
        draft.image = "   ".to_string();
    }
    let payload = state.draft().expect("draft").to_product();
    assert_eq!(payload.price, 0.0);
    assert!(payload.image.is_none());

    {
        let draft = state.draft_mut().expect("draft");
        draft.image = "  http://img.example/a.png  ".to_string();
    }
    let payload = state.draft().expect("draft").to_product();
    assert_eq!(payload.image.as_deref(), Some("http://img.example/a.png"));
}
