//! UI layer: app shell, catalog grid, editor overlay, and creation form.

use std::collections::HashMap;

use catalog_client::{CatalogOp, CatalogPhase, CatalogState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::{
    domain::{Product, ProductId},
    protocol::CreateProductRequest,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_transport_failure, op_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3001".to_string(),
        }
    }
}

/// RGBA pixels decoded by the backend worker, turned into a texture lazily
/// on first render.
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

enum ImagePreviewState {
    Loading,
    Ready {
        image: PreviewImage,
        texture: Option<TextureHandle>,
    },
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppView {
    Catalog,
    NewProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

#[derive(Debug, Clone)]
struct PendingDelete {
    id: ProductId,
    name: String,
}

#[derive(Debug, Clone)]
enum FormFeedback {
    Success(String),
    Error(String),
}

/// Field state for the standalone creation form.
#[derive(Debug, Default)]
struct NewProductForm {
    name: String,
    price: f64,
    description: String,
    image: String,
    feedback: Option<FormFeedback>,
}

impl NewProductForm {
    fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }

    fn to_request(&self) -> CreateProductRequest {
        let image = self.image.trim();
        CreateProductRequest {
            name: self.name.trim().to_string(),
            price: self.price.max(0.0),
            description: self.description.trim().to_string(),
            image: (!image.is_empty()).then(|| image.to_string()),
        }
    }

    fn clear_fields(&mut self) {
        self.name.clear();
        self.price = 0.0;
        self.description.clear();
        self.image.clear();
    }
}

fn placeholder_image_url(id: ProductId) -> String {
    format!("https://picsum.photos/seed/{}/120/120", id.0)
}

/// Which central content the catalog view renders this frame.
enum CentralMode {
    Loading,
    LoadFailed(String),
    Grid,
    Editor,
}

pub struct CatalogApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    startup: StartupConfig,

    state: CatalogState,
    view: AppView,
    new_product_form: NewProductForm,
    pending_delete: Option<PendingDelete>,

    status: String,
    status_banner: Option<StatusBanner>,

    image_previews: HashMap<ProductId, ImagePreviewState>,
}

impl CatalogApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            startup,
            state: CatalogState::new(),
            view: AppView::Catalog,
            new_product_form: NewProductForm::default(),
            pending_delete: None,
            status: "Loading products...".to_string(),
            status_banner: None,
            image_previews: HashMap::new(),
        };
        // The one mount-scoped fetch; everything afterwards reconciles the
        // in-memory mirror from confirmed mutations.
        dispatch_backend_command(&app.cmd_tx, BackendCommand::LoadProducts, &mut app.status);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendStartupFailed(message) => {
                    self.state.finish_load(Err(message.clone()));
                    self.status = "Backend worker failed to start".to_string();
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message,
                    });
                }
                UiEvent::ProductsLoaded(products) => {
                    self.status = format!("{} products loaded", products.len());
                    self.state.finish_load(Ok(products));
                }
                UiEvent::LoadFailed(message) => {
                    self.state
                        .finish_load(Err(classify_transport_failure(&message)));
                    self.status = "Failed to load products".to_string();
                }
                UiEvent::ProductDeleted(id) => {
                    if self.state.apply_delete(id) {
                        self.image_previews.remove(&id);
                        self.status = "Product deleted".to_string();
                        self.status_banner = Some(StatusBanner {
                            severity: StatusBannerSeverity::Info,
                            message: "Product deleted.".to_string(),
                        });
                    }
                }
                UiEvent::ProductSaved(product) => {
                    // The server may have normalized the image reference;
                    // refetch the preview next frame.
                    self.image_previews.remove(&product.id);
                    self.state.apply_save(product);
                    self.status = "Product updated".to_string();
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Info,
                        message: "Product updated successfully.".to_string(),
                    });
                }
                UiEvent::ProductCreated(product) => {
                    self.state.apply_create(product);
                    self.new_product_form.clear_fields();
                    self.new_product_form.feedback = Some(FormFeedback::Success(
                        "Product registered successfully.".to_string(),
                    ));
                    self.status = "Product registered".to_string();
                }
                UiEvent::MutationFailed { op, message } => {
                    let friendly = classify_transport_failure(&message);
                    if op == CatalogOp::Create {
                        // Creation failures surface inside the form so the
                        // typed fields stay visible next to the message.
                        self.new_product_form.feedback = Some(FormFeedback::Error(friendly));
                        self.status = "Product registration failed".to_string();
                    } else {
                        self.status = format!("{} failed", op_label(op));
                        self.state.record_mutation_failure(op, friendly);
                    }
                }
                UiEvent::ImagePreviewLoaded { product_id, image } => {
                    self.image_previews.insert(
                        product_id,
                        ImagePreviewState::Ready {
                            image,
                            texture: None,
                        },
                    );
                }
                UiEvent::ImagePreviewFailed { product_id, reason } => {
                    tracing::debug!(product_id = product_id.0, %reason, "image preview failed");
                    self.image_previews
                        .insert(product_id, ImagePreviewState::Failed(reason));
                }
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Info => (
                    egui::Color32::from_rgb(45, 88, 58),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(92, 158, 110)),
                ),
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_catalog_view(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("catalog_top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Registered products");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let editing = matches!(self.state.phase(), CatalogPhase::Editing { .. });
                    if ui
                        .add_enabled(!editing, egui::Button::new("New product"))
                        .clicked()
                    {
                        self.view = AppView::NewProduct;
                    }
                    ui.add(
                        egui::TextEdit::singleline(self.state.query_mut())
                            .desired_width(240.0)
                            .hint_text("Search by name or description"),
                    );
                });
            });
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("catalog_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(&self.startup.server_url);
                });
            });
        });

        let mode = match self.state.phase() {
            CatalogPhase::Loading => CentralMode::Loading,
            CatalogPhase::LoadFailed { message } => CentralMode::LoadFailed(message.clone()),
            CatalogPhase::Ready => CentralMode::Grid,
            CatalogPhase::Editing { .. } => CentralMode::Editor,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            match mode {
                CentralMode::Loading => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(60.0);
                        ui.spinner();
                        ui.add_space(8.0);
                        ui.label("Loading products...");
                    });
                }
                CentralMode::LoadFailed(message) => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(60.0);
                        ui.colored_label(ui.visuals().error_fg_color, message);
                    });
                }
                CentralMode::Grid => self.show_product_grid(ui),
                CentralMode::Editor => self.show_editor(ui),
            }
        });

        self.show_delete_confirm(ctx);
    }

    fn show_product_grid(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = self.state.mutation_error() {
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!("{} failed: {}", op_label(error.op), error.message),
            );
            ui.add_space(4.0);
        }

        let visible: Vec<Product> = self
            .state
            .visible_products()
            .into_iter()
            .cloned()
            .collect();
        if visible.is_empty() {
            if self.state.products().is_empty() {
                ui.label("No products registered yet.");
            } else {
                ui.label(format!(
                    "No products match \"{}\".",
                    self.state.query().trim()
                ));
            }
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for product in &visible {
                        self.show_product_card(ui, product);
                    }
                });
            });
    }

    fn show_product_card(&mut self, ui: &mut egui::Ui, product: &Product) {
        egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                ui.set_width(260.0);
                ui.vertical(|ui| {
                    self.show_card_image(ui, product);
                    ui.add_space(4.0);
                    ui.strong(format!("{} - R$ {:.2}", product.name, product.price));
                    if !product.description.is_empty() {
                        ui.label(egui::RichText::new(&product.description).weak());
                    }
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Delete").clicked() {
                            self.pending_delete = Some(PendingDelete {
                                id: product.id,
                                name: product.name.clone(),
                            });
                        }
                        if ui.button("Edit").clicked() && self.state.begin_edit(product.id) {
                            self.status = format!("Editing \"{}\"", product.name);
                        }
                    });
                });
            });
    }

    fn show_card_image(&mut self, ui: &mut egui::Ui, product: &Product) {
        self.request_image_preview(product);
        match self.image_previews.get_mut(&product.id) {
            Some(ImagePreviewState::Ready { image, texture }) => {
                if texture.is_none() {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    *texture = Some(ui.ctx().load_texture(
                        format!("product_preview_{}", product.id.0),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                if let Some(texture) = texture.as_ref() {
                    let max_side = 96.0;
                    let mut size = texture.size_vec2();
                    if size.x > max_side {
                        size *= max_side / size.x;
                    }
                    if size.y > max_side {
                        size *= max_side / size.y;
                    }
                    ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                }
            }
            Some(ImagePreviewState::Loading) => {
                ui.add_sized([96.0, 96.0], egui::Spinner::new());
            }
            Some(ImagePreviewState::Failed(reason)) => {
                ui.add_sized(
                    [96.0, 96.0],
                    egui::Label::new(egui::RichText::new("no image").weak()),
                )
                .on_hover_text(reason.clone());
            }
            None => {}
        }
    }

    fn request_image_preview(&mut self, product: &Product) {
        if self.image_previews.contains_key(&product.id) {
            return;
        }
        let url = product
            .image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_image_url(product.id));
        self.image_previews
            .insert(product.id, ImagePreviewState::Loading);
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchImagePreview {
                product_id: product.id,
                url,
            },
            &mut self.status,
        );
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        ui.heading("Edit product");
        ui.add_space(8.0);

        let mut save_clicked = false;
        let mut cancel_clicked = false;
        let mut submittable = false;

        if let Some(draft) = self.state.draft_mut() {
            egui::Grid::new("product_editor_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.add(egui::TextEdit::singleline(&mut draft.name).desired_width(320.0));
                    ui.end_row();

                    ui.label("Price");
                    ui.add(
                        egui::DragValue::new(&mut draft.price)
                            .speed(0.1)
                            .range(0.0..=f64::MAX)
                            .prefix("R$ "),
                    );
                    ui.end_row();

                    ui.label("Description");
                    ui.add(
                        egui::TextEdit::multiline(&mut draft.description)
                            .desired_rows(4)
                            .desired_width(320.0),
                    );
                    ui.end_row();

                    ui.label("Image URL");
                    ui.add(egui::TextEdit::singleline(&mut draft.image).desired_width(320.0));
                    ui.end_row();
                });
            submittable = !draft.name.trim().is_empty();
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(submittable, egui::Button::new("Save"))
                .clicked()
            {
                save_clicked = true;
            }
            if ui.button("Cancel").clicked() {
                cancel_clicked = true;
            }
        });

        if let Some(error) = self.state.mutation_error() {
            if error.op == CatalogOp::Save {
                ui.add_space(6.0);
                ui.colored_label(ui.visuals().error_fg_color, error.message.clone());
            }
        }

        if save_clicked {
            if let Some(draft) = self.state.draft() {
                let product = draft.to_product();
                self.status = format!("Saving \"{}\"...", product.name);
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SaveProduct { product },
                    &mut self.status,
                );
            }
        } else if cancel_clicked {
            self.state.cancel_edit();
            self.status = "Edit cancelled".to_string();
        }
    }

    fn show_delete_confirm(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_delete.clone() else {
            return;
        };
        let mut confirmed = false;
        let mut dismissed = false;

        egui::Window::new("Confirm deletion")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete \"{}\"? This cannot be undone.",
                    pending.name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        dismissed = true;
                    }
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                });
            });

        if confirmed {
            self.status = format!("Deleting \"{}\"...", pending.name);
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::DeleteProduct { id: pending.id },
                &mut self.status,
            );
            self.pending_delete = None;
        } else if dismissed {
            // Declining the confirmation is a no-op.
            self.pending_delete = None;
        }
    }

    fn show_new_product_view(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("new_product_top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Product registration");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Back to catalog").clicked() {
                        self.view = AppView::Catalog;
                    }
                });
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let form = &mut self.new_product_form;
            egui::Grid::new("new_product_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(320.0));
                    ui.end_row();

                    ui.label("Price");
                    ui.add(
                        egui::DragValue::new(&mut form.price)
                            .speed(0.1)
                            .range(0.0..=f64::MAX)
                            .prefix("R$ "),
                    );
                    ui.end_row();

                    ui.label("Description");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.description)
                            .desired_rows(4)
                            .desired_width(320.0),
                    );
                    ui.end_row();

                    ui.label("Image URL");
                    ui.add(egui::TextEdit::singleline(&mut form.image).desired_width(320.0));
                    ui.end_row();
                });

            ui.add_space(8.0);
            let mut submit = false;
            if ui
                .add_enabled(form.is_submittable(), egui::Button::new("Register"))
                .clicked()
            {
                submit = true;
            }

            match &form.feedback {
                Some(FormFeedback::Success(message)) => {
                    ui.add_space(6.0);
                    ui.colored_label(egui::Color32::from_rgb(92, 158, 110), message);
                }
                Some(FormFeedback::Error(message)) => {
                    ui.add_space(6.0);
                    ui.colored_label(ui.visuals().error_fg_color, message);
                }
                None => {}
            }

            if submit {
                let request = form.to_request();
                self.status = format!("Registering \"{}\"...", request.name);
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CreateProduct { request },
                    &mut self.status,
                );
            }
        });
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        match self.view {
            AppView::Catalog => self.show_catalog_view(ctx),
            AppView::NewProduct => self.show_new_product_view(ctx),
        }

        // Backend events arrive without user input; keep polling.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
