//! Backend worker: owns the HTTP client and its tokio runtime on a
//! dedicated thread, draining UI commands sequentially.

use std::thread;

use catalog_client::{CatalogApi, CatalogOp};
use crossbeam_channel::{Receiver, Sender};
use image::GenericImageView;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::PreviewImage;

pub fn spawn_backend_thread(
    server_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let api = CatalogApi::new(server_url);
            tracing::info!(server_url = api.base_url(), "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadProducts => match api.fetch_products().await {
                        Ok(products) => {
                            let _ = ui_tx.try_send(UiEvent::ProductsLoaded(products));
                        }
                        Err(err) => {
                            tracing::warn!("initial product fetch failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::LoadFailed(err.to_string()));
                        }
                    },
                    BackendCommand::DeleteProduct { id } => match api.delete_product(id).await {
                        Ok(()) => {
                            let _ = ui_tx.try_send(UiEvent::ProductDeleted(id));
                        }
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::MutationFailed {
                                op: CatalogOp::Delete,
                                message: err.to_string(),
                            });
                        }
                    },
                    BackendCommand::SaveProduct { product } => {
                        match api.update_product(&product).await {
                            Ok(updated) => {
                                let _ = ui_tx.try_send(UiEvent::ProductSaved(updated));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::MutationFailed {
                                    op: CatalogOp::Save,
                                    message: err.to_string(),
                                });
                            }
                        }
                    }
                    BackendCommand::CreateProduct { request } => {
                        match api.create_product(&request).await {
                            Ok(created) => {
                                let _ = ui_tx.try_send(UiEvent::ProductCreated(created));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::MutationFailed {
                                    op: CatalogOp::Create,
                                    message: err.to_string(),
                                });
                            }
                        }
                    }
                    BackendCommand::FetchImagePreview { product_id, url } => {
                        match api.fetch_image_bytes(&url).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => {
                                    let _ = ui_tx.try_send(UiEvent::ImagePreviewLoaded {
                                        product_id,
                                        image,
                                    });
                                }
                                Err(reason) => {
                                    let _ = ui_tx.try_send(UiEvent::ImagePreviewFailed {
                                        product_id,
                                        reason,
                                    });
                                }
                            },
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::ImagePreviewFailed {
                                    product_id,
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        });
    });
}

fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| format!("unsupported image data: {err}"))?;
    let (width, height) = decoded.dimensions();
    Ok(PreviewImage {
        width: width as usize,
        height: height as usize,
        rgba: decoded.to_rgba8().into_raw(),
    })
}
