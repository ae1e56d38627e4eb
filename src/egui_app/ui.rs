//! egui renderer for the upload widget.
//!
//! Pure presentation: reads the controller's state each frame, paints the
//! gallery, footer, status bar, and drop overlay, and reports gestures back.

use std::collections::{HashMap, HashSet};

use eframe::egui::{
    self, Align2, Area, Color32, Frame, Order, RichText, Stroke, TextureHandle, TextureOptions,
    Ui, Vec2,
};

use crate::egui_app::controller::EguiController;
use crate::staging::StagedFileId;
use crate::staging::preview::PreviewImage;

/// Smallest window that still fits the gallery and footer.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(480.0, 420.0);

const THUMB_TILE: Vec2 = Vec2::new(96.0, 72.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    thumbnails: HashMap<StagedFileId, TextureHandle>,
    hovering_files: bool,
}

impl EguiApp {
    /// Create the app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let controller =
            EguiController::load().map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self::with_controller(controller))
    }

    pub fn with_controller(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
            thumbnails: HashMap::new(),
            hovering_files: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let visuals = if self.controller.dark_mode() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    /// Translate the window layer's file-hover and drop events into the
    /// tracker's enter/leave/drop transitions.
    fn handle_file_drag_input(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        if hovering && !self.hovering_files {
            self.controller.drag_entered(true);
        }
        if hovering {
            self.controller.drag_over();
        }

        if !dropped.is_empty() {
            let blobs = dropped
                .iter()
                .filter_map(|file| match (&file.path, &file.bytes) {
                    (Some(path), _) => crate::staging::FileBlob::from_path(path)
                        .map_err(|err| {
                            tracing::warn!(path = %path.display(), "Dropped file unreadable: {err}");
                        })
                        .ok(),
                    (None, Some(bytes)) => Some(crate::staging::FileBlob::from_bytes(
                        file.name.clone(),
                        bytes.to_vec(),
                    )),
                    (None, None) => None,
                })
                .collect();
            self.controller.drop_blobs(blobs);
            self.hovering_files = false;
            return;
        }

        if !hovering && self.hovering_files {
            self.controller.drag_left();
        }
        self.hovering_files = hovering;
    }

    /// Upload textures for new previews and drop textures for removed rows.
    fn sync_thumbnails(&mut self, ctx: &egui::Context) {
        let live: HashSet<StagedFileId> =
            self.controller.ui.gallery.iter().map(|row| row.id).collect();
        self.thumbnails.retain(|id, _| live.contains(id));
        for row in &self.controller.ui.gallery {
            if !row.has_thumbnail || self.thumbnails.contains_key(&row.id) {
                continue;
            }
            let Some(PreviewImage::Thumbnail { width, height, rgba }) =
                self.controller.registry().preview(row.id)
            else {
                continue;
            };
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [*width as usize, *height as usize],
                rgba,
            );
            let texture =
                ctx.load_texture(format!("thumb-{}", row.id), image, TextureOptions::LINEAR);
            self.thumbnails.insert(row.id, texture);
        }
    }

    fn render_header(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label("Drag and drop your files anywhere or");
            ui.add_space(4.0);
            if ui.button("Upload a file").clicked() {
                self.controller.add_files_via_dialog();
            }
            ui.add_space(10.0);
        });
        ui.separator();
        ui.add_space(6.0);
        ui.heading("To Upload");
        ui.add_space(6.0);
    }

    fn render_gallery(&mut self, ui: &mut Ui) {
        if self.controller.ui.gallery.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.weak("No files selected");
            });
            return;
        }
        let rows = self.controller.ui.gallery.clone();
        let mut remove: Option<StagedFileId> = None;
        egui::ScrollArea::vertical()
            .id_salt("gallery_scroll")
            .show(ui, |ui| {
                for row in &rows {
                    ui.push_id(row.id, |ui| {
                        ui.horizontal(|ui| {
                            match self.thumbnails.get(&row.id) {
                                Some(texture) => {
                                    ui.add(
                                        egui::Image::new(texture)
                                            .fit_to_exact_size(THUMB_TILE)
                                            .corner_radius(4.0),
                                    );
                                }
                                None => {
                                    let (rect, _) = ui.allocate_exact_size(
                                        THUMB_TILE,
                                        egui::Sense::hover(),
                                    );
                                    ui.painter().rect_filled(
                                        rect,
                                        4.0,
                                        ui.visuals().faint_bg_color,
                                    );
                                    ui.painter().text(
                                        rect.center(),
                                        Align2::CENTER_CENTER,
                                        "FILE",
                                        egui::FontId::proportional(12.0),
                                        ui.visuals().weak_text_color(),
                                    );
                                }
                            }
                            ui.vertical(|ui| {
                                ui.label(RichText::new(&row.name).strong());
                                ui.weak(row.size_label.as_str());
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("✕").on_hover_text("Remove").clicked() {
                                        remove = Some(row.id);
                                    }
                                },
                            );
                        });
                        ui.add_space(4.0);
                    });
                }
            });
        if let Some(id) = remove {
            self.controller.remove_staged(id);
        }
    }

    fn render_footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let mut dark = self.controller.dark_mode();
                if ui.checkbox(&mut dark, "Dark mode").changed() {
                    self.controller.set_dark_mode(dark);
                    self.visuals_set = false;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cancel").clicked() {
                        self.controller.cancel();
                    }
                    let submitting = self.controller.ui.submitting;
                    if ui
                        .add_enabled(!submitting, egui::Button::new("Upload now"))
                        .clicked()
                    {
                        self.controller.submit();
                    }
                    if submitting {
                        ui.spinner();
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = &self.controller.ui.status;
            ui.horizontal(|ui| {
                ui.add_space(4.0);
                ui.painter().circle_filled(
                    ui.cursor().min + egui::vec2(7.0, 10.0),
                    6.0,
                    status.tone.badge_color(),
                );
                ui.add_space(14.0);
                ui.label(status.tone.badge_label());
                ui.separator();
                ui.label(&status.text);
            });
        });
    }

    fn render_drop_overlay(&mut self, ctx: &egui::Context) {
        if !self.controller.overlay_visible() {
            return;
        }
        let screen = ctx.screen_rect();
        Area::new("drop_overlay".into())
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                Frame::new()
                    .fill(Color32::from_rgba_unmultiplied(26, 39, 51, 200))
                    .stroke(Stroke::new(2.0, Color32::from_rgb(90, 176, 255)))
                    .show(ui, |ui| {
                        ui.set_min_size(screen.size());
                        ui.centered_and_justified(|ui| {
                            ui.label(
                                RichText::new("Drop files to upload")
                                    .size(22.0)
                                    .color(Color32::from_rgb(90, 176, 255)),
                            );
                        });
                    });
            });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_submission();
        self.handle_file_drag_input(ctx);
        self.sync_thumbnails(ctx);

        self.render_status(ctx);
        self.render_footer(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui);
            self.render_gallery(ui);
        });
        self.render_drop_overlay(ctx);

        if self.controller.ui.submitting {
            // Keep polling while the upload worker runs.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
