// screen-lens/src/overlay/render.rs

// ============================================================================
// RENDERIZAÇÃO DOS OVERLAYS
// ============================================================================
//
// Funções de desenho em egui. Não mudam o estado do controlador diretamente:
// devolvem o que o usuário fez para o app aplicar depois do frame.
//
// ============================================================================

use eframe::egui;
use image::DynamicImage;

use crate::languages::SUPPORTED_TRANSLATOR_LANGUAGES;
use crate::overlay::layout::PanelRect;
use crate::overlay::selection::SelectionOverlay;
use crate::overlay::translation::{PanelStatus, TextMode, TranslationAction, TranslationOverlay};
use crate::session::RegionSelection;

/// Resultado do seletor neste frame
pub enum SelectionOutcome {
    Chosen(RegionSelection),
    Cancelled,
}

/// Converte uma imagem para textura do egui
pub fn load_texture(ctx: &egui::Context, name: &str, image: &DynamicImage) -> egui::TextureHandle {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

    ctx.load_texture(name, color_image, egui::TextureOptions::default())
}

/// Retângulo em pixels → retângulo em pontos do egui
fn to_points(rect: PanelRect, pixels_per_point: f32) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x as f32 / pixels_per_point, rect.y as f32 / pixels_per_point),
        egui::vec2(rect.width as f32, rect.height as f32) / pixels_per_point,
    )
}

// ============================================================================
// SELETOR DE REGIÃO
// ============================================================================

pub fn render_selection(
    ctx: &egui::Context,
    selection: &mut SelectionOverlay,
    texture: Option<&egui::TextureHandle>,
) -> Option<SelectionOutcome> {
    let pixels_per_point = ctx.pixels_per_point();
    let mut outcome = None;

    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            // ============================================================
            // DESENHA O FUNDO (Screenshot)
            // ============================================================
            let full_rect = ui.max_rect();
            if let Some(texture) = texture {
                ui.painter().image(
                    texture.id(),
                    full_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            // Overlay semitransparente escuro
            ui.painter().rect_filled(
                full_rect,
                0.0,
                egui::Color32::from_rgba_unmultiplied(0, 0, 0, 100),
            );

            ui.painter().text(
                egui::pos2(20.0, 30.0),
                egui::Align2::LEFT_TOP,
                "Clique e arraste para selecionar o texto",
                egui::FontId::proportional(16.0),
                egui::Color32::LIGHT_GRAY,
            );

            ui.painter().text(
                egui::pos2(20.0, 55.0),
                egui::Align2::LEFT_TOP,
                "Pressione ESC para cancelar",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );

            // ============================================================
            // DETECTA INTERAÇÃO DO MOUSE
            // ============================================================
            let response = ui.interact(
                full_rect,
                egui::Id::new("region_selector"),
                egui::Sense::click_and_drag(),
            );

            // Posições em pixels do screenshot
            let pointer = response
                .interact_pointer_pos()
                .map(|pos| ((pos - full_rect.min) * pixels_per_point).to_pos2());

            if response.drag_started() {
                if let Some(pos) = pointer {
                    selection.begin_drag(pos);
                }
            }

            if response.dragged() {
                if let Some(pos) = pointer {
                    selection.update_drag(pos);
                }
            }

            if response.drag_stopped() {
                if let Some(chosen) = selection.finish_drag() {
                    outcome = Some(SelectionOutcome::Chosen(chosen));
                }
            }

            // ============================================================
            // DESENHA O RETÂNGULO DE SELEÇÃO
            // ============================================================
            if let Some(rect) = selection.current_rect() {
                let rect = egui::Rect::from_min_max(
                    full_rect.min + rect.min.to_vec2() / pixels_per_point,
                    full_rect.min + rect.max.to_vec2() / pixels_per_point,
                );

                // Mostra a região sem o escurecimento
                if let Some(texture) = texture {
                    let uv = egui::Rect::from_min_max(
                        egui::pos2(
                            (rect.min.x - full_rect.min.x) / full_rect.width(),
                            (rect.min.y - full_rect.min.y) / full_rect.height(),
                        ),
                        egui::pos2(
                            (rect.max.x - full_rect.min.x) / full_rect.width(),
                            (rect.max.y - full_rect.min.y) / full_rect.height(),
                        ),
                    );
                    ui.painter()
                        .image(texture.id(), rect, uv, egui::Color32::WHITE);
                }

                ui.painter().rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(0, 200, 255)),
                );
            }

            // ============================================================
            // TECLA ESC - Cancela
            // ============================================================
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                info!("❌ Seleção cancelada");
                outcome = Some(SelectionOutcome::Cancelled);
            }
        });

    outcome
}

// ============================================================================
// OVERLAY DE TRADUÇÃO
// ============================================================================

pub fn render_translation(
    ctx: &egui::Context,
    overlay: &TranslationOverlay,
    texture: Option<&egui::TextureHandle>,
) -> Vec<TranslationAction> {
    let pixels_per_point = ctx.pixels_per_point();
    let layout = *overlay.layout();
    let mut actions = Vec::new();

    let font_size = if layout.small { 10.0 } else { 14.0 };
    let background = egui::Color32::from_rgb(40, 40, 40);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(background))
        .show(ctx, |ui| {
            let origin = ui.max_rect().min.to_vec2();
            let place = |rect: PanelRect| to_points(rect, pixels_per_point).translate(origin);

            // ============================================================
            // IMAGEM (arrastar move a janela)
            // ============================================================
            let image_rect = place(layout.image_panel);
            if let Some(texture) = texture {
                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            ui.painter().rect_stroke(
                image_rect,
                0.0,
                egui::Stroke::new(layout.border_size as f32 / pixels_per_point, background),
            );

            let drag = ui.interact(
                image_rect,
                egui::Id::new("translation_drag"),
                egui::Sense::drag(),
            );
            if drag.drag_started() {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }

            // ============================================================
            // FERRAMENTAS: modo + idiomas
            // ============================================================
            ui.allocate_ui_at_rect(place(layout.tools_panel), |ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                ui.horizontal(|ui| {
                    let (label, next_mode) = match overlay.mode() {
                        TextMode::Recognition => ("=", TextMode::Translation),
                        TextMode::Translation => (">", TextMode::Recognition),
                    };
                    if ui.small_button(label).clicked() {
                        actions.push(TranslationAction::SetMode(next_mode));
                    }

                    let source_choices = overlay.source_choices();
                    language_combo(ui, "from_lang", overlay.from_lang(), &source_choices, |lang| {
                        actions.push(TranslationAction::SetFromLang(lang))
                    });

                    if overlay.mode() == TextMode::Translation {
                        ui.label("→");
                        language_combo(
                            ui,
                            "to_lang",
                            overlay.to_lang(),
                            SUPPORTED_TRANSLATOR_LANGUAGES,
                            |lang| actions.push(TranslationAction::SetToLang(lang)),
                        );
                    }

                    if overlay.status() == &PanelStatus::Loading {
                        ui.spinner();
                    }
                });
            });

            // ============================================================
            // TEXTO
            // ============================================================
            ui.allocate_ui_at_rect(place(layout.text_panel), |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let editable = overlay.mode() == TextMode::Recognition
                            && overlay.status() == &PanelStatus::Ready;

                        let mut text = overlay.displayed_text().to_string();
                        let response = ui.add(
                            egui::TextEdit::multiline(&mut text)
                                .font(egui::FontId::monospace(font_size))
                                .text_color(egui::Color32::from_rgb(200, 200, 200))
                                .frame(false)
                                .desired_width(f32::INFINITY)
                                .interactive(editable),
                        );

                        if response.changed() {
                            actions.push(TranslationAction::EditText(text));
                        }
                    });
            });

            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                actions.push(TranslationAction::Close);
            }
        });

    actions
}

fn language_combo(
    ui: &mut egui::Ui,
    id: &str,
    selected: &str,
    choices: &[&str],
    mut on_change: impl FnMut(String),
) {
    egui::ComboBox::from_id_source(id)
        .selected_text(selected)
        .width(56.0)
        .show_ui(ui, |ui| {
            for lang in choices {
                if ui.selectable_label(*lang == selected, *lang).clicked() && *lang != selected {
                    on_change(lang.to_string());
                }
            }
        });
}
