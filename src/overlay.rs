// screen-lens/src/overlay.rs

// ============================================================================
// MÓDULO OVERLAY - Janela única que vira seletor ou painel de tradução
// ============================================================================
//
// Só existe um overlay visível por vez, então uma única janela (sem borda,
// sempre no topo) muda de forma conforme o estado do controlador:
//
// - Idle:        1x1 pixel, transparente (app continua rodando em background)
// - Selecting:   tela inteira com o screenshot congelado
// - Translating: posicionada sobre a região, com imagem + ferramentas + texto
//
// ============================================================================

pub mod layout;
pub mod render;
pub mod selection;
pub mod translation;

use anyhow::{anyhow, Result};
use eframe::egui;
use std::sync::Arc;

use crate::controller::{ControllerHandle, OverlayController, OverlayState};
use crate::dispatcher::UiQueue;
use crate::session::Session;
use render::SelectionOutcome;

/// Forma atual da janela (muda só na transição)
#[derive(Debug, Clone, Copy, PartialEq)]
enum WindowShape {
    Hidden,
    Selection,
    Translation(u64),
}

pub struct OverlayApp {
    queue: UiQueue<OverlayController>,
    controller: OverlayController,
    shape: WindowShape,
    /// Screenshot (seletor) ou recorte (tradução) da forma atual
    texture: Option<egui::TextureHandle>,
    #[cfg(windows)]
    _tray: Option<tray_icon::TrayIcon>,
}

impl OverlayApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        queue: UiQueue<OverlayController>,
        controller: OverlayController,
        handle: ControllerHandle,
    ) -> Self {
        // Toda tarefa nova na fila acorda o loop da UI
        let egui_ctx = cc.egui_ctx.clone();
        queue.set_waker(move || egui_ctx.request_repaint());

        #[cfg(windows)]
        let tray = match crate::tray::create_tray(handle) {
            Ok(tray) => Some(tray),
            Err(e) => {
                warn!("⚠️  Bandeja do sistema indisponível: {:#}", e);
                None
            }
        };
        #[cfg(not(windows))]
        drop(handle);

        OverlayApp {
            queue,
            controller,
            shape: WindowShape::Hidden,
            texture: None,
            #[cfg(windows)]
            _tray: tray,
        }
    }

    fn target_shape(&self) -> WindowShape {
        match self.controller.state() {
            OverlayState::Idle => WindowShape::Hidden,
            OverlayState::Selecting => WindowShape::Selection,
            OverlayState::Translating => self
                .controller
                .translation()
                .map_or(WindowShape::Hidden, |overlay| {
                    WindowShape::Translation(overlay.id())
                }),
        }
    }

    /// Reposiciona a janela quando o estado muda
    fn reshape_window(&mut self, ctx: &egui::Context) {
        let target = self.target_shape();
        if target == self.shape {
            return;
        }
        self.shape = target;
        self.texture = None;

        let pixels_per_point = ctx.pixels_per_point();

        match target {
            WindowShape::Hidden => {
                // Reduz para 1x1 pixel (praticamente invisível)
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(1.0, 1.0)));
                ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(0.0, 0.0)));
            }

            WindowShape::Selection => {
                if let Some(selection) = self.controller.selection() {
                    let screenshot = selection.screenshot();
                    let scale = screenshot.scale_factor.max(0.1);

                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                        screenshot.origin_x as f32 / scale,
                        screenshot.origin_y as f32 / scale,
                    )));
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                        screenshot.image.width() as f32 / scale,
                        screenshot.image.height() as f32 / scale,
                    )));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);

                    self.texture = Some(render::load_texture(ctx, "screenshot", &screenshot.image));
                }
            }

            WindowShape::Translation(_) => {
                if let Some(overlay) = self.controller.translation() {
                    let window = overlay.layout().window;

                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                        window.x as f32 / pixels_per_point,
                        window.y as f32 / pixels_per_point,
                    )));
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                        window.width as f32 / pixels_per_point,
                        window.height as f32 / pixels_per_point,
                    )));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);

                    self.texture = Some(render::load_texture(ctx, "region", overlay.image()));
                }
            }
        }
    }
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ====================================================================
        // RESULTADOS E COMANDOS DAS OUTRAS THREADS
        // ====================================================================
        self.queue.drain(&mut self.controller);

        if self.controller.should_quit() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.reshape_window(ctx);

        // ====================================================================
        // RENDERIZA O OVERLAY ATUAL
        // ====================================================================
        match self.shape {
            WindowShape::Hidden => {
                // Painel vazio e completamente transparente
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(egui::Color32::TRANSPARENT))
                    .show(ctx, |_ui| {});
            }

            WindowShape::Selection => {
                let outcome = match self.controller.selection_mut() {
                    Some(selection) => {
                        render::render_selection(ctx, selection, self.texture.as_ref())
                    }
                    None => None,
                };

                match outcome {
                    Some(SelectionOutcome::Chosen(chosen)) => {
                        self.controller.on_region_chosen(chosen)
                    }
                    Some(SelectionOutcome::Cancelled) => self.controller.close_selection(),
                    None => {}
                }
            }

            WindowShape::Translation(_) => {
                let actions = match self.controller.translation() {
                    Some(overlay) => {
                        render::render_translation(ctx, overlay, self.texture.as_ref())
                    }
                    None => Vec::new(),
                };

                for action in actions {
                    self.controller.apply_translation_action(action);
                }
            }
        }

        // Transições disparadas pela renderização aparecem no próximo frame
        if self.target_shape() != self.shape {
            ctx.request_repaint();
        }
    }
}

impl Drop for OverlayApp {
    fn drop(&mut self) {
        self.controller.close_all();
        info!("👋 Overlays fechados, saindo");
    }
}

/// Inicia o loop da UI na thread atual (que precisa ser a dona da fila)
pub fn run(
    session: Arc<Session>,
    queue: UiQueue<OverlayController>,
    handle: ControllerHandle,
) -> Result<()> {
    let controller = OverlayController::new(session, queue.handle());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1.0, 1.0])
            .with_position([0.0, 0.0])
            .with_always_on_top()
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(true)
            .with_taskbar(false),

        ..Default::default()
    };

    eframe::run_native(
        "Screen Lens",
        options,
        Box::new(move |cc| {
            Ok(Box::new(OverlayApp::new(cc, queue, controller, handle)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow!("Erro na interface: {}", e))
}
