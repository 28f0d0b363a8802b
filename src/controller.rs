// screen-lens/src/controller.rs

// ============================================================================
// MÓDULO CONTROLLER - Ciclo de vida dos overlays
// ============================================================================
//
// Estados mutuamente exclusivos:
//
//   Idle ──enter_selection──▶ Selecting ──on_region_chosen──▶ Translating
//     ▲                           │                               │
//     └──────── close_all ────────┴───────── close_all ───────────┘
//
// - No máximo um overlay de cada tipo; abrir um novo descarta o anterior.
// - Fechar o overlay de tradução guarda o idioma de destino para o próximo.
// - `OverlayController` só vive na thread da UI. Outras threads (hotkeys,
//   tray) usam o `ControllerHandle`, que envia comandos pela fila da UI.
//
// ============================================================================

use std::sync::Arc;

use crate::dispatcher::UiHandle;
use crate::overlay::selection::SelectionOverlay;
use crate::overlay::translation::{OverlayContext, TranslationAction, TranslationOverlay};
use crate::session::{RegionSelection, Session, SharedSessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Idle,
    Selecting,
    Translating,
}

/// Comandos enviados de outras threads para a thread da UI
#[derive(Debug)]
pub enum AppCommand {
    /// Abre o seletor de região
    EnterSelection,
    /// Região escolhida: abre o overlay de tradução
    RegionChosen(RegionSelection),
    /// Fecha todos os overlays (a aplicação continua rodando)
    CloseAll,
    /// Fecha os overlays e encerra a aplicação
    Quit,
}

pub struct OverlayController {
    session: Arc<Session>,
    ui: UiHandle<OverlayController>,
    selection: Option<SelectionOverlay>,
    translation: Option<TranslationOverlay>,
    shared: SharedSessionConfig,
    next_id: u64,
    quit_requested: bool,
}

impl OverlayController {
    pub fn new(session: Arc<Session>, ui: UiHandle<OverlayController>) -> Self {
        let shared = session.initial_shared_config();

        OverlayController {
            session,
            ui,
            selection: None,
            translation: None,
            shared,
            next_id: 0,
            quit_requested: false,
        }
    }

    pub fn state(&self) -> OverlayState {
        if self.translation.is_some() {
            OverlayState::Translating
        } else if self.selection.is_some() {
            OverlayState::Selecting
        } else {
            OverlayState::Idle
        }
    }

    // ========================================================================
    // TRANSIÇÕES
    // ========================================================================

    /// Abre o seletor de região sobre um screenshot novo
    pub fn enter_selection(&mut self) {
        info!("🎯 Abrindo seletor de região...");

        self.close_translation();
        self.close_selection();

        match self.session.capture.capture_screen() {
            Ok(screenshot) => {
                self.selection = Some(SelectionOverlay::new(screenshot));
            }
            Err(e) => {
                error!("❌ Erro ao capturar tela: {:#}", e);
            }
        }
    }

    /// Troca o seletor pelo overlay de tradução da região escolhida
    pub fn on_region_chosen(&mut self, selection: RegionSelection) {
        self.close_selection();
        self.close_translation();

        self.next_id += 1;
        let ctx = OverlayContext {
            session: self.session.clone(),
            ui: self.ui.clone(),
        };

        let mut overlay = TranslationOverlay::new(self.next_id, selection, ctx);
        overlay.apply_shared_config(&self.shared);

        info!(
            "🖼️  Overlay #{} aberto ({}x{}, destino '{}')",
            overlay.id(),
            overlay.region().width,
            overlay.region().height,
            overlay.to_lang()
        );

        overlay.start();
        self.translation = Some(overlay);
    }

    /// Fecha tudo; pode ser chamado várias vezes
    pub fn close_all(&mut self) {
        if self.state() != OverlayState::Idle {
            info!("🙈 Fechando overlays");
        }
        self.close_selection();
        self.close_translation();
    }

    pub fn close_selection(&mut self) {
        if self.selection.take().is_some() {
            debug!("   Seletor fechado");
        }
    }

    /// Fecha o overlay de tradução guardando o idioma de destino
    pub fn close_translation(&mut self) {
        if let Some(overlay) = self.translation.take() {
            self.shared = overlay.shared_config();
            debug!(
                "   Overlay #{} fechado (destino '{}' guardado)",
                overlay.id(),
                self.shared.target_language
            );
        }
    }

    pub fn apply(&mut self, command: AppCommand) {
        match command {
            AppCommand::EnterSelection => self.enter_selection(),
            AppCommand::RegionChosen(selection) => self.on_region_chosen(selection),
            AppCommand::CloseAll => self.close_all(),
            AppCommand::Quit => {
                info!("👋 Encerrando...");
                self.close_all();
                self.quit_requested = true;
            }
        }
    }

    /// Ação do usuário no overlay de tradução
    pub fn apply_translation_action(&mut self, action: TranslationAction) {
        if action == TranslationAction::Close {
            self.close_translation();
            return;
        }

        if let Some(overlay) = self.translation.as_mut() {
            overlay.apply_action(action);
        }
    }

    /// Roda `f` no overlay de tradução se ele ainda for o overlay `id`
    ///
    /// Resultados assíncronos de overlays já fechados ou substituídos caem aqui
    /// e são descartados.
    pub fn with_translation<R>(
        &mut self,
        id: u64,
        f: impl FnOnce(&mut TranslationOverlay) -> R,
    ) -> Option<R> {
        match self.translation.as_mut() {
            Some(overlay) if overlay.id() == id => Some(f(overlay)),
            _ => {
                debug!("🗑️  Resultado do overlay #{} descartado (já fechado)", id);
                None
            }
        }
    }

    // ========================================================================
    // ACESSO
    // ========================================================================

    pub fn selection(&self) -> Option<&SelectionOverlay> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut SelectionOverlay> {
        self.selection.as_mut()
    }

    pub fn translation(&self) -> Option<&TranslationOverlay> {
        self.translation.as_ref()
    }

    pub fn shared_config(&self) -> &SharedSessionConfig {
        &self.shared
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }
}

// ============================================================================
// VARIANTE THREAD-SAFE
// ============================================================================

/// Handle `Clone + Send` do controlador para threads fora da UI
///
/// Cada chamada vira um `AppCommand` na fila da UI e retorna na hora.
#[derive(Clone)]
pub struct ControllerHandle {
    ui: UiHandle<OverlayController>,
}

impl ControllerHandle {
    pub fn new(ui: UiHandle<OverlayController>) -> Self {
        ControllerHandle { ui }
    }

    /// Retorna `false` se a UI já encerrou
    fn send(&self, command: AppCommand) -> bool {
        debug!("📨 Enviando comando: {:?}", command);
        let sent = self
            .ui
            .post(move |controller: &mut OverlayController| controller.apply(command));
        if !sent {
            error!("❌ Erro ao enviar comando: UI encerrada");
        }
        sent
    }

    pub fn enter_selection(&self) -> bool {
        self.send(AppCommand::EnterSelection)
    }

    pub fn on_region_chosen(&self, selection: RegionSelection) -> bool {
        self.send(AppCommand::RegionChosen(selection))
    }

    pub fn close_all(&self) -> bool {
        self.send(AppCommand::CloseAll)
    }

    pub fn quit(&self) -> bool {
        self.send(AppCommand::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::UiQueue;
    use crate::overlay::translation::{PanelStatus, TextMode};
    use crate::session::Region;
    use crate::testing::{blank_image, FakeCapture, SessionBuilder};
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn controller(builder: SessionBuilder) -> (UiQueue<OverlayController>, OverlayController) {
        let queue = UiQueue::new();
        let controller = OverlayController::new(Arc::new(builder.build()), queue.handle());
        (queue, controller)
    }

    fn selection(width: u32, height: u32) -> RegionSelection {
        RegionSelection {
            region: Region { x: 10, y: 20, width, height },
            image: Arc::new(blank_image(width, height)),
            context: Some(Arc::new(blank_image(800, 600))),
        }
    }

    fn is_ready(controller: &OverlayController) -> bool {
        controller
            .translation()
            .map_or(false, |overlay| overlay.status() == &PanelStatus::Ready)
    }

    #[test]
    fn starts_idle_and_enters_selection() {
        let capture = FakeCapture::screen(640, 480);
        let captures = capture.counter();
        let (_queue, mut controller) = controller(SessionBuilder::new().capture(capture));

        assert_eq!(controller.state(), OverlayState::Idle);

        controller.enter_selection();

        assert_eq!(controller.state(), OverlayState::Selecting);
        assert_eq!(captures.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.selection().unwrap().screenshot().image.width(),
            640
        );
    }

    #[test]
    fn capture_failure_keeps_controller_idle() {
        let (_queue, mut controller) =
            controller(SessionBuilder::new().capture(FakeCapture::failing()));

        controller.enter_selection();

        assert_eq!(controller.state(), OverlayState::Idle);
    }

    #[test]
    fn at_most_one_overlay_of_each_kind() {
        let (_queue, mut controller) = controller(SessionBuilder::new());

        controller.enter_selection();
        controller.enter_selection();
        assert_eq!(controller.state(), OverlayState::Selecting);

        controller.on_region_chosen(selection(300, 200));
        assert_eq!(controller.state(), OverlayState::Translating);
        assert!(controller.selection().is_none());

        controller.on_region_chosen(selection(300, 200));
        assert_eq!(controller.translation().unwrap().id(), 2);

        // Abrir o seletor fecha o overlay de tradução
        controller.enter_selection();
        assert_eq!(controller.state(), OverlayState::Selecting);
        assert!(controller.translation().is_none());
    }

    #[test]
    fn target_language_carries_over_to_the_next_session() {
        let (_queue, mut controller) = controller(SessionBuilder::new());

        controller.on_region_chosen(selection(300, 200));
        controller.apply_translation_action(TranslationAction::SetToLang("de".into()));

        controller.enter_selection();
        assert_eq!(controller.shared_config().target_language, "de");

        controller.on_region_chosen(selection(300, 200));
        assert_eq!(controller.translation().unwrap().to_lang(), "de");
    }

    #[test]
    fn close_all_is_idempotent() {
        let (_queue, mut controller) = controller(SessionBuilder::new());

        controller.close_all();
        controller.on_region_chosen(selection(300, 200));
        controller.close_all();
        controller.close_all();

        assert_eq!(controller.state(), OverlayState::Idle);
        assert!(!controller.should_quit());
    }

    #[test]
    fn document_arrives_asynchronously_on_the_ui_thread() {
        let (queue, mut controller) = controller(SessionBuilder::new().detected(Some("en")));

        controller.on_region_chosen(selection(300, 200));
        assert_eq!(
            controller.translation().unwrap().status(),
            &PanelStatus::Loading
        );

        assert!(queue.drain_until(&mut controller, WAIT, is_ready));

        let overlay = controller.translation().unwrap();
        assert_eq!(overlay.displayed_text(), "hello world");
        assert_eq!(overlay.from_lang(), "en");
        assert_eq!(overlay.mode(), TextMode::Recognition);
    }

    #[test]
    fn results_for_a_closed_overlay_are_dropped() {
        let (queue, mut controller) = controller(SessionBuilder::new());

        controller.on_region_chosen(selection(300, 200));
        controller.close_all();

        // O OCR do overlay fechado ainda chega, mas não reabre nada
        queue.drain_until(&mut controller, Duration::from_millis(500), |_| false);
        assert_eq!(controller.state(), OverlayState::Idle);

        controller.on_region_chosen(selection(300, 200));
        assert!(controller.with_translation(1, |_| ()).is_none());
        assert!(controller.with_translation(2, |_| ()).is_some());
    }

    #[test]
    fn handle_commands_are_applied_in_arrival_order() {
        let (queue, mut controller) = controller(SessionBuilder::new());
        let handle = ControllerHandle::new(queue.handle());

        let worker = handle.clone();
        thread::spawn(move || {
            worker.enter_selection();
            worker.on_region_chosen(selection(300, 200));
        })
        .join()
        .unwrap();

        assert_eq!(controller.state(), OverlayState::Idle);
        queue.drain(&mut controller);
        assert_eq!(controller.state(), OverlayState::Translating);

        handle.quit();
        queue.drain(&mut controller);
        assert_eq!(controller.state(), OverlayState::Idle);
        assert!(controller.should_quit());
    }
}
