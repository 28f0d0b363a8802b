// screen-lens/src/overlay/translation.rs

// ============================================================================
// OVERLAY DE TRADUÇÃO - Estado do painel ancorado na região
// ============================================================================
//
// Dois modos:
// - RECONHECIMENTO (padrão): mostra o texto do OCR, editável. Trocar o
//   idioma de origem refaz o OCR só com aquele idioma.
// - TRADUÇÃO: mostra o texto traduzido. Trocar origem ou destino refaz a
//   tradução.
//
// Todo OCR/tradução roda pelo dispatcher. Cada pedido leva um número de
// sequência por tipo; só o resultado do pedido mais recente é aplicado.
//
// ============================================================================

use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;

use crate::controller::OverlayController;
use crate::dispatcher::UiHandle;
use crate::languages::DEFAULT_SHORT_LANGUAGE;
use crate::ocr::TextDocument;
use crate::overlay::layout::PanelLayout;
use crate::session::{Region, RegionSelection, Session, SharedSessionConfig};
use crate::translator::TRANSLATION_FAILED;

/// Texto exibido quando o OCR falha
pub const TEXT_EXTRACTION_FAILED: &str = "Text extraction failed!";

/// O que o painel de texto mostra
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Recognition,
    Translation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Estratégia de OCR escolhida pelo tamanho da imagem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionPath {
    Fast,
    Quality,
}

/// Ações do usuário vindas da renderização
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationAction {
    SetMode(TextMode),
    SetFromLang(String),
    SetToLang(String),
    EditText(String),
    Close,
}

/// Serviços + canal da UI usados pelos pedidos assíncronos
#[derive(Clone)]
pub struct OverlayContext {
    pub session: Arc<Session>,
    pub ui: UiHandle<OverlayController>,
}

pub struct TranslationOverlay {
    id: u64,
    selection: RegionSelection,
    layout: PanelLayout,
    path: AcquisitionPath,
    ctx: OverlayContext,

    mode: TextMode,
    from_lang: String,
    to_lang: String,
    /// Último texto "de origem" (OCR ou edição do usuário)
    retrieved_text: String,
    /// O que o painel mostra agora
    displayed_text: String,
    status: PanelStatus,
    ocr_pending: bool,
    /// O último OCR falhou: não há texto de origem para traduzir
    ocr_failed: bool,

    ocr_seq: u64,
    translation_seq: u64,
}

impl TranslationOverlay {
    pub fn new(id: u64, selection: RegionSelection, ctx: OverlayContext) -> Self {
        let region = selection.region;
        let layout = PanelLayout::compute(
            region.x,
            region.y,
            selection.image.width(),
            selection.image.height(),
            &ctx.session.config.overlay,
        );

        let path = if layout.small {
            AcquisitionPath::Fast
        } else {
            AcquisitionPath::Quality
        };

        TranslationOverlay {
            id,
            selection,
            layout,
            path,
            ctx,
            mode: TextMode::Recognition,
            from_lang: DEFAULT_SHORT_LANGUAGE.to_string(),
            to_lang: DEFAULT_SHORT_LANGUAGE.to_string(),
            retrieved_text: String::new(),
            displayed_text: String::new(),
            status: PanelStatus::Loading,
            ocr_pending: false,
            ocr_failed: false,
            ocr_seq: 0,
            translation_seq: 0,
        }
    }

    // ========================================================================
    // CONFIGURAÇÃO COMPARTILHADA
    // ========================================================================

    pub fn shared_config(&self) -> SharedSessionConfig {
        SharedSessionConfig::new(self.to_lang.clone())
    }

    pub fn apply_shared_config(&mut self, config: &SharedSessionConfig) {
        self.to_lang = config.target_language.clone();
    }

    // ========================================================================
    // OCR
    // ========================================================================

    /// Dispara o OCR inicial com detecção de idioma
    pub fn start(&mut self) {
        self.ocr_seq += 1;
        self.ocr_pending = true;
        self.status = PanelStatus::Loading;

        let seq = self.ocr_seq;
        let id = self.id;
        let path = self.path;
        let acquisition = self.ctx.session.acquisition.clone();
        let image = self.selection.image.clone();
        let context = self.selection.context.clone();

        info!("🔍 [Overlay #{}] OCR {:?} iniciado", id, path);

        self.ctx.ui.run(
            "ocr",
            move || -> Result<TextDocument> {
                let document = match path {
                    AcquisitionPath::Fast => acquisition.acquire_fast(&image)?,
                    AcquisitionPath::Quality => {
                        acquisition.acquire_quality(&image, context.as_deref())?
                    }
                };
                Ok(document)
            },
            move |controller: &mut OverlayController, result| {
                controller.with_translation(id, |overlay| overlay.apply_document(seq, result));
            },
        );
    }

    /// Aplica o resultado do OCR inicial; retorna false se foi descartado
    pub fn apply_document(&mut self, seq: u64, result: Result<TextDocument>) -> bool {
        if seq != self.ocr_seq {
            debug!("🗑️  [Overlay #{}] OCR #{} obsoleto, descartado", self.id, seq);
            return false;
        }
        self.ocr_pending = false;

        match result {
            Ok(document) => {
                info!(
                    "✅ [Overlay #{}] Texto reconhecido ({} caracteres, idioma '{}')",
                    self.id,
                    document.text.len(),
                    document.lang
                );
                self.from_lang = document.lang;
                self.set_retrieved_text(document.text);
            }
            Err(e) => self.fail_extraction(e),
        }
        true
    }

    /// Troca o idioma de origem e refaz o OCR só com ele
    pub fn set_from_lang(&mut self, lang: &str) {
        if self.from_lang == lang {
            return;
        }
        self.from_lang = lang.to_string();

        let Some(long) = self.ctx.session.acquisition.catalog().ocr_code_for(lang) else {
            warn!("⚠️  '{}' não está instalado no Tesseract, mantendo o texto atual", lang);
            self.refresh_translation();
            return;
        };

        self.ocr_seq += 1;
        self.ocr_pending = true;
        self.status = PanelStatus::Loading;

        let seq = self.ocr_seq;
        let id = self.id;
        let acquisition = self.ctx.session.acquisition.clone();
        let image = self.selection.image.clone();

        self.ctx.ui.run(
            "ocr-lang",
            move || -> Result<String> { Ok(acquisition.retrieve_with_lang(&image, long)?) },
            move |controller: &mut OverlayController, result| {
                controller.with_translation(id, |overlay| overlay.apply_language_text(seq, result));
            },
        );
    }

    /// Aplica o OCR refeito com o idioma escolhido
    pub fn apply_language_text(&mut self, seq: u64, result: Result<String>) -> bool {
        if seq != self.ocr_seq {
            debug!("🗑️  [Overlay #{}] OCR #{} obsoleto, descartado", self.id, seq);
            return false;
        }
        self.ocr_pending = false;

        match result {
            Ok(text) => self.set_retrieved_text(text),
            Err(e) => self.fail_extraction(e),
        }
        true
    }

    fn set_retrieved_text(&mut self, text: String) {
        self.retrieved_text = text;
        self.ocr_failed = false;

        match self.mode {
            TextMode::Recognition => {
                self.displayed_text = self.retrieved_text.clone();
                self.status = PanelStatus::Ready;
            }
            TextMode::Translation => self.request_translation(),
        }
    }

    fn fail_extraction(&mut self, e: anyhow::Error) {
        error!("❌ [Overlay #{}] Falha no OCR: {:#}", self.id, e);
        self.ocr_failed = true;
        self.displayed_text = TEXT_EXTRACTION_FAILED.to_string();
        self.status = PanelStatus::Failed(e.to_string());
    }

    // ========================================================================
    // TRADUÇÃO
    // ========================================================================

    pub fn set_to_lang(&mut self, lang: &str) {
        if self.to_lang == lang {
            return;
        }
        self.to_lang = lang.to_string();
        self.refresh_translation();
    }

    /// Refaz a tradução se ela estiver na tela (e o OCR não estiver rodando)
    fn refresh_translation(&mut self) {
        if self.mode == TextMode::Translation && !self.ocr_pending {
            self.request_translation();
        }
    }

    pub fn set_mode(&mut self, mode: TextMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;

        match mode {
            TextMode::Recognition => {
                if self.ocr_failed {
                    self.displayed_text = TEXT_EXTRACTION_FAILED.to_string();
                    return;
                }
                // Volta ao texto de origem sem refazer o OCR
                self.displayed_text = self.retrieved_text.clone();
                if !self.ocr_pending {
                    self.status = PanelStatus::Ready;
                }
            }
            TextMode::Translation => {
                if self.ocr_pending {
                    // A tradução sai quando o OCR terminar
                    return;
                }
                // O texto editado passa a ser a origem da tradução
                if self.status == PanelStatus::Ready {
                    self.retrieved_text = self.displayed_text.clone();
                }
                self.request_translation();
            }
        }
    }

    /// Edição manual do texto reconhecido
    pub fn edit_text(&mut self, text: String) {
        if self.mode == TextMode::Recognition {
            self.displayed_text = text;
        }
    }

    fn request_translation(&mut self) {
        if self.ocr_failed {
            debug!("   [Overlay #{}] Sem texto reconhecido, tradução ignorada", self.id);
            return;
        }

        self.translation_seq += 1;
        self.status = PanelStatus::Loading;

        let seq = self.translation_seq;
        let id = self.id;
        let service = self.ctx.session.translation.clone();
        let text = self.retrieved_text.clone();
        let from = self.from_lang.clone();
        let to = self.to_lang.clone();

        self.ctx.ui.run(
            "translate",
            move || Ok(service.translate(&text, &from, &to)),
            move |controller: &mut OverlayController, result| {
                controller.with_translation(id, |overlay| overlay.apply_translation(seq, result));
            },
        );
    }

    /// Aplica uma tradução; retorna false se foi descartada
    pub fn apply_translation(&mut self, seq: u64, result: Result<String>) -> bool {
        if seq != self.translation_seq || self.mode != TextMode::Translation {
            debug!("🗑️  [Overlay #{}] Tradução #{} obsoleta, descartada", self.id, seq);
            return false;
        }

        match result {
            Ok(text) => {
                self.displayed_text = text;
                self.status = PanelStatus::Ready;
            }
            Err(e) => {
                error!("❌ [Overlay #{}] Falha na tradução: {:#}", self.id, e);
                self.displayed_text = TRANSLATION_FAILED.to_string();
                self.status = PanelStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Aplica uma ação vinda da renderização (exceto `Close`, tratada pelo controlador)
    pub fn apply_action(&mut self, action: TranslationAction) {
        match action {
            TranslationAction::SetMode(mode) => self.set_mode(mode),
            TranslationAction::SetFromLang(lang) => self.set_from_lang(&lang),
            TranslationAction::SetToLang(lang) => self.set_to_lang(&lang),
            TranslationAction::EditText(text) => self.edit_text(text),
            TranslationAction::Close => {}
        }
    }

    // ========================================================================
    // ACESSO PARA A RENDERIZAÇÃO
    // ========================================================================

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn region(&self) -> Region {
        self.selection.region
    }

    pub fn image(&self) -> &Arc<DynamicImage> {
        &self.selection.image
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn path(&self) -> AcquisitionPath {
        self.path
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn from_lang(&self) -> &str {
        &self.from_lang
    }

    pub fn to_lang(&self) -> &str {
        &self.to_lang
    }

    pub fn retrieved_text(&self) -> &str {
        &self.retrieved_text
    }

    pub fn displayed_text(&self) -> &str {
        &self.displayed_text
    }

    pub fn status(&self) -> &PanelStatus {
        &self.status
    }

    /// Idiomas de origem oferecidos no seletor (instalados no Tesseract)
    pub fn source_choices(&self) -> Vec<&'static str> {
        self.ctx.session.acquisition.catalog().source_choices()
    }
}
