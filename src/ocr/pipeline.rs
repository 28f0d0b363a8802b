// screen-lens/src/ocr/pipeline.rs

// ============================================================================
// PIPELINE DE AQUISIÇÃO DE TEXTO
// ============================================================================
//
// Três caminhos, do mais barato ao mais preciso:
//
// 1. RÁPIDO    - um OCR com o conjunto composto + detecção de idioma
// 2. PADRÃO    - OCR composto → detecção → novo OCR só com o idioma detectado
// 3. QUALIDADE - OSD (escrita) → idiomas da escrita → caminho PADRÃO
//
// O motor perde precisão quando precisa escolher entre muitos alfabetos ao
// mesmo tempo, por isso o refinamento. O OSD precisa de bastante texto, então
// só vale para imagens grandes ou com uma imagem de contexto.
//
// ============================================================================

use image::DynamicImage;
use std::sync::Arc;

use super::{OcrEngine, OcrError};
use crate::lang_detect::LanguageDetector;
use crate::languages::{LanguageCatalog, DEFAULT_SHORT_LANGUAGE};

/// Texto devolvido quando o OCR não encontra nada
pub const NO_TEXT_MESSAGE: &str = "There is no text in the image!";

/// Texto reconhecido + idioma detectado (código curto)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub text: String,
    pub lang: String,
}

impl TextDocument {
    /// Documento sentinela para imagens sem texto
    pub fn empty() -> Self {
        TextDocument {
            text: NO_TEXT_MESSAGE.to_string(),
            lang: DEFAULT_SHORT_LANGUAGE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn is_empty_sentinel(&self) -> bool {
        self.text == NO_TEXT_MESSAGE && self.lang == DEFAULT_SHORT_LANGUAGE
    }
}

/// Pipeline de OCR + detecção de idioma
#[derive(Clone)]
pub struct TextAcquisition {
    engine: Arc<dyn OcrEngine>,
    detector: Arc<dyn LanguageDetector>,
    catalog: Arc<LanguageCatalog>,
}

impl TextAcquisition {
    pub fn new(
        engine: Arc<dyn OcrEngine>,
        detector: Arc<dyn LanguageDetector>,
        catalog: Arc<LanguageCatalog>,
    ) -> Self {
        TextAcquisition {
            engine,
            detector,
            catalog,
        }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    // ========================================================================
    // CAMINHO RÁPIDO
    // ========================================================================

    /// Um único OCR com todos os idiomas; sem segunda passada
    pub fn acquire_fast(&self, image: &DynamicImage) -> Result<TextDocument, OcrError> {
        info!("⚡ [OCR rápido] {}x{}", image.width(), image.height());

        let all = self.catalog.composite_language_set();
        let text = self.engine.image_to_string(image, &all)?;

        if text.trim().is_empty() {
            info!("⚠️  Nenhum texto detectado!");
            return Ok(TextDocument::empty());
        }

        let lang = self
            .detect_language(&text)
            .unwrap_or_else(|| DEFAULT_SHORT_LANGUAGE.to_string());
        Ok(TextDocument { text, lang })
    }

    // ========================================================================
    // CAMINHO PADRÃO
    // ========================================================================

    /// OCR com `language_set` (padrão: conjunto composto), detecção de idioma
    /// e novo OCR restrito ao idioma detectado quando ele é suportado
    pub fn acquire(
        &self,
        image: &DynamicImage,
        language_set: Option<&str>,
    ) -> Result<TextDocument, OcrError> {
        let language_set = match language_set {
            Some(set) => set.to_string(),
            None => self.catalog.composite_language_set(),
        };

        info!("🔍 [OCR padrão] {}x{} com {}", image.width(), image.height(), language_set);

        let text = self.engine.image_to_string(image, &language_set)?;

        if text.trim().is_empty() {
            info!("⚠️  Nenhum texto detectado!");
            return Ok(TextDocument::empty());
        }

        // Sem palpite do detector não há idioma para refinar
        let Some(short) = self.detect_language(&text) else {
            return Ok(TextDocument {
                text,
                lang: DEFAULT_SHORT_LANGUAGE.to_string(),
            });
        };

        match self.catalog.ocr_code_for(&short) {
            Some(long) => {
                info!("   🔁 Refinando OCR com o idioma detectado: {}", long);
                let text = self.engine.image_to_string(image, long)?;
                Ok(TextDocument { text, lang: short })
            }
            None => {
                info!("   ↩️  Sem idioma de OCR para '{}', mantendo o texto original", short);
                Ok(TextDocument { text, lang: short })
            }
        }
    }

    // ========================================================================
    // CAMINHO DE QUALIDADE
    // ========================================================================

    /// Detecta a escrita (no contexto, se houver) e restringe os idiomas a ela
    ///
    /// Falha no OSD nunca chega ao chamador: vira o caminho padrão com o
    /// conjunto composto.
    pub fn acquire_quality(
        &self,
        image: &DynamicImage,
        context: Option<&DynamicImage>,
    ) -> Result<TextDocument, OcrError> {
        let osd_source = context.unwrap_or(image);

        info!(
            "🧭 [OCR qualidade] detectando escrita em {}x{}",
            osd_source.width(),
            osd_source.height()
        );

        match self.engine.image_to_osd(osd_source) {
            Ok(osd) => {
                let script_languages = self.catalog.script_language_set(&osd.script);
                info!(
                    "   ✍️  Escrita: {} (confiança {:.2}) → {}",
                    osd.script, osd.script_confidence, script_languages
                );
                if osd.rotate != 0 {
                    debug!("   ↪️  Imagem girada {}°", osd.rotate);
                }
                self.acquire(image, Some(&script_languages))
            }
            Err(e) => {
                warn!("⚠️  OSD indisponível ({}), usando todos os idiomas", e);
                self.acquire(image, None)
            }
        }
    }

    // ========================================================================
    // IDIOMA ESCOLHIDO PELO USUÁRIO
    // ========================================================================

    /// OCR restrito a um único idioma (código longo)
    pub fn retrieve_with_lang(&self, image: &DynamicImage, long: &str) -> Result<String, OcrError> {
        info!("🔍 [OCR] idioma escolhido: {}", long);
        self.engine.image_to_string(image, long)
    }

    fn detect_language(&self, text: &str) -> Option<String> {
        let lang = self.detector.detect(text);
        if lang.is_none() {
            warn!("⚠️  Idioma não detectado, assumindo '{}'", DEFAULT_SHORT_LANGUAGE);
        }
        lang
    }
}
