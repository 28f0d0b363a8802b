// screen-lens/src/session.rs

// ============================================================================
// MÓDULO SESSION - Serviços da aplicação + estado que passa entre overlays
// ============================================================================
//
// Criado uma única vez no main e compartilhado por `Arc`:
// - pipeline de OCR (Tesseract + detector de idioma)
// - serviço de tradução
// - captura de tela
//
// ============================================================================

use anyhow::{bail, Context, Result};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Duration;

use crate::capture::{ScreenCapture, ScreenshotsCapture};
use crate::config::AppConfig;
use crate::lang_detect::WhatlangDetector;
use crate::languages::{LanguageCatalog, DEFAULT_SHORT_LANGUAGE};
use crate::ocr::{TesseractEngine, TextAcquisition};
use crate::translator::{GoogleTranslator, TranslationProvider, TranslationService};

// ============================================================================
// ESTADO COMPARTILHADO ENTRE SESSÕES
// ============================================================================

/// Única informação que sobrevive ao fechamento de um overlay de tradução
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSessionConfig {
    /// Idioma de destino (código curto)
    pub target_language: String,
}

impl SharedSessionConfig {
    pub fn new(target_language: impl Into<String>) -> Self {
        SharedSessionConfig {
            target_language: target_language.into(),
        }
    }
}

impl Default for SharedSessionConfig {
    fn default() -> Self {
        SharedSessionConfig::new(DEFAULT_SHORT_LANGUAGE)
    }
}

// ============================================================================
// REGIÃO SELECIONADA
// ============================================================================

/// Retângulo na área de trabalho (pixels físicos)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Resultado do seletor: recorte + tela inteira como contexto para o OSD
#[derive(Debug, Clone)]
pub struct RegionSelection {
    pub region: Region,
    pub image: Arc<DynamicImage>,
    pub context: Option<Arc<DynamicImage>>,
}

// ============================================================================
// SESSÃO
// ============================================================================

pub struct Session {
    pub config: AppConfig,
    pub acquisition: TextAcquisition,
    pub translation: TranslationService,
    pub capture: Box<dyn ScreenCapture>,
}

impl Session {
    pub fn new(
        config: AppConfig,
        acquisition: TextAcquisition,
        translation: TranslationService,
        capture: Box<dyn ScreenCapture>,
    ) -> Self {
        Session {
            config,
            acquisition,
            translation,
            capture,
        }
    }

    /// Monta os serviços reais a partir da configuração
    ///
    /// Falha se o Tesseract não estiver instalado.
    pub fn start(config: AppConfig) -> Result<Self> {
        let engine = TesseractEngine::new(config.ocr.tesseract_cmd.clone(), config.ocr.psm);
        let installed = engine.verify().context("Tesseract indisponível")?;

        let catalog = LanguageCatalog::new(installed, &config.ocr.fallback_language);
        info!("   🌍 Conjunto composto: {}", catalog.composite_language_set());

        let acquisition = TextAcquisition::new(
            Arc::new(engine),
            Arc::new(WhatlangDetector),
            Arc::new(catalog),
        );

        let provider = Self::create_provider(&config)?;
        info!(
            "🌐 Tradutor: {} (cache {})",
            provider.name(),
            if config.translation.cache_enabled { "ligado" } else { "desligado" }
        );
        let translation = TranslationService::new(provider, config.translation.cache_enabled);

        Ok(Session::new(
            config,
            acquisition,
            translation,
            Box::new(ScreenshotsCapture),
        ))
    }

    fn create_provider(config: &AppConfig) -> Result<Arc<dyn TranslationProvider>> {
        let timeout = Duration::from_secs(config.translation.timeout_secs);

        match config.translation.provider.to_lowercase().as_str() {
            "google" => Ok(Arc::new(GoogleTranslator::new(timeout)?)),
            other => bail!("Provedor de tradução desconhecido: '{}'", other),
        }
    }

    /// Configuração compartilhada da primeira sessão
    pub fn initial_shared_config(&self) -> SharedSessionConfig {
        SharedSessionConfig::new(self.config.translation.default_target_language.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_config_defaults_to_english() {
        assert_eq!(SharedSessionConfig::default().target_language, "en");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut config = AppConfig::default();
        config.translation.provider = "babelfish".to_string();

        let err = Session::create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("babelfish"));
    }

    #[test]
    fn initial_shared_config_follows_configuration() {
        let mut config = AppConfig::default();
        config.translation.default_target_language = "pt".to_string();
        let session = crate::testing::SessionBuilder::new().config(config).build();

        assert_eq!(session.initial_shared_config().target_language, "pt");
    }
}
