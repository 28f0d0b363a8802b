// screen-lens/src/testing.rs

// ============================================================================
// FAKES PARA TESTES
// ============================================================================
//
// Implementações em memória dos pontos de extensão (OCR, detector de idioma,
// tradutor e captura) para testar o pipeline e o controlador sem Tesseract,
// rede ou monitor.
//
// ============================================================================

use anyhow::bail;
use crossbeam_channel::Receiver;
use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::capture::{ScreenCapture, Screenshot};
use crate::config::AppConfig;
use crate::lang_detect::LanguageDetector;
use crate::languages::LanguageCatalog;
use crate::ocr::{OcrEngine, OcrError, OsdInfo, TextAcquisition};
use crate::session::Session;
use crate::translator::{TranslateError, TranslationProvider, TranslationService};

/// Imagem branca com o tamanho pedido
pub fn blank_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([255, 255, 255, 255]),
    ))
}

// ============================================================================
// OCR
// ============================================================================

/// Motor de OCR com respostas fixas por conjunto de idiomas
pub struct FakeOcr {
    default_text: String,
    by_language: HashMap<String, String>,
    /// Escrita devolvida pelo OSD, ou mensagem de erro
    osd: Option<Result<String, String>>,
    failing: bool,
    /// Conjuntos de idiomas que só respondem depois de um sinal no canal
    gates: HashMap<String, Receiver<()>>,
    calls: Mutex<Vec<String>>,
    osd_sizes: Mutex<Vec<(u32, u32)>>,
}

impl FakeOcr {
    pub fn new(default_text: &str) -> Self {
        FakeOcr {
            default_text: default_text.to_string(),
            by_language: HashMap::new(),
            osd: None,
            failing: false,
            gates: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            osd_sizes: Mutex::new(Vec::new()),
        }
    }

    /// Motor que sempre termina com erro
    pub fn failing() -> Self {
        FakeOcr {
            failing: true,
            ..FakeOcr::new("")
        }
    }

    /// Texto devolvido quando o conjunto de idiomas é exatamente `languages`
    pub fn with_lang(mut self, languages: &str, text: &str) -> Self {
        self.by_language
            .insert(languages.to_string(), text.to_string());
        self
    }

    /// Segura a resposta para `languages` até `gate` receber um sinal
    pub fn with_gate(mut self, languages: &str, gate: Receiver<()>) -> Self {
        self.gates.insert(languages.to_string(), gate);
        self
    }

    pub fn with_osd(mut self, osd: Result<&str, &str>) -> Self {
        self.osd = Some(osd.map(str::to_string).map_err(str::to_string));
        self
    }

    /// Conjuntos de idiomas recebidos, em ordem
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Tamanhos das imagens enviadas ao OSD
    pub fn osd_sizes(&self) -> Vec<(u32, u32)> {
        self.osd_sizes.lock().unwrap().clone()
    }
}

impl OcrEngine for FakeOcr {
    fn image_to_string(&self, _image: &DynamicImage, languages: &str) -> Result<String, OcrError> {
        self.calls.lock().unwrap().push(languages.to_string());

        if let Some(gate) = self.gates.get(languages) {
            let _ = gate.recv_timeout(Duration::from_secs(5));
        }

        if self.failing {
            return Err(OcrError::Engine {
                status: 1,
                stderr: "falha simulada".to_string(),
            });
        }

        Ok(self
            .by_language
            .get(languages)
            .cloned()
            .unwrap_or_else(|| self.default_text.clone()))
    }

    fn image_to_osd(&self, image: &DynamicImage) -> Result<OsdInfo, OcrError> {
        self.osd_sizes
            .lock()
            .unwrap()
            .push((image.width(), image.height()));

        match &self.osd {
            Some(Ok(script)) if !self.failing => Ok(OsdInfo {
                script: script.clone(),
                script_confidence: 1.0,
                rotate: 0,
            }),
            Some(Err(message)) => Err(OcrError::Osd(message.clone())),
            _ => Err(OcrError::Osd("Too few characters".to_string())),
        }
    }
}

// ============================================================================
// DETECTOR DE IDIOMA
// ============================================================================

pub struct FakeDetector {
    lang: Option<String>,
}

impl FakeDetector {
    pub fn new(lang: Option<&str>) -> Self {
        FakeDetector {
            lang: lang.map(str::to_string),
        }
    }
}

impl LanguageDetector for FakeDetector {
    fn detect(&self, _text: &str) -> Option<String> {
        self.lang.clone()
    }
}

// ============================================================================
// TRADUTOR
// ============================================================================

#[derive(Clone, Copy)]
enum ProviderBehavior {
    Echo,
    Unsupported,
    Failing,
}

/// Provedor de tradução que conta as chamadas
pub struct FakeProvider {
    behavior: ProviderBehavior,
    calls: Arc<AtomicUsize>,
}

impl FakeProvider {
    fn with_behavior(behavior: ProviderBehavior) -> Self {
        FakeProvider {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Devolve "[to] text"
    pub fn echo() -> Self {
        Self::with_behavior(ProviderBehavior::Echo)
    }

    pub fn unsupported() -> Self {
        Self::with_behavior(ProviderBehavior::Unsupported)
    }

    pub fn failing() -> Self {
        Self::with_behavior(ProviderBehavior::Failing)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Contador compartilhado de chamadas (continua válido após o `build`)
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl TranslationProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            ProviderBehavior::Echo => Ok(format!("[{to}] {text}")),
            ProviderBehavior::Unsupported => {
                Err(TranslateError::LanguageNotSupported(format!("{from} → {to}")))
            }
            ProviderBehavior::Failing => Err(TranslateError::Status(500)),
        }
    }
}

// ============================================================================
// CAPTURA
// ============================================================================

/// Captura que devolve sempre o mesmo screenshot (ou falha)
pub struct FakeCapture {
    screenshot: Option<Screenshot>,
    captures: Arc<AtomicUsize>,
}

impl FakeCapture {
    pub fn screen(width: u32, height: u32) -> Self {
        FakeCapture {
            screenshot: Some(Screenshot {
                image: Arc::new(blank_image(width, height)),
                origin_x: 0,
                origin_y: 0,
                scale_factor: 1.0,
            }),
            captures: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        FakeCapture {
            screenshot: None,
            captures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Contador compartilhado de capturas (continua válido após o `build`)
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.captures.clone()
    }
}

impl ScreenCapture for FakeCapture {
    fn capture_screen(&self) -> anyhow::Result<Screenshot> {
        self.captures.fetch_add(1, Ordering::SeqCst);

        match &self.screenshot {
            Some(screenshot) => Ok(screenshot.clone()),
            None => bail!("nenhum monitor disponível"),
        }
    }
}

// ============================================================================
// SESSÃO DE TESTE
// ============================================================================

/// Monta uma `Session` só com fakes
pub struct SessionBuilder {
    config: AppConfig,
    ocr: FakeOcr,
    detected: Option<String>,
    installed: Vec<String>,
    provider: FakeProvider,
    capture: FakeCapture,
}

impl SessionBuilder {
    pub fn new() -> Self {
        SessionBuilder {
            config: AppConfig::default(),
            ocr: FakeOcr::new("hello world"),
            detected: Some("en".to_string()),
            installed: vec!["eng".to_string(), "rus".to_string()],
            provider: FakeProvider::echo(),
            capture: FakeCapture::screen(800, 600),
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ocr(mut self, ocr: FakeOcr) -> Self {
        self.ocr = ocr;
        self
    }

    pub fn detected(mut self, lang: Option<&str>) -> Self {
        self.detected = lang.map(str::to_string);
        self
    }

    /// Pacotes de idioma "instalados" no Tesseract
    pub fn installed(mut self, languages: &[&str]) -> Self {
        self.installed = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn provider(mut self, provider: FakeProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn capture(mut self, capture: FakeCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn build(self) -> Session {
        let catalog = LanguageCatalog::new(self.installed, &self.config.ocr.fallback_language);
        let acquisition = TextAcquisition::new(
            Arc::new(self.ocr),
            Arc::new(FakeDetector {
                lang: self.detected,
            }),
            Arc::new(catalog),
        );
        let translation = TranslationService::new(Arc::new(self.provider), true);

        Session::new(self.config, acquisition, translation, Box::new(self.capture))
    }
}
