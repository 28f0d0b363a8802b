// screen-lens/src/ocr.rs

// ============================================================================
// MÓDULO OCR - Extração de texto de imagens
// ============================================================================
//
// - `OcrEngine`: ponto de extensão para o motor de OCR (Tesseract em produção)
// - `tesseract`: implementação via linha de comando
// - `pipeline`: estratégia em camadas (escrita → idiomas → OCR → detecção)
//
// ============================================================================

pub mod pipeline;
pub mod tesseract;

use image::DynamicImage;
use thiserror::Error;

pub use pipeline::{TextAcquisition, TextDocument};
pub use tesseract::TesseractEngine;

// ============================================================================
// ERROS
// ============================================================================

/// Falhas do motor de OCR
#[derive(Debug, Error)]
pub enum OcrError {
    /// Binário do Tesseract não encontrado
    #[error("Tesseract não encontrado ({0}). Instale o Tesseract ou configure ocr.tesseract_cmd")]
    EngineMissing(String),

    #[error("falha de E/S ao chamar o OCR: {0}")]
    Io(#[from] std::io::Error),

    #[error("falha ao preparar a imagem para o OCR: {0}")]
    Image(#[from] image::ImageError),

    /// O motor rodou mas terminou com erro
    #[error("OCR falhou (status {status}): {stderr}")]
    Engine { status: i32, stderr: String },

    /// Detecção de escrita impossível (ex: poucos caracteres)
    #[error("detecção de escrita falhou: {0}")]
    Osd(String),
}

// ============================================================================
// RESULTADO DO OSD
// ============================================================================

/// Resultado da detecção de orientação/escrita
#[derive(Debug, Clone, PartialEq)]
pub struct OsdInfo {
    /// Escrita detectada ("Latin", "Cyrillic", ...)
    pub script: String,
    pub script_confidence: f32,
    pub rotate: u32,
}

/// Interpreta a saída do `tesseract --psm 0`:
///
/// ```text
/// Page number: 0
/// Orientation in degrees: 0
/// Rotate: 0
/// Orientation confidence: 2.09
/// Script: Latin
/// Script confidence: 1.67
/// ```
pub fn parse_osd(output: &str) -> Result<OsdInfo, OcrError> {
    let mut script = None;
    let mut script_confidence = 0.0;
    let mut rotate = 0;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "Script" => script = Some(value.to_string()),
            "Script confidence" => script_confidence = value.parse().unwrap_or(0.0),
            "Rotate" => rotate = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    match script {
        Some(script) if !script.is_empty() => Ok(OsdInfo {
            script,
            script_confidence,
            rotate,
        }),
        _ => Err(OcrError::Osd(
            "saída do OSD não contém a escrita".to_string(),
        )),
    }
}

// ============================================================================
// MOTOR DE OCR
// ============================================================================

/// Motor de OCR usado pelo pipeline
///
/// As chamadas são bloqueantes: só devem rodar em threads de trabalho.
pub trait OcrEngine: Send + Sync {
    /// Reconhece o texto usando o conjunto de idiomas ("eng+rus")
    fn image_to_string(&self, image: &DynamicImage, languages: &str) -> Result<String, OcrError>;

    /// Detecta a escrita da imagem
    fn image_to_osd(&self, image: &DynamicImage) -> Result<OsdInfo, OcrError>;
}
