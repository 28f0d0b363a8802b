// screen-lens/src/lang_detect.rs

// ============================================================================
// MÓDULO LANG DETECT - Detecção do idioma natural do texto reconhecido
// ============================================================================

use crate::languages;

/// Detector de idioma usado pelo pipeline de OCR
pub trait LanguageDetector: Send + Sync {
    /// Retorna o código curto do idioma ("en", "ru"), ou None sem palpite
    fn detect(&self, text: &str) -> Option<String>;
}

/// Detector baseado no `whatlang` (trigramas, roda offline)
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        let code = info.lang().code();

        let short = match languages::short_code_from_iso639_3(code) {
            Some(short) => short,
            None => {
                // Sem código curto conhecido: segue com o ISO 639-3
                debug!("🔤 Idioma {} sem código curto no catálogo", code);
                code
            }
        };

        debug!(
            "🔤 Idioma detectado: {} ({}, confiança {:.2})",
            short,
            code,
            info.confidence()
        );
        Some(short.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_and_russian() {
        let detector = WhatlangDetector;

        let english = "The quick brown fox jumps over the lazy dog while the farmer sleeps";
        assert_eq!(detector.detect(english).as_deref(), Some("en"));

        let russian = "Съешь же ещё этих мягких французских булок, да выпей чаю";
        assert_eq!(detector.detect(russian).as_deref(), Some("ru"));
    }

    #[test]
    fn languages_without_ocr_packs_still_get_a_code() {
        let detector = WhatlangDetector;

        let swedish = "Jag heter Anna och jag bor i Stockholm. Vi har en stor trädgård \
                       och två katter som gillar att sova i solen hela dagen.";
        assert_eq!(detector.detect(swedish).as_deref(), Some("sv"));

        let vietnamese = "Tôi tên là Minh và tôi sống ở Hà Nội. Chúng tôi có một khu vườn \
                          rất đẹp và hai con mèo thích ngủ dưới ánh nắng.";
        assert_eq!(detector.detect(vietnamese).as_deref(), Some("vi"));
    }

    #[test]
    fn no_guess_for_text_without_letters() {
        assert_eq!(WhatlangDetector.detect("12345 67 890"), None);
    }
}
