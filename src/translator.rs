// screen-lens/src/translator.rs

// ============================================================================
// MÓDULO TRANSLATOR - Tradução do texto reconhecido
// ============================================================================
//
// - `TranslationProvider`: provedor externo (Google Translate por padrão)
// - `TranslationService`: fronteira usada pela UI. Nunca retorna erro:
//   idioma não suportado e falhas do provedor viram textos fixos.
//
// ============================================================================

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::{CacheKey, TranslationCache};
use crate::languages;

/// Texto exibido quando o par de idiomas não é suportado
pub const LANGUAGE_NOT_SUPPORTED: &str = "Language not supported!";

/// Texto exibido quando o provedor falha por qualquer outro motivo
pub const TRANSLATION_FAILED: &str = "Translation failed!";

// ============================================================================
// ERROS
// ============================================================================

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("idioma não suportado: {0}")]
    LanguageNotSupported(String),

    #[error("falha na requisição: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provedor respondeu com status {0}")]
    Status(u16),

    #[error("resposta inválida do provedor: {0}")]
    Parse(String),

    #[error("falha ao criar runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

// ============================================================================
// PROVEDOR
// ============================================================================

/// Provedor externo de tradução (chamada bloqueante, roda em thread de trabalho)
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;

    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError>;
}

// ============================================================================
// GOOGLE TRANSLATE (GRÁTIS, SEM API KEY)
// ============================================================================

const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Provedor Google Translate (endpoint público "gtx")
pub struct GoogleTranslator {
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .context("Falha ao criar cliente HTTP")?;

        Ok(GoogleTranslator { client })
    }

    async fn translate_async(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError> {
        let url = format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            GOOGLE_TRANSLATE_URL,
            source,
            target,
            urlencoding::encode(text)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // O Google responde 400 para códigos de idioma inválidos
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(TranslateError::LanguageNotSupported(format!("{source} → {target}")));
        }

        if !status.is_success() {
            error!("❌ Google Translate erro: {}", status);
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_google_response(&body)
    }
}

impl TranslationProvider for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError> {
        for lang in [from, to] {
            if !languages::is_translator_language(lang) {
                return Err(TranslateError::LanguageNotSupported(lang.to_string()));
            }
        }

        let source = convert_lang_code_to_google(from);
        let target = convert_lang_code_to_google(to);

        info!("🌐 [Google] Traduzindo {} caracteres ({} → {})...", text.len(), source, target);

        // Cada chamada roda na sua própria thread de trabalho
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let translated = runtime.block_on(self.translate_async(text, &source, &target))?;

        info!("✅ [Google] Tradução concluída!");
        Ok(translated)
    }
}

/// Parseia a resposta JSON do Google Translate
/// O formato é um array aninhado: [[["texto traduzido","texto original",...],...],...]
fn parse_google_response(response: &str) -> Result<String, TranslateError> {
    let json: serde_json::Value =
        serde_json::from_str(response).map_err(|e| TranslateError::Parse(e.to_string()))?;

    let translated: String = json
        .get(0)
        .and_then(|sentences| sentences.as_array())
        .map(|sentences| {
            sentences
                .iter()
                .filter_map(|sentence| sentence.get(0).and_then(|text| text.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if translated.is_empty() {
        return Err(TranslateError::Parse(
            "não foi possível extrair a tradução da resposta".to_string(),
        ));
    }

    Ok(translated)
}

/// Converte códigos curtos para o formato do Google
fn convert_lang_code_to_google(lang: &str) -> String {
    match lang.to_uppercase().as_str() {
        "ZH-CN" | "ZH" => "zh-CN".to_string(),
        "ZH-TW" => "zh-TW".to_string(),
        "PT-BR" | "PT-PT" => "pt".to_string(),
        "EN-US" | "EN-GB" => "en".to_string(),
        code => code.to_lowercase(),
    }
}

// ============================================================================
// SERVIÇO DE TRADUÇÃO
// ============================================================================

/// Fronteira de tradução usada pelos overlays
#[derive(Clone)]
pub struct TranslationService {
    provider: Arc<dyn TranslationProvider>,
    cache: Option<TranslationCache>,
}

impl TranslationService {
    pub fn new(provider: Arc<dyn TranslationProvider>, cache_enabled: bool) -> Self {
        TranslationService {
            provider,
            cache: cache_enabled.then(TranslationCache::new),
        }
    }

    /// Traduz `text` de `from` para `to`; nunca falha
    pub fn translate(&self, text: &str, from: &str, to: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let provider = self.provider.name();
        let key = CacheKey::new(provider, from, to, text);

        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            info!("   📦 Cache hit! ({} → {})", from, to);
            return cached;
        }

        match self.provider.translate(text, from, to) {
            Ok(translated) => {
                if let Some(cache) = &self.cache {
                    cache.insert(key, &translated);
                    let (total, bytes) = cache.stats();
                    debug!("   📦 Cache: {} entradas, {} bytes", total, bytes);
                }
                translated
            }
            Err(TranslateError::LanguageNotSupported(pair)) => {
                warn!("⚠️  [{}] Idioma não suportado: {}", provider, pair);
                LANGUAGE_NOT_SUPPORTED.to_string()
            }
            Err(e) => {
                error!("❌ [{}] Erro na tradução: {}", provider, e);
                TRANSLATION_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;

    #[test]
    fn unsupported_pair_returns_sentinel() {
        let provider = Arc::new(FakeProvider::unsupported());
        let service = TranslationService::new(provider, true);

        assert_eq!(service.translate("hello", "en", "xx"), LANGUAGE_NOT_SUPPORTED);
    }

    #[test]
    fn provider_failure_returns_failure_sentinel() {
        let provider = Arc::new(FakeProvider::failing());
        let service = TranslationService::new(provider, true);

        assert_eq!(service.translate("hello", "en", "de"), TRANSLATION_FAILED);
    }

    #[test]
    fn repeated_requests_are_served_from_cache() {
        let provider = Arc::new(FakeProvider::echo());
        let service = TranslationService::new(provider.clone(), true);

        assert_eq!(service.translate("hello", "en", "de"), "[de] hello");
        assert_eq!(service.translate("hello", "en", "de"), "[de] hello");
        assert_eq!(service.translate("hello", "en", "fr"), "[fr] hello");
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let provider = Arc::new(FakeProvider::failing());
        let service = TranslationService::new(provider.clone(), true);

        service.translate("hello", "en", "de");
        service.translate("hello", "en", "de");
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn empty_text_skips_the_provider() {
        let provider = Arc::new(FakeProvider::echo());
        let service = TranslationService::new(provider.clone(), false);

        assert_eq!(service.translate("  \n", "en", "de"), "");
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn google_rejects_unknown_languages_before_any_request() {
        let google = GoogleTranslator::new(Duration::from_secs(1)).unwrap();
        let result = google.translate("hello", "en", "xx");
        assert!(matches!(result, Err(TranslateError::LanguageNotSupported(_))));
    }

    #[test]
    fn parses_nested_google_response() {
        let body = r#"[[["Olá ","Hello ",null,null,10],["mundo","world",null,null,10]],null,"en"]"#;
        assert_eq!(parse_google_response(body).unwrap(), "Olá mundo");

        assert!(matches!(parse_google_response("[]"), Err(TranslateError::Parse(_))));
        assert!(matches!(parse_google_response("oops"), Err(TranslateError::Parse(_))));
    }

    #[test]
    fn converts_codes_to_google_format() {
        assert_eq!(convert_lang_code_to_google("zh-cn"), "zh-CN");
        assert_eq!(convert_lang_code_to_google("PT-BR"), "pt");
        assert_eq!(convert_lang_code_to_google("ru"), "ru");
    }
}
