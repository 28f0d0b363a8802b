// screen-lens/src/cache.rs

// ============================================================================
// MÓDULO CACHE - Traduções já feitas, só em memória
// ============================================================================
//
// Alternar o idioma de destino e voltar não deve chamar o provedor de novo.
// Nada é gravado em disco: o cache some quando o processo termina.
//
// ============================================================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Identifica uma tradução: mesmo provedor, mesmo par, mesmo texto
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub provider: String,
    pub from: String,
    pub to: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(provider: &str, from: &str, to: &str, text: &str) -> Self {
        CacheKey {
            provider: provider.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            text: text.to_string(),
        }
    }
}

/// Cache compartilhado entre as threads de trabalho (clones veem as mesmas entradas)
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    entries: Arc<Mutex<HashMap<CacheKey, String>>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, translated: &str) {
        self.entries().insert(key, translated.to_string());
    }

    /// Retorna (entradas, bytes de texto guardados)
    pub fn stats(&self) -> (usize, usize) {
        let entries = self.entries();
        let bytes = entries
            .iter()
            .map(|(key, value)| key.text.len() + value.len())
            .sum();
        (entries.len(), bytes)
    }
}
