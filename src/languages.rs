// screen-lens/src/languages.rs

// ============================================================================
// MÓDULO LANGUAGES - Catálogo de idiomas (OCR e tradutor)
// ============================================================================
//
// Tabelas estáticas que ligam os dois formatos de código de idioma:
// - curto (ISO 639-1, usado pelo tradutor e pelos seletores): "en", "ru"
// - longo (formato do Tesseract): "eng", "rus", "aze_cyrl"
//
// O `LanguageCatalog` cruza essas tabelas com os idiomas que o Tesseract
// realmente tem instalados.
//
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

/// Pares (curto, longo). A busca curto → longo usa a primeira ocorrência.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("en", "eng"),
    ("ru", "rus"),
    ("be", "bel"),
    ("sr", "srp"),
    ("uk", "ukr"),
    ("mk", "mkd"),
    ("bg", "bul"),
    ("az", "aze"),
    ("uz", "uzb"),
    ("cs", "ces"),
    ("de", "deu"),
    ("fr", "fra"),
    ("es", "spa"),
    ("it", "ita"),
    ("pt", "por"),
    ("pl", "pol"),
    ("nl", "nld"),
    ("tr", "tur"),
    ("el", "ell"),
    ("ar", "ara"),
    ("ja", "jpn"),
    ("ko", "kor"),
    ("zh-CN", "chi_sim"),
    ("zh-TW", "chi_tra"),
];

/// Códigos longos extras que só existem no sentido longo → curto
const LONG_ALIASES: &[(&str, &str)] = &[("aze_cyrl", "az"), ("uzb_cyrl", "uz")];

/// Demais idiomas que o detector reconhece (ISO 639-3 → código curto).
/// Não têm pacote de OCR no catálogo, mas o tradutor aceita.
const DETECTED_ONLY_CODES: &[(&str, &str)] = &[
    ("afr", "af"),
    ("aka", "ak"),
    ("amh", "am"),
    ("ben", "bn"),
    ("cat", "ca"),
    ("dan", "da"),
    ("epo", "eo"),
    ("est", "et"),
    ("fin", "fi"),
    ("guj", "gu"),
    ("heb", "he"),
    ("hin", "hi"),
    ("hrv", "hr"),
    ("hun", "hu"),
    ("hye", "hy"),
    ("ind", "id"),
    ("jav", "jv"),
    ("kan", "kn"),
    ("kat", "ka"),
    ("khm", "km"),
    ("lat", "la"),
    ("lav", "lv"),
    ("lit", "lt"),
    ("mal", "ml"),
    ("mar", "mr"),
    ("mya", "my"),
    ("nep", "ne"),
    ("nob", "no"),
    ("ori", "or"),
    ("pan", "pa"),
    ("pes", "fa"),
    ("ron", "ro"),
    ("sin", "si"),
    ("slk", "sk"),
    ("slv", "sl"),
    ("sna", "sn"),
    ("swe", "sv"),
    ("tam", "ta"),
    ("tel", "te"),
    ("tgl", "tl"),
    ("tha", "th"),
    ("tuk", "tk"),
    ("urd", "ur"),
    ("vie", "vi"),
    ("yid", "yi"),
    ("zul", "zu"),
];

/// Idiomas candidatos por escrita (nomes como o OSD do Tesseract devolve)
const SCRIPT_LANGUAGES: &[(&str, &[&str])] = &[
    (
        "Cyrillic",
        &["rus", "bel", "srp", "ukr", "mkd", "bul", "aze_cyrl", "uzb_cyrl"],
    ),
    (
        "Latin",
        &[
            "eng", "ces", "deu", "fra", "spa", "ita", "por", "pol", "nld", "tur",
        ],
    ),
    ("Greek", &["ell"]),
    ("Arabic", &["ara"]),
    ("Han", &["chi_sim", "chi_tra"]),
    ("Japanese", &["jpn"]),
    ("Hangul", &["kor"]),
];

/// Idiomas aceitos pelo tradutor (códigos curtos, formato do Google)
pub const SUPPORTED_TRANSLATOR_LANGUAGES: &[&str] = &[
    "en", "ru", "be", "sr", "uk", "mk", "bg", "az", "uz", "cs", "de", "fr", "es", "it", "pt", "pl",
    "nl", "tr", "el", "ar", "ja", "ko", "zh-CN", "zh-TW", "af", "ak", "am", "bn", "ca", "da", "eo",
    "et", "fi", "gu", "he", "hi", "hr", "hu", "hy", "id", "jv", "kn", "ka", "km", "la", "lv", "lt",
    "ml", "mr", "my", "ne", "no", "or", "pa", "fa", "ro", "si", "sk", "sl", "sn", "sv", "ta", "te",
    "tl", "th", "tk", "ur", "vi", "yi", "zu",
];

/// Código curto padrão (documento vazio, config compartilhada)
pub const DEFAULT_SHORT_LANGUAGE: &str = "en";

/// Converte código curto → longo ("en" → "eng")
pub fn long_code(short: &str) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(short))
        .map(|(_, l)| *l)
}

/// Converte código longo → curto ("eng" → "en", "aze_cyrl" → "az")
pub fn short_code(long: &str) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(_, l)| *l == long)
        .map(|(s, _)| *s)
        .or_else(|| {
            LONG_ALIASES
                .iter()
                .find(|(l, _)| *l == long)
                .map(|(_, s)| *s)
        })
}

/// Converte um código ISO 639-3 (detector de idioma) para o código curto
pub fn short_code_from_iso639_3(code: &str) -> Option<&'static str> {
    match code {
        // Mandarim aparece como "cmn" no detector
        "cmn" => Some("zh-CN"),
        other => short_code(other).or_else(|| {
            DETECTED_ONLY_CODES
                .iter()
                .find(|(long, _)| *long == other)
                .map(|(_, short)| *short)
        }),
    }
}

/// Verifica se o tradutor aceita o código curto
pub fn is_translator_language(short: &str) -> bool {
    SUPPORTED_TRANSLATOR_LANGUAGES
        .iter()
        .any(|lang| lang.eq_ignore_ascii_case(short))
}

// ============================================================================
// CATÁLOGO (filtrado pelos idiomas instalados)
// ============================================================================

/// Catálogo de idiomas já cruzado com os pacotes do Tesseract instalados
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    supported_ocr: BTreeSet<String>,
    /// Escrita → idiomas suportados (escritas sem nenhum idioma ficam de fora)
    script_languages: BTreeMap<String, Vec<String>>,
    /// Idioma usado quando a escrita detectada não está registrada
    fallback_language: String,
}

impl LanguageCatalog {
    /// Monta o catálogo a partir da lista de idiomas do Tesseract
    pub fn new<I, S>(installed: I, fallback_language: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supported_ocr: BTreeSet<String> = installed
            .into_iter()
            .map(Into::into)
            .filter(|lang| lang != "osd")
            .collect();

        let script_languages = SCRIPT_LANGUAGES
            .iter()
            .filter_map(|(script, langs)| {
                let available: Vec<String> = langs
                    .iter()
                    .filter(|lang| supported_ocr.contains(**lang))
                    .map(|lang| lang.to_string())
                    .collect();

                if available.is_empty() {
                    None
                } else {
                    Some((script.to_string(), available))
                }
            })
            .collect();

        LanguageCatalog {
            supported_ocr,
            script_languages,
            fallback_language: fallback_language.to_string(),
        }
    }

    pub fn is_ocr_supported(&self, long: &str) -> bool {
        self.supported_ocr.contains(long)
    }

    /// Código longo instalado para o código curto ("az" → "aze" ou "aze_cyrl")
    ///
    /// None quando nenhuma variante do idioma está instalada.
    pub fn ocr_code_for(&self, short: &str) -> Option<&'static str> {
        let aliases = LONG_ALIASES
            .iter()
            .filter(|(_, s)| s.eq_ignore_ascii_case(short))
            .map(|(l, _)| *l);

        long_code(short)
            .into_iter()
            .chain(aliases)
            .find(|long| self.is_ocr_supported(long))
    }

    /// Conjunto de idiomas da escrita, no formato do Tesseract ("rus+ukr")
    ///
    /// Escrita desconhecida cai no idioma padrão.
    pub fn script_language_set(&self, script: &str) -> String {
        match self.script_languages.get(script) {
            Some(langs) => langs.join("+"),
            None => self.fallback_language.clone(),
        }
    }

    /// Conjunto composto com todos os idiomas de todas as escritas
    pub fn composite_language_set(&self) -> String {
        let mut seen = BTreeSet::new();
        let langs: Vec<&str> = self
            .script_languages
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|lang| seen.insert(*lang))
            .collect();

        if langs.is_empty() {
            self.fallback_language.clone()
        } else {
            langs.join("+")
        }
    }

    /// Códigos curtos dos idiomas de OCR instalados (para o seletor de origem)
    pub fn source_choices(&self) -> Vec<&'static str> {
        let mut choices: Vec<&'static str> = Vec::new();
        for long in &self.supported_ocr {
            if let Some(short) = short_code(long) {
                if !choices.contains(&short) {
                    choices.push(short);
                }
            }
        }
        choices
    }
}
