// screen-lens/src/config.rs

// ============================================================================
// MÓDULO CONFIG - Configurações da aplicação
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuração do OCR (Tesseract)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Executável do Tesseract (nome no PATH ou caminho completo)
    pub tesseract_cmd: String,
    /// Idioma usado quando a escrita detectada não está registrada
    pub fallback_language: String,
    /// Page segmentation mode do reconhecimento de texto
    pub psm: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            tesseract_cmd: "tesseract".to_string(),
            fallback_language: "eng".to_string(),
            psm: 3,
        }
    }
}

/// Estrutura de configuração de tradução
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    /// Provedor de tradução (hoje só "google")
    pub provider: String,
    /// Idioma de destino na primeira sessão (código curto)
    pub default_target_language: String,
    /// Timeout das requisições HTTP em segundos
    pub timeout_secs: u64,
    /// Guarda traduções em memória
    pub cache_enabled: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            provider: "google".to_string(),
            default_target_language: "en".to_string(),
            timeout_secs: 10,
            cache_enabled: true,
        }
    }
}

/// Estrutura de configuração do overlay de tradução
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Abaixo deste tamanho (menor lado, em pixels) a imagem é "pequena":
    /// usa OCR rápido e painel compacto
    pub small_image_threshold: u32,
    /// Proporção largura/altura máxima para o modo livro (texto ao lado)
    pub book_view_max_ratio: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            small_image_threshold: 100,
            book_view_max_ratio: 2.0,
        }
    }
}

/// Estrutura de configuração das hotkeys
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Combinação que abre o seletor de região ("LMeta+LShift+A")
    pub enter_selection: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        HotkeyConfig {
            enter_selection: "LMeta+LShift+A".to_string(),
        }
    }
}

/// Estrutura principal de configuração
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub ocr: OcrConfig,
    pub translation: TranslationConfig,
    pub overlay: OverlayConfig,
    pub hotkeys: HotkeyConfig,
}

impl AppConfig {
    /// Caminho do arquivo de configuração
    const CONFIG_FILE: &'static str = "config.json";

    /// Variável de ambiente que sobrescreve `ocr.tesseract_cmd`
    const TESSERACT_ENV: &'static str = "TESSERACT_CMD";

    /// Carrega configurações do config.json (ou cria um padrão se não existir)
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;

        if let Ok(cmd) = env::var(Self::TESSERACT_ENV) {
            if !cmd.trim().is_empty() {
                info!("   🔧 {} definido: {}", Self::TESSERACT_ENV, cmd);
                config.ocr.tesseract_cmd = cmd;
            }
        }

        Ok(config)
    }

    /// Carrega de um caminho específico, criando o arquivo com valores padrão
    pub fn load_from(path: &Path) -> Result<Self> {
        info!("📋 Carregando configurações...");

        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Falha ao ler {}", path.display()))?;

            let config: AppConfig = serde_json::from_str(&contents)
                .with_context(|| format!("Falha ao parsear {}", path.display()))?;

            info!("✅ Configurações carregadas de {}", path.display());

            Ok(config)
        } else {
            warn!("⚠️  {} não encontrado, criando arquivo padrão...", path.display());
            let config = AppConfig::default();
            config.save_to(path)?;
            info!("✅ {} criado com valores padrão", path.display());
            Ok(config)
        }
    }

    /// Salva configurações no arquivo
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Falha ao serializar configurações")?;

        fs::write(path, json).with_context(|| format!("Falha ao escrever {}", path.display()))?;

        Ok(())
    }

    /// Caminho do config.json (diretório atual)
    pub fn config_path() -> PathBuf {
        PathBuf::from(Self::CONFIG_FILE)
    }
}
