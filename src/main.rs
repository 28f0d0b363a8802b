// screen-lens/src/main.rs

// ============================================================================
// SCREEN LENS - Seleciona uma região da tela, reconhece o texto e traduz
// ============================================================================

#[macro_use]
extern crate log;

// ============================================================================
// DECLARAÇÃO DE MÓDULOS
// ============================================================================
mod cache;
mod capture;
mod config;
mod controller;
mod dispatcher;
mod hotkey;
mod lang_detect;
mod languages;
mod ocr;
mod overlay;
mod runtime;
mod session;
mod translator;

#[cfg(windows)]
mod tray;

#[cfg(test)]
mod testing;

// ============================================================================
// IMPORTS
// ============================================================================
use anyhow::Result;
use config::AppConfig;
use controller::{ControllerHandle, OverlayController};
use dispatcher::UiQueue;
use session::Session;
use std::sync::Arc;

// ============================================================================
// FUNÇÃO PRINCIPAL
// ============================================================================
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🔎 ============================================");
    info!("🔎 SCREEN LENS - OCR e tradução de regiões da tela");
    info!("🔎 ============================================");
    info!("");

    info!("⚙️  Configurando sistema...");

    // Carrega configurações
    let config = AppConfig::load()?;
    let combo = config.hotkeys.enter_selection.clone();

    info!("📋 Configurações:");
    info!("   🔤 OCR: {} (fallback {})", config.ocr.tesseract_cmd, config.ocr.fallback_language);
    info!(
        "   🌐 Tradução: {} (destino padrão: {})",
        config.translation.provider, config.translation.default_target_language
    );
    info!("   ⌨️  Hotkey: {}", combo);
    info!("");

    // Tesseract e provedor de tradução
    let session = match Session::start(config) {
        Ok(session) => session,
        Err(e) => {
            error!("❌ Não foi possível iniciar: {:#}", e);
            error!("   Instale o Tesseract ou defina TESSERACT_CMD / ocr.tesseract_cmd");
            std::process::exit(1);
        }
    };

    // Fila da UI: criada aqui porque esta thread roda o loop do overlay
    let queue = UiQueue::<OverlayController>::new();
    let handle = ControllerHandle::new(queue.handle());

    // Inicia thread de hotkeys
    runtime::hotkeys::start_hotkey_thread(handle.clone(), &combo)?;

    info!("✅ Sistema pronto!");
    info!("");
    info!("🎯 Pressione {} para selecionar uma região", combo);
    #[cfg(windows)]
    info!("🎯 Ou use o ícone da bandeja (Selecionar / Fechar)");
    info!("");

    // ========================================================================
    // INICIA OVERLAY NA MAIN THREAD
    // ========================================================================
    overlay::run(Arc::new(session), queue, handle)
}
