// screen-lens/src/runtime/hotkeys.rs

// ============================================================================
// THREAD DE HOTKEYS (roda em background)
// ============================================================================

use anyhow::{Context, Result};
use std::thread;
use std::time::Duration;

use crate::controller::ControllerHandle;
use crate::hotkey::{self, HotkeyManager};

/// Inicia a thread que abre o seletor quando a hotkey é pressionada
///
/// A combinação é validada antes da thread subir, então um config.json com
/// tecla inválida falha já na inicialização.
pub fn start_hotkey_thread(handle: ControllerHandle, combo: &str) -> Result<()> {
    hotkey::parse_combo(combo)?;
    let combo = combo.to_string();

    thread::Builder::new()
        .name("hotkeys".to_string())
        .spawn(move || {
            info!("⌨️  Thread de hotkeys iniciada");

            // O DeviceState fica na thread que faz o polling
            let hotkey_manager = match HotkeyManager::new(&combo) {
                Ok(manager) => manager,
                Err(e) => {
                    error!("❌ Hotkey desativada: {:#}", e);
                    return;
                }
            };

            loop {
                if hotkey_manager.check_hotkey() {
                    info!("");
                    info!("🎯 ============================================");
                    info!("🎯 SOLICITANDO ABERTURA DO SELETOR DE REGIÃO");
                    info!("🎯 ============================================");

                    if !handle.enter_selection() {
                        // Fila da UI fechada: a aplicação está encerrando
                        info!("⌨️  Thread de hotkeys encerrada");
                        return;
                    }

                    hotkey_manager.wait_for_key_release();
                }

                thread::sleep(Duration::from_millis(50));
            }
        })
        .context("Falha ao criar thread de hotkeys")?;

    Ok(())
}
