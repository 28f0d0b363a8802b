// screen-lens/src/tray.rs

// ============================================================================
// MÓDULO TRAY - Ícone na bandeja do sistema (Windows)
// ============================================================================
//
// Menu com duas entradas:
// - "Selecionar": abre o seletor de região
// - "Fechar":     fecha os overlays e encerra a aplicação
//
// O ícone precisa ser criado na thread da UI (que bombeia as mensagens do
// Windows). Os cliques chegam por `MenuEvent::receiver()` numa thread própria
// e viram comandos no `ControllerHandle`.
//
// ============================================================================

use anyhow::{Context, Result};
use std::thread;
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::controller::ControllerHandle;

const ICON_SIZE: u32 = 32;

/// Cria o ícone da bandeja e a thread que escuta o menu
///
/// O `TrayIcon` devolvido precisa ficar vivo (guardado no app).
pub fn create_tray(handle: ControllerHandle) -> Result<TrayIcon> {
    info!("🧷 Criando ícone na bandeja do sistema...");

    let menu = Menu::new();
    let select_item = MenuItem::new("Selecionar", true, None);
    let close_item = MenuItem::new("Fechar", true, None);

    menu.append(&select_item).context("Falha ao criar menu")?;
    menu.append(&PredefinedMenuItem::separator())
        .context("Falha ao criar menu")?;
    menu.append(&close_item).context("Falha ao criar menu")?;

    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip("Screen Lens")
        .with_icon(build_icon()?)
        .build()
        .context("Falha ao criar ícone da bandeja")?;

    let select_id = select_item.id().clone();
    let close_id = close_item.id().clone();

    thread::Builder::new()
        .name("tray-menu".to_string())
        .spawn(move || {
            let events = MenuEvent::receiver();

            while let Ok(event) = events.recv() {
                if event.id == select_id {
                    info!("🧷 Bandeja: Selecionar");
                    handle.enter_selection();
                } else if event.id == close_id {
                    info!("🧷 Bandeja: Fechar");
                    handle.close_all();
                    handle.quit();
                    break;
                }
            }
        })
        .context("Falha ao criar thread do menu da bandeja")?;

    info!("✅ Ícone da bandeja criado!");
    Ok(tray)
}

/// Ícone simples gerado em memória: quadrado com moldura
fn build_icon() -> Result<Icon> {
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);

    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let border = x < 3 || y < 3 || x >= ICON_SIZE - 3 || y >= ICON_SIZE - 3;
            let pixel = if border {
                [0, 200, 255, 255]
            } else {
                [30, 30, 30, 230]
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).context("Falha ao criar imagem do ícone")
}
