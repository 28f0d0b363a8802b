// screen-lens/src/hotkey.rs

// ============================================================================
// MÓDULO HOTKEY - Gerenciamento de hotkeys usando device_query
// ============================================================================
//
// As combinações vêm do config.json no formato "LMeta+LShift+A", com os
// nomes das teclas do device_query.
//
// ============================================================================

use anyhow::{bail, Result};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::thread;
use std::time::Duration;

/// Estrutura que gerencia hotkeys
pub struct HotkeyManager {
    device_state: DeviceState,
    combo: Vec<Keycode>,
}

impl HotkeyManager {
    /// Cria um novo gerenciador para a combinação informada
    pub fn new(combo: &str) -> Result<Self> {
        info!("⌨️  Configurando detecção de teclas ({})...", combo);

        let combo = parse_combo(combo)?;
        let device_state = DeviceState::new();

        info!("✅ Detecção de teclas configurada!");

        Ok(HotkeyManager {
            device_state,
            combo,
        })
    }

    /// Verifica se a combinação está pressionada agora
    pub fn check_hotkey(&self) -> bool {
        let keys = self.device_state.get_keys();
        is_combo_pressed(&self.combo, &keys)
    }

    /// Aguarda a tecla ser solta (para evitar múltiplos triggers)
    pub fn wait_for_key_release(&self) {
        while self.check_hotkey() {
            thread::sleep(Duration::from_millis(50));
        }
    }
}

/// Todas as teclas da combinação estão pressionadas
fn is_combo_pressed(combo: &[Keycode], pressed: &[Keycode]) -> bool {
    !combo.is_empty() && combo.iter().all(|key| pressed.contains(key))
}

/// Converte "LMeta+LShift+A" em teclas
pub fn parse_combo(combo: &str) -> Result<Vec<Keycode>> {
    let mut keys = Vec::new();

    for name in combo.split('+').map(str::trim) {
        if name.is_empty() {
            bail!("Hotkey inválida: '{}'", combo);
        }
        match parse_key(name) {
            Some(key) => keys.push(key),
            None => bail!("Tecla desconhecida na hotkey '{}': '{}'", combo, name),
        }
    }

    Ok(keys)
}

fn parse_key(name: &str) -> Option<Keycode> {
    let key = match name {
        "LShift" => Keycode::LShift,
        "RShift" => Keycode::RShift,
        "LControl" => Keycode::LControl,
        "RControl" => Keycode::RControl,
        "LAlt" => Keycode::LAlt,
        "RAlt" => Keycode::RAlt,
        "LMeta" => Keycode::LMeta,
        "RMeta" => Keycode::RMeta,
        "Space" => Keycode::Space,
        "Escape" => Keycode::Escape,
        "Tab" => Keycode::Tab,
        "Enter" => Keycode::Enter,
        "Insert" => Keycode::Insert,
        "Home" => Keycode::Home,
        "End" => Keycode::End,
        "PageUp" => Keycode::PageUp,
        "PageDown" => Keycode::PageDown,
        "Numpad0" => Keycode::Numpad0,
        "Numpad1" => Keycode::Numpad1,
        "Numpad2" => Keycode::Numpad2,
        "Numpad3" => Keycode::Numpad3,
        "Numpad4" => Keycode::Numpad4,
        "Numpad5" => Keycode::Numpad5,
        "Numpad6" => Keycode::Numpad6,
        "Numpad7" => Keycode::Numpad7,
        "Numpad8" => Keycode::Numpad8,
        "Numpad9" => Keycode::Numpad9,
        "NumpadAdd" => Keycode::NumpadAdd,
        "NumpadSubtract" => Keycode::NumpadSubtract,
        "NumpadMultiply" => Keycode::NumpadMultiply,
        "NumpadDivide" => Keycode::NumpadDivide,
        "F1" => Keycode::F1,
        "F2" => Keycode::F2,
        "F3" => Keycode::F3,
        "F4" => Keycode::F4,
        "F5" => Keycode::F5,
        "F6" => Keycode::F6,
        "F7" => Keycode::F7,
        "F8" => Keycode::F8,
        "F9" => Keycode::F9,
        "F10" => Keycode::F10,
        "F11" => Keycode::F11,
        "F12" => Keycode::F12,
        "Key0" => Keycode::Key0,
        "Key1" => Keycode::Key1,
        "Key2" => Keycode::Key2,
        "Key3" => Keycode::Key3,
        "Key4" => Keycode::Key4,
        "Key5" => Keycode::Key5,
        "Key6" => Keycode::Key6,
        "Key7" => Keycode::Key7,
        "Key8" => Keycode::Key8,
        "Key9" => Keycode::Key9,
        letter if letter.len() == 1 => return parse_letter(letter.chars().next()?),
        _ => return None,
    };
    Some(key)
}

fn parse_letter(c: char) -> Option<Keycode> {
    let key = match c.to_ascii_uppercase() {
        'A' => Keycode::A,
        'B' => Keycode::B,
        'C' => Keycode::C,
        'D' => Keycode::D,
        'E' => Keycode::E,
        'F' => Keycode::F,
        'G' => Keycode::G,
        'H' => Keycode::H,
        'I' => Keycode::I,
        'J' => Keycode::J,
        'K' => Keycode::K,
        'L' => Keycode::L,
        'M' => Keycode::M,
        'N' => Keycode::N,
        'O' => Keycode::O,
        'P' => Keycode::P,
        'Q' => Keycode::Q,
        'R' => Keycode::R,
        'S' => Keycode::S,
        'T' => Keycode::T,
        'U' => Keycode::U,
        'V' => Keycode::V,
        'W' => Keycode::W,
        'X' => Keycode::X,
        'Y' => Keycode::Y,
        'Z' => Keycode::Z,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_combo() {
        let keys = parse_combo("LMeta+LShift+A").unwrap();
        assert_eq!(keys, vec![Keycode::LMeta, Keycode::LShift, Keycode::A]);
    }

    #[test]
    fn accepts_spaces_and_lowercase_letters() {
        let keys = parse_combo("LControl + q").unwrap();
        assert_eq!(keys, vec![Keycode::LControl, Keycode::Q]);
    }

    #[test]
    fn rejects_unknown_or_empty_keys() {
        assert!(parse_combo("LShift+Banana").is_err());
        assert!(parse_combo("LShift+").is_err());
        assert!(parse_combo("").is_err());
    }

    #[test]
    fn combo_needs_every_key_pressed() {
        let combo = parse_combo("LShift+A").unwrap();

        assert!(is_combo_pressed(&combo, &[Keycode::A, Keycode::LShift, Keycode::B]));
        assert!(!is_combo_pressed(&combo, &[Keycode::A]));
        assert!(!is_combo_pressed(&[], &[Keycode::A]));
    }
}
