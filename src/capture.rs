// screen-lens/src/capture.rs

// ============================================================================
// MÓDULO CAPTURE - Captura de tela
// ============================================================================
//
// Tira o screenshot "congelado" do monitor onde está o cursor. O seletor de
// região mostra essa imagem, recorta a seleção e guarda a tela inteira como
// contexto para a detecção de escrita.
//
// ============================================================================

use anyhow::{Context, Result};
use device_query::{DeviceQuery, DeviceState};
use image::{DynamicImage, ImageBuffer, Rgba};
use screenshots::Screen;
use std::sync::Arc;

/// Screenshot de um monitor inteiro
#[derive(Clone, Debug)]
pub struct Screenshot {
    pub image: Arc<DynamicImage>,
    /// Canto superior esquerdo do monitor na área de trabalho (pixels)
    pub origin_x: i32,
    pub origin_y: i32,
    /// Fator de escala DPI do monitor (ex: 1.25 para 125%)
    pub scale_factor: f32,
}

/// Fonte de screenshots usada pelo controlador
pub trait ScreenCapture: Send + Sync {
    fn capture_screen(&self) -> Result<Screenshot>;
}

/// Captura real usando o crate `screenshots`
#[derive(Debug, Default)]
pub struct ScreenshotsCapture;

impl ScreenshotsCapture {
    /// Monitor sob o cursor (ou o principal, se não der para descobrir)
    fn target_screen() -> Result<Screen> {
        let (x, y) = DeviceState::new().get_mouse().coords;

        match Screen::from_point(x, y) {
            Ok(screen) => Ok(screen),
            Err(e) => {
                warn!("⚠️  Monitor sob o cursor não encontrado ({}), usando o principal", e);
                let screens = Screen::all().context("Falha ao listar monitores")?;
                screens
                    .into_iter()
                    .next()
                    .context("Nenhum monitor encontrado")
            }
        }
    }
}

impl ScreenCapture for ScreenshotsCapture {
    fn capture_screen(&self) -> Result<Screenshot> {
        info!("📸 Capturando tela...");

        let screen = Self::target_screen()?;
        let info = screen.display_info;

        info!(
            "   Monitor: {}x{} em ({}, {}) escala {:.2}",
            info.width, info.height, info.x, info.y, info.scale_factor
        );

        let buffer = screen.capture().context("Falha ao capturar tela")?;
        let image = buffer_to_image(&buffer)?;

        info!("✅ Screenshot capturada em memória!");

        Ok(Screenshot {
            image: Arc::new(image),
            origin_x: info.x,
            origin_y: info.y,
            scale_factor: info.scale_factor,
        })
    }
}

/// Converte o buffer do `screenshots` para DynamicImage
fn buffer_to_image(buffer: &screenshots::Image) -> Result<DynamicImage> {
    let width = buffer.width() as u32;
    let height = buffer.height() as u32;

    let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, buffer.rgba().to_vec())
            .context("Falha ao criar ImageBuffer")?;

    Ok(DynamicImage::ImageRgba8(img_buffer))
}
