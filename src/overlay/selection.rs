// screen-lens/src/overlay/selection.rs

// ============================================================================
// OVERLAY DE SELEÇÃO - Estado do arrasto sobre o screenshot congelado
// ============================================================================

use eframe::egui;
use std::sync::Arc;

use crate::capture::Screenshot;
use crate::session::{Region, RegionSelection};

/// Seletor de região (coordenadas em pixels do screenshot)
pub struct SelectionOverlay {
    screenshot: Screenshot,
    /// Posição inicial do clique (quando usuário começa a arrastar)
    start_pos: Option<egui::Pos2>,
    /// Posição atual do mouse
    current_pos: Option<egui::Pos2>,
}

impl SelectionOverlay {
    pub fn new(screenshot: Screenshot) -> Self {
        SelectionOverlay {
            screenshot,
            start_pos: None,
            current_pos: None,
        }
    }

    pub fn screenshot(&self) -> &Screenshot {
        &self.screenshot
    }

    pub fn begin_drag(&mut self, pos: egui::Pos2) {
        info!("🖱️  Início da seleção: ({:.0}, {:.0})", pos.x, pos.y);
        self.start_pos = Some(pos);
        self.current_pos = Some(pos);
    }

    pub fn update_drag(&mut self, pos: egui::Pos2) {
        if self.start_pos.is_some() {
            self.current_pos = Some(pos);
        }
    }

    /// Retângulo sendo selecionado
    pub fn current_rect(&self) -> Option<egui::Rect> {
        let start = self.start_pos?;
        let current = self.current_pos?;

        Some(egui::Rect::from_two_pos(start, current))
    }

    /// Termina o arrasto e recorta a região do screenshot
    ///
    /// Retorna `None` para seleções vazias; o seletor continua aberto.
    pub fn finish_drag(&mut self) -> Option<RegionSelection> {
        let rect = self.current_rect();
        self.start_pos = None;
        self.current_pos = None;

        let rect = rect?;
        let image = &self.screenshot.image;
        let (max_w, max_h) = (image.width() as f32, image.height() as f32);

        // Limita à área do screenshot
        let x0 = rect.min.x.clamp(0.0, max_w).floor() as u32;
        let y0 = rect.min.y.clamp(0.0, max_h).floor() as u32;
        let x1 = rect.max.x.clamp(0.0, max_w).ceil() as u32;
        let y1 = rect.max.y.clamp(0.0, max_h).ceil() as u32;

        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);

        if width == 0 || height == 0 {
            info!("⚠️  Seleção vazia, ignorando");
            return None;
        }

        let region = Region {
            x: self.screenshot.origin_x + x0 as i32,
            y: self.screenshot.origin_y + y0 as i32,
            width,
            height,
        };

        info!(
            "✅ Região selecionada: {}x{} na posição ({}, {})",
            region.width, region.height, region.x, region.y
        );

        Some(RegionSelection {
            region,
            image: Arc::new(image.crop_imm(x0, y0, width, height)),
            context: Some(self.screenshot.image.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::blank_image;

    fn overlay() -> SelectionOverlay {
        SelectionOverlay::new(Screenshot {
            image: Arc::new(blank_image(800, 600)),
            origin_x: 1920,
            origin_y: 0,
            scale_factor: 1.0,
        })
    }

    #[test]
    fn drag_crops_region_and_keeps_full_screen_as_context() {
        let mut selector = overlay();
        selector.begin_drag(egui::pos2(300.0, 250.0));
        selector.update_drag(egui::pos2(100.0, 50.0));

        let selection = selector.finish_drag().unwrap();

        assert_eq!(
            selection.region,
            Region { x: 2020, y: 50, width: 200, height: 200 }
        );
        assert_eq!((selection.image.width(), selection.image.height()), (200, 200));
        assert_eq!(selection.context.unwrap().width(), 800);
        assert!(selector.current_rect().is_none());
    }

    #[test]
    fn selection_is_clamped_to_the_screenshot() {
        let mut selector = overlay();
        selector.begin_drag(egui::pos2(-50.0, 500.0));
        selector.update_drag(egui::pos2(100.0, 900.0));

        let selection = selector.finish_drag().unwrap();

        assert_eq!(selection.region.x, 1920);
        assert_eq!((selection.region.width, selection.region.height), (100, 100));
    }

    #[test]
    fn click_without_drag_is_ignored() {
        let mut selector = overlay();
        selector.begin_drag(egui::pos2(10.0, 10.0));

        assert!(selector.finish_drag().is_none());
        assert!(selector.finish_drag().is_none());
    }

    #[test]
    fn moving_without_pressing_does_nothing() {
        let mut selector = overlay();
        selector.update_drag(egui::pos2(10.0, 10.0));
        assert!(selector.current_rect().is_none());
    }
}
