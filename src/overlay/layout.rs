// screen-lens/src/overlay/layout.rs

// ============================================================================
// GEOMETRIA DO OVERLAY DE TRADUÇÃO
// ============================================================================
//
// A janela fica exatamente sobre a região capturada, com o painel de texto
// colado nela:
//
//   modo livro (w/h <= 2)          modo faixa (imagem larga)
//   ┌────────┬──────────┐          ┌──────────────────┐
//   │        │ ferram.  │          │      imagem      │
//   │ imagem ├──────────┤          ├──────────────────┤
//   │        │  texto   │          │   ferramentas    │
//   └────────┴──────────┘          ├──────────────────┤
//                                  │      texto       │
//                                  └──────────────────┘
//
// Todas as medidas em pixels, relativas ao canto da janela.
//
// ============================================================================

use crate::config::OverlayConfig;

/// Altura da barra de ferramentas (modo, idiomas)
pub const TOOLS_PANEL_SIZE: i32 = 20;

const MIN_TEXT_PANEL_SIZE: i32 = 70;
const MAX_TEXT_PANEL_SIZE: i32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PanelRect {
    fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        PanelRect {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }
}

/// Posições de todos os painéis do overlay de tradução
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Texto ao lado da imagem (em vez de embaixo)
    pub book_view: bool,
    /// Imagem pequena: OCR rápido, borda e fonte menores
    pub small: bool,
    pub border_size: i32,
    pub text_panel_size: i32,
    /// Janela na área de trabalho (coordenadas absolutas)
    pub window: PanelRect,
    pub image_panel: PanelRect,
    pub text_panel: PanelRect,
    pub tools_panel: PanelRect,
}

impl PanelLayout {
    pub fn compute(origin_x: i32, origin_y: i32, width: u32, height: u32, config: &OverlayConfig) -> Self {
        let w = width as i32;
        let h = height as i32;

        let book_view = is_book_view(width, height, config.book_view_max_ratio);
        let small = is_small(width, height, config.small_image_threshold);
        let border_size = if small { 2 } else { 4 };

        let text_panel_size = (if book_view { w } else { h })
            .clamp(MIN_TEXT_PANEL_SIZE, MAX_TEXT_PANEL_SIZE);

        let window = if book_view {
            PanelRect::new(origin_x, origin_y, w + text_panel_size - border_size, h)
        } else {
            PanelRect::new(
                origin_x,
                origin_y,
                w,
                h + text_panel_size - border_size + TOOLS_PANEL_SIZE,
            )
        };

        let image_panel = PanelRect::new(0, 0, w, h);

        let (text_panel, tools_panel) = if book_view {
            (
                PanelRect::new(
                    w - border_size,
                    TOOLS_PANEL_SIZE,
                    text_panel_size,
                    h - TOOLS_PANEL_SIZE,
                ),
                PanelRect::new(w - border_size, 0, text_panel_size, TOOLS_PANEL_SIZE),
            )
        } else {
            (
                PanelRect::new(0, h - border_size + TOOLS_PANEL_SIZE, w, text_panel_size),
                PanelRect::new(0, h - border_size, w, TOOLS_PANEL_SIZE),
            )
        };

        PanelLayout {
            book_view,
            small,
            border_size,
            text_panel_size,
            window,
            image_panel,
            text_panel,
            tools_panel,
        }
    }
}

/// Proporção largura/altura dentro do limite do modo livro
pub fn is_book_view(width: u32, height: u32, max_ratio: f32) -> bool {
    width as f32 / height.max(1) as f32 <= max_ratio
}

/// Menor lado abaixo do limite
pub fn is_small(width: u32, height: u32, threshold: u32) -> bool {
    width.min(height) < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: u32, height: u32) -> PanelLayout {
        PanelLayout::compute(100, 50, width, height, &OverlayConfig::default())
    }

    #[test]
    fn aspect_ratio_decides_book_view() {
        assert!(layout(300, 200).book_view);
        assert!(layout(400, 200).book_view);
        assert!(!layout(600, 200).book_view);
    }

    #[test]
    fn small_images_get_thin_border() {
        let small = layout(50, 50);
        assert!(small.small);
        assert_eq!(small.border_size, 2);

        let large = layout(300, 200);
        assert!(!large.small);
        assert_eq!(large.border_size, 4);

        // Basta um lado abaixo do limite
        assert!(layout(800, 99).small);
    }

    #[test]
    fn book_view_puts_text_beside_the_image() {
        let l = layout(300, 200);

        assert_eq!(l.text_panel_size, 300);
        assert_eq!(l.window, PanelRect::new(100, 50, 596, 200));
        assert_eq!(l.image_panel, PanelRect::new(0, 0, 300, 200));
        assert_eq!(l.tools_panel, PanelRect::new(296, 0, 300, 20));
        assert_eq!(l.text_panel, PanelRect::new(296, 20, 300, 180));
    }

    #[test]
    fn wide_images_put_text_below() {
        let l = layout(900, 150);

        assert!(!l.book_view);
        assert_eq!(l.text_panel_size, 150);
        assert_eq!(l.window, PanelRect::new(100, 50, 900, 316));
        assert_eq!(l.tools_panel, PanelRect::new(0, 146, 900, 20));
        assert_eq!(l.text_panel, PanelRect::new(0, 166, 900, 150));
    }

    #[test]
    fn text_panel_size_is_clamped() {
        assert_eq!(layout(1000, 800).text_panel_size, 400);
        assert_eq!(layout(30, 30).text_panel_size, 70);
    }

    #[test]
    fn thresholds_come_from_configuration() {
        let config = OverlayConfig {
            small_image_threshold: 40,
            book_view_max_ratio: 4.0,
        };
        let l = PanelLayout::compute(0, 0, 150, 50, &config);

        assert!(!l.small);
        assert!(l.book_view);
    }
}
