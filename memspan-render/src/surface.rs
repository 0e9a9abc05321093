//! Software text rendering for the task screens.
//!
//! Glyphs are rasterized with `ab_glyph` into a premultiplied `tiny-skia`
//! pixmap sized to the window, which the app then copies into the `pixels`
//! frame buffer verbatim.

use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result, bail};
use memspan_core::TaskView;
use tiny_skia::{Color, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BODY_SIZE: f32 = 32.0;
const SMALL_SIZE: f32 = 22.0;

pub struct TextSurface {
    width: u32,
    height: u32,
    font: FontVec,
    canvas: Pixmap,
}

impl TextSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let font = load_system_font()?;
        let mut canvas = Pixmap::new(width, height).context("allocate canvas pixmap")?;
        canvas.fill(Color::WHITE);
        Ok(Self {
            width,
            height,
            font,
            canvas,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.canvas = Pixmap::new(width, height).context("resize canvas pixmap")?;
        self.canvas.fill(Color::WHITE);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.canvas.fill(Color::WHITE);
    }

    /// Lays a view out the way the task screens do: the memory set spaced
    /// evenly down the middle of the screen, everything else centered.
    pub fn draw_view(&mut self, view: &TaskView) {
        self.clear();
        match view {
            TaskView::Instructions(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    self.draw_centered(line, 60.0 + i as f32 * 34.0, SMALL_SIZE);
                }
            }
            TaskView::StimulusSet(items) => {
                for (item, y) in items.iter().zip(vertical_offsets(self.height, items.len())) {
                    self.draw_centered(item, y, BODY_SIZE);
                }
            }
            TaskView::Blank => {}
            TaskView::Probe(value) => {
                let mid = self.height as f32 / 2.0;
                self.draw_centered(&format!("Probe: {value}"), mid, BODY_SIZE);
            }
            TaskView::Results {
                correct,
                incorrect,
                accuracy,
                mean_rt_s,
            } => {
                let mid = self.height as f32 / 2.0;
                self.draw_centered("Task Results", self.height as f32 / 4.0, BODY_SIZE);
                self.draw_centered(&format!("Correct: {correct}"), mid, BODY_SIZE);
                self.draw_centered(&format!("Incorrect: {incorrect}"), mid + BODY_SIZE, BODY_SIZE);
                self.draw_centered(
                    &format!("Accuracy Rate: {accuracy:.2}%"),
                    mid + 2.0 * BODY_SIZE,
                    BODY_SIZE,
                );
                self.draw_centered(
                    &format!("Average Response Time: {mean_rt_s:.2} seconds"),
                    mid + 3.0 * BODY_SIZE,
                    BODY_SIZE,
                );
            }
        }
    }

    pub fn draw_centered(&mut self, text: &str, center_y: f32, size: f32) {
        if text.is_empty() {
            return;
        }
        let pm = render_text_pixmap(text, size, &self.font, Color::BLACK);
        let x = (self.width as f32 - pm.width() as f32) / 2.0;
        let y = center_y - pm.height() as f32 / 2.0;
        self.canvas.draw_pixmap(
            x as i32,
            y as i32,
            pm.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Copies the premultiplied RGBA canvas into a frame buffer of the same
    /// dimensions. Mismatched sizes (mid-resize) are skipped for a frame.
    pub fn blit(&self, frame: &mut [u8]) {
        let data = self.canvas.data();
        if frame.len() == data.len() {
            frame.copy_from_slice(data);
        }
    }
}

/// Vertical line centers for `count` evenly spaced rows.
fn vertical_offsets(height: u32, count: usize) -> Vec<f32> {
    let slots = count as f32 + 1.0;
    (0..count)
        .map(|i| {
            let h = height as f32;
            i as f32 * (h / slots) + h / (2.0 * slots)
        })
        .collect()
}

fn load_system_font() -> Result<FontVec> {
    for candidate in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(candidate) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Ok(font);
            }
        }
    }
    bail!("no usable system font found (looked at {FONT_CANDIDATES:?})")
}

/// Rasterizes one line of text into a tightly sized premultiplied pixmap.
pub fn render_text_pixmap(text: &str, font_size: f32, font: &FontVec, color: Color) -> Pixmap {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Layout with the baseline at the ascent.
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    // Union of pixel bounds across the outlined glyphs.
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }
    if min_x == f32::INFINITY {
        return Pixmap::new(1, 1).expect("pixmap");
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;

    // Freshly allocated pixmaps are fully transparent.
    let mut pm = Pixmap::new(w, h).expect("pixmap");

    let stride = pm.width() as usize;
    let dst = pm.pixels_mut();
    let cu = [
        (color.red() * 255.0) as u8,
        (color.green() * 255.0) as u8,
        (color.blue() * 255.0) as u8,
        (color.alpha() * 255.0) as u8,
    ];

    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            out.draw(|x, y, cov| {
                if cov <= f32::EPSILON {
                    return;
                }
                let fx = x as f32 + b.min.x - min_x;
                let fy = y as f32 + b.min.y - min_y;
                let ix = fx.floor() as i32;
                let iy = fy.floor() as i32;
                if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                    return;
                }
                let i = iy as usize * stride + ix as usize;
                if i >= dst.len() {
                    return;
                }

                // Premultiply source by coverage times alpha.
                let a_lin = (cov * cu[3] as f32 / 255.0).clamp(0.0, 1.0);
                let sr = (cu[0] as f32 * a_lin) as u8;
                let sg = (cu[1] as f32 * a_lin) as u8;
                let sb = (cu[2] as f32 * a_lin) as u8;
                let sa = (a_lin * 255.0) as u8;

                if let Some(src) = PremultipliedColorU8::from_rgba(sr, sg, sb, sa) {
                    let bg = dst[i];
                    // Porter-Duff over in premultiplied space.
                    let inv = 1.0 - (sa as f32 / 255.0);
                    let r = src.red().saturating_add((bg.red() as f32 * inv) as u8);
                    let g = src.green().saturating_add((bg.green() as f32 * inv) as u8);
                    let b = src.blue().saturating_add((bg.blue() as f32 * inv) as u8);
                    let a = src.alpha().saturating_add((bg.alpha() as f32 * inv) as u8);
                    if let Some(out_px) = PremultipliedColorU8::from_rgba(r, g, b, a) {
                        dst[i] = out_px;
                    }
                }
            });
        }
    }

    pm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_divide_the_screen_evenly() {
        let ys = vertical_offsets(800, 3);
        assert_eq!(ys, vec![100.0, 300.0, 500.0]);
        assert!(vertical_offsets(800, 0).is_empty());
    }
}
