/// Braille canvas for high-resolution terminal rendering
/// Each terminal cell contains a 2×4 grid of Braille dots, so the field
/// gets 2× horizontal and 4× vertical resolution. Every cell also keeps the
/// colour of the last shape drawn into it.
use ratatui::style::Color;

pub struct BrailleCanvas {
    width: usize,  // Width in terminal cells
    height: usize, // Height in terminal cells
    dots: Vec<Vec<u8>>,
    colors: Vec<Vec<Color>>,
    pen: Color,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![vec![0; width]; height],
            colors: vec![vec![Color::White; width]; height],
            pen: Color::White,
        }
    }

    /// Colour for everything drawn after this call
    pub fn set_pen(&mut self, color: Color) {
        self.pen = color;
    }

    /// Set a dot at pixel coordinates
    /// pixel_x: 0 to (width * 2 - 1)
    /// pixel_y: 0 to (height * 4 - 1)
    pub fn set_pixel(&mut self, pixel_x: usize, pixel_y: usize) {
        let cell_x = pixel_x / 2;
        let cell_y = pixel_y / 4;

        if cell_x >= self.width || cell_y >= self.height {
            return;
        }

        // Braille dot numbering:
        // 1 4
        // 2 5
        // 3 6
        // 7 8
        let bit = match (pixel_x % 2, pixel_y % 4) {
            (0, 3) => 6,
            (1, 3) => 7,
            (0, row) => row,
            (_, row) => row + 3,
        };

        self.dots[cell_y][cell_x] |= 1 << bit;
        self.colors[cell_y][cell_x] = self.pen;
    }

    /// Signed variant that silently drops off-canvas points
    fn plot(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn draw_horizontal_line(&mut self, x0: usize, x1: usize, y: usize) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.set_pixel(x, y);
        }
    }

    pub fn draw_vertical_line(&mut self, x: usize, y0: usize, y1: usize) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set_pixel(x, y);
        }
    }

    /// Filled ellipse; radii differ because braille pixels are not square
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let rx = rx.max(0.5);
        let ry = ry.max(0.5);
        let (x0, x1) = ((cx - rx).floor() as i64, (cx + rx).ceil() as i64);
        let (y0, y1) = ((cy - ry).floor() as i64, (cy + ry).ceil() as i64);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x as f32 + 0.5 - cx) / rx;
                let dy = (y as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.plot(x, y);
                }
            }
        }
    }

    /// Ellipse outline
    pub fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let steps = ((rx + ry) * 4.0).max(16.0) as usize;
        for i in 0..steps {
            let angle = i as f32 / steps as f32 * std::f32::consts::TAU;
            let x = cx + rx * angle.cos();
            let y = cy + ry * angle.sin();
            self.plot(x.round() as i64, y.round() as i64);
        }
    }

    /// Convert dot pattern to Braille character
    /// Braille Unicode: U+2800 + dot pattern
    pub fn to_char(&self, cell_x: usize, cell_y: usize) -> char {
        if cell_x >= self.width || cell_y >= self.height {
            return ' ';
        }

        let pattern = self.dots[cell_y][cell_x];
        char::from_u32(0x2800 + pattern as u32).unwrap_or(' ')
    }

    pub fn color_at(&self, cell_x: usize, cell_y: usize) -> Color {
        self.colors
            .get(cell_y)
            .and_then(|row| row.get(cell_x))
            .copied()
            .unwrap_or(Color::White)
    }

    pub fn cell_width(&self) -> usize {
        self.width
    }

    pub fn cell_height(&self) -> usize {
        self.height
    }

    /// Get width in pixels (2 per cell)
    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    /// Get height in pixels (4 per cell)
    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dots() {
        let mut canvas = BrailleCanvas::new(2, 2);

        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_char(0, 0), '⠁'); // dot 1

        canvas.set_pixel(3, 7);
        assert_eq!(canvas.to_char(1, 1), '⢀'); // dot 8

        // off canvas is ignored
        canvas.set_pixel(10, 10);
        assert_eq!(canvas.to_char(5, 5), ' ');
    }

    #[test]
    fn test_lines_fill_cells() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.draw_horizontal_line(0, 3, 0);
        canvas.draw_vertical_line(0, 0, 3);

        assert_eq!(canvas.to_char(0, 0), '⡏');
        assert_eq!(canvas.to_char(1, 0), '⠉');
    }

    #[test]
    fn test_pen_colours_cells() {
        let mut canvas = BrailleCanvas::new(4, 2);
        canvas.set_pen(Color::Red);
        canvas.fill_ellipse(2.0, 2.0, 1.5, 1.5);

        assert_eq!(canvas.color_at(1, 0), Color::Red);
        assert_eq!(canvas.color_at(3, 1), Color::White);
        assert_ne!(canvas.to_char(1, 0), '⠀');
    }
}
