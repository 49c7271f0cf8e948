use crate::braille::BrailleCanvas;

/// Bresenham line
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Filled circle (land quakes)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Circle outline, midpoint algorithm (threat ring)
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }
    let (mut x, mut y) = (radius, 0);
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Filled square with the given half-size (ocean quakes)
pub fn draw_square(canvas: &mut BrailleCanvas, cx: i32, cy: i32, half: i32) {
    for dy in -half..=half {
        for dx in -half..=half {
            canvas.set_pixel_signed(cx + dx, cy + dy);
        }
    }
}

/// Filled upward triangle (cities)
pub fn draw_triangle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, size: i32) {
    for row in 0..=2 * size {
        let half_width = row / 2;
        let y = cy - size + row;
        for dx in -half_width..=half_width {
            canvas.set_pixel_signed(cx + dx, y);
        }
    }
}

/// Diagonal cross (past-hour quakes)
pub fn draw_cross(canvas: &mut BrailleCanvas, cx: i32, cy: i32, size: i32) {
    draw_line(canvas, cx - size, cy - size, cx + size, cy + size);
    draw_line(canvas, cx - size, cy + size, cx + size, cy - size);
}
