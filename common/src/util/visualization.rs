use crate::db::core::RouteDB;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

/// Renders the grid to a PNG: obstacles per layer, layer 0 wires in red,
/// layer 1 wires in blue, vias and pins in white.
pub fn draw_routed_grid(db: &RouteDB, filename: &str, cell_px: u32) {
    let px = cell_px.max(4);
    let w = db.width * px;
    let h = db.height * px;
    let mut img = RgbaImage::from_pixel(w, h, Rgba([20, 20, 20, 255]));

    let center = |x: u32, y: u32| ((x * px + px / 2) as f32, (y * px + px / 2) as f32);

    let obstacle_colors = [Rgba([80, 30, 35, 255]), Rgba([30, 40, 85, 255])];
    for &c in &db.obstacles {
        if c.x >= db.width || c.y >= db.height || c.z >= 2 {
            continue;
        }
        // Layer 1 obstacles are drawn inset so overlapping blockages on
        // both layers stay visible.
        let inset = if c.z == 0 { 0 } else { px / 4 };
        let rect = ImageRect::at((c.x * px + inset) as i32, (c.y * px + inset) as i32)
            .of_size(px - 2 * inset, px - 2 * inset);
        draw_filled_rect_mut(&mut img, rect, obstacle_colors[c.z as usize]);
    }

    let wire_colors = [
        // Layer 0 (horizontal): red
        Rgba([255, 20, 80, 255]),
        // Layer 1 (vertical): blue
        Rgba([0, 110, 255, 255]),
    ];
    for net in &db.nets {
        for seg in net.path.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            if a.z != b.z {
                // Via: white square at the transition point.
                let rect = ImageRect::at(
                    (a.x * px + px / 3) as i32,
                    (a.y * px + px / 3) as i32,
                )
                .of_size(px / 3, px / 3);
                draw_filled_rect_mut(&mut img, rect, Rgba([255, 255, 255, 255]));
                continue;
            }
            let (x1, y1) = center(a.x, a.y);
            let (x2, y2) = center(b.x, b.y);
            draw_line_segment_mut(
                &mut img,
                (x1, y1),
                (x2, y2),
                wire_colors[(a.z as usize).min(1)],
            );
        }
    }

    let pin_color = Rgba([255, 255, 255, 255]);
    for net in &db.nets {
        for &pin in &net.pins {
            let x = pin.x.min(db.width - 1) * px;
            let y = pin.y.min(db.height - 1) * px;
            let rect = ImageRect::at((x + px / 2 - 1) as i32, (y + px / 2 - 1) as i32).of_size(3, 3);
            draw_filled_rect_mut(&mut img, rect, pin_color);
        }
    }

    let _ = img.save(Path::new(filename));
}
