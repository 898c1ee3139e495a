//! Draws category-colored detection boxes and labels onto a copy of the
//! source image.

pub mod font;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::categorizer::{EnrichedDetection, WasteCategory};

/// Integer multiple applied to the 5x7 label font.
pub const LABEL_SCALE: u32 = 2;
/// Padding between label text and its background, in pixels.
pub const LABEL_PADDING: u32 = 2;

/// Colors (RGB) and stroke width used by [`annotate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    #[serde(default = "default_recyclable_color")]
    pub recyclable_color: [u8; 3],
    #[serde(default = "default_biodegradable_color")]
    pub biodegradable_color: [u8; 3],
    #[serde(default = "default_non_recyclable_color")]
    pub non_recyclable_color: [u8; 3],
    #[serde(default = "default_text_color")]
    pub text_color: [u8; 3],
    #[serde(default = "default_box_thickness")]
    pub box_thickness: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            recyclable_color: default_recyclable_color(),
            biodegradable_color: default_biodegradable_color(),
            non_recyclable_color: default_non_recyclable_color(),
            text_color: default_text_color(),
            box_thickness: default_box_thickness(),
        }
    }
}

impl AnnotationStyle {
    pub fn color_for(&self, category: WasteCategory) -> Rgb<u8> {
        match category {
            WasteCategory::Recyclable => Rgb(self.recyclable_color),
            WasteCategory::Biodegradable => Rgb(self.biodegradable_color),
            WasteCategory::NonRecyclable => Rgb(self.non_recyclable_color),
        }
    }
}

fn default_recyclable_color() -> [u8; 3] {
    [0, 255, 0]
}

fn default_biodegradable_color() -> [u8; 3] {
    [255, 165, 0]
}

fn default_non_recyclable_color() -> [u8; 3] {
    [255, 0, 0]
}

fn default_text_color() -> [u8; 3] {
    [255, 255, 255]
}

fn default_box_thickness() -> u32 {
    2
}

/// Label drawn above each box, e.g. `PLASTIC (87.3%)`.
pub fn label_for(detection: &EnrichedDetection) -> String {
    format!(
        "{} ({:.1}%)",
        detection.class_name,
        detection.confidence * 100.0
    )
}

/// Renders `detections` in order onto a copy of `image` using the default
/// style. The input image is never modified.
pub fn annotate(image: &RgbImage, detections: &[EnrichedDetection]) -> RgbImage {
    annotate_with_style(image, detections, &AnnotationStyle::default())
}

pub fn annotate_with_style(
    image: &RgbImage,
    detections: &[EnrichedDetection],
    style: &AnnotationStyle,
) -> RgbImage {
    let mut canvas = image.clone();
    if canvas.width() == 0 || canvas.height() == 0 {
        return canvas;
    }

    for detection in detections {
        let color = style.color_for(detection.waste_category);
        let bbox = detection.bbox;
        // `as` truncates toward zero and saturates; NaN becomes 0.
        let (ax, bx) = (bbox.x1 as i64, bbox.x2 as i64);
        let (ay, by) = (bbox.y1 as i64, bbox.y2 as i64);
        let (x1, x2) = (ax.min(bx), ax.max(bx));
        let (y1, y2) = (ay.min(by), ay.max(by));

        draw_box(&mut canvas, (x1, y1, x2, y2), style.box_thickness, color);
        draw_label(
            &mut canvas,
            &label_for(detection),
            x1,
            y1,
            color,
            Rgb(style.text_color),
        );
    }

    canvas
}

fn draw_box(canvas: &mut RgbImage, rect: (i64, i64, i64, i64), thickness: u32, color: Rgb<u8>) {
    let (x1, y1, x2, y2) = rect;
    let t = thickness.max(1) as i64 - 1;

    fill_rect(canvas, x1, y1, x2, y1.saturating_add(t), color);
    fill_rect(canvas, x1, y2.saturating_sub(t), x2, y2, color);
    fill_rect(canvas, x1, y1, x1.saturating_add(t), y2, color);
    fill_rect(canvas, x2.saturating_sub(t), y1, x2, y2, color);
}

fn draw_label(
    canvas: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    background: Rgb<u8>,
    foreground: Rgb<u8>,
) {
    let (text_width, text_height) = font::text_size(text, LABEL_SCALE);
    let label_width = (text_width + 2 * LABEL_PADDING) as i64;
    let label_height = (text_height + 2 * LABEL_PADDING) as i64;
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);

    // Sits above the box; falls inside the box when there is no room above.
    let mut top = y.saturating_sub(label_height);
    if top < 0 {
        top = y;
    }
    let top = top.clamp(0, (height - label_height).max(0));
    let left = x.clamp(0, (width - label_width).max(0));

    fill_rect(
        canvas,
        left,
        top,
        left + label_width - 1,
        top + label_height - 1,
        background,
    );
    font::draw_text(
        canvas,
        text,
        left + LABEL_PADDING as i64,
        top + LABEL_PADDING as i64,
        LABEL_SCALE,
        foreground,
    );
}

/// Fills the inclusive rectangle, clipped to the canvas.
fn fill_rect(canvas: &mut RgbImage, x1: i64, y1: i64, x2: i64, y2: i64, color: Rgb<u8>) {
    let max_x = canvas.width() as i64 - 1;
    let max_y = canvas.height() as i64 - 1;
    let (x1, x2) = (x1.max(0), x2.min(max_x));
    let (y1, y2) = (y1.max(0), y2.min(max_y));
    if x1 > x2 || y1 > y2 {
        return;
    }

    for y in y1..=y2 {
        for x in x1..=x2 {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}
