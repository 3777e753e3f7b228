//! CPU baking of the cube's face textures.
//!
//! Faces are drawn onto square tiny-skia pixmaps: a diagonal gradient, an
//! optional centred logo, and a border stroke. All constants are fixed, so the
//! same resolution and logo always bake to the same bytes.

use resvg::usvg::{Options, Tree};
use tiny_skia::{
    BlendMode, Color, ColorU8, FilterQuality, GradientStop, LinearGradient, Paint, PathBuilder,
    Pixmap, PixmapPaint, Point, Rect, SpreadMode, Stroke, Transform,
};

use crate::error::CubeError;

/// `(offset, [r, g, b, a])`, top-left to bottom-right.
pub const GRADIENT_STOPS: [(f32, [u8; 4]); 4] = [
    (0.0, [251, 146, 60, 153]),
    (0.35, [14, 165, 233, 217]),
    (0.65, [56, 189, 248, 230]),
    (1.0, [186, 230, 253, 242]),
];

pub const BORDER_COLOR: [u8; 4] = [56, 189, 248, 230];

/// Border width as a fraction of the face resolution.
pub const PLACEHOLDER_BORDER_RATIO: f32 = 8.0 / 256.0;
pub const LOGO_BORDER_RATIO: f32 = 6.0 / 256.0;

/// Logo box side as a fraction of the face resolution.
pub const LOGO_SIZE_RATIO: f32 = 0.4;
pub const LOGO_OPACITY: f32 = 0.9;

/// SVG logos are rasterised so their longer side has this many pixels.
const SVG_RASTER_PX: f32 = 512.0;

/// A decoded logo, kept premultiplied like every other pixmap.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pixmap: Pixmap,
}

impl LogoImage {
    /// Decodes SVG markup or any raster format the `image` crate understands.
    pub fn decode(bytes: &[u8]) -> Result<Self, CubeError> {
        if looks_like_svg(bytes) {
            Self::from_svg(bytes)
        } else {
            Self::from_raster(bytes)
        }
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn from_svg(bytes: &[u8]) -> Result<Self, CubeError> {
        let tree = Tree::from_data(bytes, &Options::default())
            .map_err(|e| CubeError::LogoDecode(format!("invalid SVG: {e}")))?;
        let size = tree.size();
        let scale = SVG_RASTER_PX / size.width().max(size.height());
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| CubeError::LogoDecode(format!("bad SVG size {width}x{height}")))?;
        pixmap.fill(Color::TRANSPARENT);
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
        Ok(Self { pixmap })
    }

    fn from_raster(bytes: &[u8]) -> Result<Self, CubeError> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| CubeError::LogoDecode(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| CubeError::LogoDecode(format!("bad image size {width}x{height}")))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self { pixmap })
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Gradient and border only; used until the logo arrives.
pub fn bake_placeholder(resolution: u32) -> Result<Pixmap, CubeError> {
    let mut pixmap = gradient_fill(resolution)?;
    stroke_border(&mut pixmap, PLACEHOLDER_BORDER_RATIO)?;
    Ok(pixmap)
}

/// Gradient, logo centred in a box of `LOGO_SIZE_RATIO × resolution`, border.
pub fn bake_face(resolution: u32, logo: &LogoImage) -> Result<Pixmap, CubeError> {
    let mut pixmap = gradient_fill(resolution)?;
    draw_logo(&mut pixmap, logo);
    stroke_border(&mut pixmap, LOGO_BORDER_RATIO)?;
    Ok(pixmap)
}

fn gradient_fill(resolution: u32) -> Result<Pixmap, CubeError> {
    let mut pixmap = Pixmap::new(resolution, resolution)
        .ok_or_else(|| CubeError::Bake(format!("invalid face resolution {resolution}")))?;
    let side = resolution as f32;
    let stops = GRADIENT_STOPS
        .iter()
        .map(|(offset, [r, g, b, a])| GradientStop::new(*offset, Color::from_rgba8(*r, *g, *b, *a)))
        .collect();
    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(side, side),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| CubeError::Bake("degenerate gradient".into()))?;
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    };
    let rect = Rect::from_xywh(0.0, 0.0, side, side)
        .ok_or_else(|| CubeError::Bake("empty face rectangle".into()))?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(pixmap)
}

fn stroke_border(pixmap: &mut Pixmap, width_ratio: f32) -> Result<(), CubeError> {
    let side = pixmap.width() as f32;
    let width = side * width_ratio;
    let inset = width / 2.0;
    let rect = Rect::from_xywh(inset, inset, side - width, side - width)
        .ok_or_else(|| CubeError::Bake(format!("face too small for a {width}px border")))?;
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    let [r, g, b, a] = BORDER_COLOR;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    Ok(())
}

fn draw_logo(pixmap: &mut Pixmap, logo: &LogoImage) {
    let side = pixmap.width() as f32;
    let box_side = side * LOGO_SIZE_RATIO;
    let longest = logo.width().max(logo.height()) as f32;
    if longest <= 0.0 {
        return;
    }
    let scale = box_side / longest;
    let drawn_w = logo.width() as f32 * scale;
    let drawn_h = logo.height() as f32 * scale;
    let paint = PixmapPaint {
        opacity: LOGO_OPACITY,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bicubic,
    };
    let transform = Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        (side - drawn_w) / 2.0,
        (side - drawn_h) / 2.0,
    );
    pixmap.draw_pixmap(0, 0, logo.pixmap.as_ref(), &paint, transform, None);
}

/// Straight (non-premultiplied) RGBA bytes, for writing images.
pub fn to_straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
