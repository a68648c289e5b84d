//! Field → RGBA raster conversion and PNG encoding.

use fw_field::GridField;

use crate::Gradient;

/// Render `field` as tightly packed RGBA8, one pixel per cell.
///
/// The top image row is the highest grid row, so north (+z) is up.
pub fn render_rgba(field: &GridField, gradient: &Gradient) -> Vec<u8> {
    let (w, h) = (field.width(), field.height());
    let values = field.values();
    let mut out = Vec::with_capacity(w * h * 4);
    for row in (0..h).rev() {
        for v in &values[row * w..(row + 1) * w] {
            out.extend_from_slice(&gradient.sample(*v));
        }
    }
    out
}

/// Encode `field` through `gradient` as a PNG at `path`.
#[cfg(feature = "png")]
pub fn write_png(path: &std::path::Path, field: &GridField, gradient: &Gradient) -> crate::OutputResult<()> {
    let rgba = render_rgba(field, gradient);
    image::save_buffer_with_format(
        path,
        &rgba,
        field.width() as u32,
        field.height() as u32,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}
