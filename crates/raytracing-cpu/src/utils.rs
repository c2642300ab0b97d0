//! I/O utilities for generated output, shared between command-line driver and test code

use std::{fs::File, io::BufWriter, path::Path};

use scenegraph::renderer::RenderOutput;

pub fn save_png(output: &RenderOutput, output_path: &Path) -> Result<(), png::EncodingError> {
    let file = File::create(output_path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), output.width, output.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_source_gamma(png::ScaledFloat::new(1.0 / 2.2));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(output.as_bytes())?;
    writer.finish()
}
