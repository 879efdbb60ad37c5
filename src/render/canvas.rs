use std::{
    fmt::Display,
    io::{BufWriter, Write},
};

use clap::ValueEnum;
use rayon::prelude::*;

use crate::{
    error::{Error, Result},
    math::color::Color,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Ppm,
    Png,
}

impl ImageFormat {
    /// Guesses the format from a file extension, case insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ppm" => Some(Self::Ppm),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Ppm => write!(f, "ppm"),
            ImageFormat::Png => write!(f, "png"),
        }
    }
}

/// Row-major pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn with_color(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; height * width],
        }
    }

    pub fn new(width: usize, height: usize) -> Self {
        Self::with_color(width, height, Color::black())
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.width * y + x)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> Result<Color> {
        Ok(self.pixels[self.index(x, y)?])
    }

    pub fn write_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<()> {
        let index = self.index(x, y)?;
        self.pixels[index] = color;
        Ok(())
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Fills every pixel with `fun(x, y)`, rows in parallel.
    /// `on_row_done` is called once per finished row, from the worker that computed it.
    /// The first error stops the fill.
    pub fn try_fill_rows<F, P>(&mut self, fun: F, on_row_done: P) -> Result<()>
    where
        F: Fn(usize, usize) -> Result<Color> + Sync,
        P: Fn(usize) + Sync,
    {
        if self.width == 0 {
            return Ok(());
        }
        self.pixels
            .par_chunks_mut(self.width)
            .enumerate()
            .try_for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = fun(x, y)?;
                }
                on_row_done(y);
                Ok(())
            })
    }

    pub fn as_u8_rgb(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color.as_scaled_values())
            .collect()
    }

    pub fn save<W: Write>(&self, writer: W, format: ImageFormat) -> Result<()> {
        match format {
            ImageFormat::Ppm => self.save_to_ppm(writer),
            ImageFormat::Png => self.save_to_png(writer),
        }
    }
}

/// saving image in ppm format
impl Canvas {
    const MAX_LINE_LEN: usize = 70;

    fn ppm_header(&self) -> String {
        format!("P3\n{} {}\n255\n", self.width, self.height)
    }

    /// Every row starts on a new line, lines are broken at spaces to stay within 70 chars.
    fn ppm_data(&self) -> String {
        let mut data = String::new();
        if self.width == 0 {
            return data;
        }

        for row in self.pixels.chunks(self.width) {
            let mut line_len = 0;
            for value in row.iter().flat_map(|color| color.as_scaled_values()) {
                let value = value.to_string();
                if line_len > 0 {
                    if line_len + 1 + value.len() > Self::MAX_LINE_LEN {
                        data.push('\n');
                        line_len = 0;
                    } else {
                        data.push(' ');
                        line_len += 1;
                    }
                }
                line_len += value.len();
                data.push_str(&value);
            }
            data.push('\n');
        }
        data
    }

    pub fn to_ppm(&self) -> String {
        self.ppm_header() + &self.ppm_data()
    }

    pub fn save_to_ppm<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        writer.write_all(self.to_ppm().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// saving image in png format
impl Canvas {
    pub fn save_to_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.as_u8_rgb())?;
        writer.finish()?;
        Ok(())
    }
}
