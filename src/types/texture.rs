use std::path::Path;

use crate::error::{AssetError, Result};

/// Pixel format of a decoded texture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Rgba8,
    Rgba32F,
}

/// How the renderer intends to use the texture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageUsage {
    #[default]
    ReadOnly,
    Storage,
}

/// Decode hints passed alongside a texture load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureSpecification {
    pub format: ImageFormat,
    pub usage: ImageUsage,
    pub use_mips: bool,
    pub flip_texture: bool,
}

impl Default for TextureSpecification {
    fn default() -> Self {
        Self {
            format: ImageFormat::Rgba8,
            usage: ImageUsage::ReadOnly,
            use_mips: false,
            flip_texture: true,
        }
    }
}

/// CPU-side 2D texture
#[derive(Clone, Debug, PartialEq)]
pub struct Texture2D {
    width: u32,
    height: u32,
    specification: TextureSpecification,
    pixels: Vec<u8>,
}

impl Texture2D {
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            specification: TextureSpecification::default(),
            pixels,
        }
    }

    /// 1x1 opaque white, substituted for unresolved texture references
    pub fn white() -> Self {
        Self::from_rgba8(1, 1, vec![255; 4])
    }

    /// Decode an image file
    pub fn load(path: &Path, specification: &TextureSpecification) -> Result<Self> {
        let image = image::open(path).map_err(|e| AssetError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let image = if specification.flip_texture {
            image.flipv()
        } else {
            image
        };

        let (width, height, pixels) = match specification.format {
            ImageFormat::Rgba8 => {
                let rgba = image.to_rgba8();
                (rgba.width(), rgba.height(), rgba.into_raw())
            }
            ImageFormat::Rgba32F => {
                let rgba = image.to_rgba32f();
                let (width, height) = (rgba.width(), rgba.height());
                let bytes = rgba
                    .into_raw()
                    .into_iter()
                    .flat_map(f32::to_le_bytes)
                    .collect();
                (width, height, bytes)
            }
        };

        Ok(Self {
            width,
            height,
            specification: *specification,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn specification(&self) -> &TextureSpecification {
        &self.specification
    }

    /// Number of mip levels the renderer should allocate
    pub fn mip_level_count(&self) -> u32 {
        if !self.specification.use_mips {
            return 1;
        }
        32 - self.width.max(self.height).max(1).leading_zeros()
    }
}

/// Environment map, kept as its equirectangular HDR source.
/// Face projection belongs to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureCubeMap {
    width: u32,
    height: u32,
    texels: Vec<f32>,
}

impl TextureCubeMap {
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| AssetError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = image.to_rgba32f();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            texels: rgba.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA texels, row-major
    pub fn texels(&self) -> &[f32] {
        &self.texels
    }
}
