use glam::Vec4;

use crate::handle::Handle;

/// Texture binding of one material slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialTexture {
    /// Built-in white texture
    #[default]
    Placeholder,
    Asset(Handle),
}

impl MaterialTexture {
    /// Handle as written to the material document, 0 for the placeholder
    pub fn handle(self) -> Handle {
        match self {
            MaterialTexture::Placeholder => Handle::NULL,
            MaterialTexture::Asset(handle) => handle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Albedo = 0,
    Roughness = 1,
    Metalness = 2,
    Normal = 3,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Albedo,
        TextureSlot::Roughness,
        TextureSlot::Metalness,
        TextureSlot::Normal,
    ];
}

/// PBR material document
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialAsset {
    name: String,
    albedo_color: Vec4,
    roughness: f32,
    metalness: f32,
    emission: f32,
    use_normal_map: bool,
    textures: [MaterialTexture; 4],
}

impl Default for MaterialAsset {
    fn default() -> Self {
        Self {
            name: String::new(),
            albedo_color: Vec4::ONE,
            roughness: 0.0,
            metalness: 0.0,
            emission: 0.0,
            use_normal_map: false,
            textures: [MaterialTexture::Placeholder; 4],
        }
    }
}

impl MaterialAsset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn albedo_color(&self) -> Vec4 {
        self.albedo_color
    }

    pub fn set_albedo_color(&mut self, color: Vec4) {
        self.albedo_color = color;
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness;
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.metalness = metalness;
    }

    pub fn emission(&self) -> f32 {
        self.emission
    }

    pub fn set_emission(&mut self, emission: f32) {
        self.emission = emission;
    }

    pub fn is_using_normal_map(&self) -> bool {
        self.use_normal_map
    }

    pub fn set_use_normal_map(&mut self, value: bool) {
        self.use_normal_map = value;
    }

    pub fn texture(&self, slot: TextureSlot) -> MaterialTexture {
        self.textures[slot as usize]
    }

    pub fn set_texture(&mut self, slot: TextureSlot, texture: MaterialTexture) {
        self.textures[slot as usize] = texture;
    }

    /// Reset a slot to the placeholder
    pub fn clear_texture(&mut self, slot: TextureSlot) {
        self.set_texture(slot, MaterialTexture::Placeholder);
    }

    /// Texture handles this material depends on
    pub fn texture_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.textures
            .iter()
            .filter_map(|texture| match texture {
                MaterialTexture::Asset(handle) => Some(*handle),
                MaterialTexture::Placeholder => None,
            })
    }
}
