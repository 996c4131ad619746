//! In-memory payloads for every asset type

pub mod animation;
pub mod font;
pub mod material;
pub mod mesh;
pub mod physics_material;
pub mod scene;
pub mod texture;

pub use animation::{
    AnimationBlueprint, AnimationInput, AnimationNode, AnimationPin, InputType, InputValue,
    NodeType, PinKind, PinLink,
};
pub use font::Font;
pub use material::{MaterialAsset, MaterialTexture, TextureSlot};
pub use mesh::{MeshAsset, Submesh};
pub use physics_material::PhysicsMaterial;
pub use scene::{Prefab, Scene, SceneEntity};
pub use texture::{ImageFormat, ImageUsage, Texture2D, TextureCubeMap, TextureSpecification};
