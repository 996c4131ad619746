/// Surface response parameters for the physics engine
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsMaterial {
    pub name: String,
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub bounciness: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            static_friction: 0.6,
            dynamic_friction: 0.6,
            bounciness: 0.6,
        }
    }
}

impl PhysicsMaterial {
    pub fn new(static_friction: f32, dynamic_friction: f32, bounciness: f32) -> Self {
        Self {
            name: String::new(),
            static_friction,
            dynamic_friction,
            bounciness,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
