use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::handle::Handle;

/// Component keys holding an asset handle end with this suffix
const ASSET_REFERENCE_SUFFIX: &str = "AssetID";

/// One serialized entity: its UUID, optional tag and opaque component blobs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    #[serde(rename = "UUID")]
    pub uuid: u64,
    #[serde(
        rename = "TagComponent",
        default,
        skip_serializing_if = "Option::is_none",
        with = "tag_component"
    )]
    pub tag: Option<String>,
    #[serde(flatten)]
    pub components: Map<String, Value>,
}

impl SceneEntity {
    pub fn new(uuid: u64) -> Self {
        Self {
            uuid,
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn component(&self, name: &str) -> Option<&Value> {
        self.components.get(name)
    }

    pub fn set_component(&mut self, name: impl Into<String>, value: Value) {
        self.components.insert(name.into(), value);
    }

    pub fn remove_component(&mut self, name: &str) -> Option<Value> {
        self.components.remove(name)
    }
}

/// `"TagComponent": { "Tag": "..." }`
mod tag_component {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct TagComponent {
        #[serde(rename = "Tag", default)]
        tag: String,
    }

    pub fn serialize<S: Serializer>(
        tag: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let tag = tag.clone().unwrap_or_default();
        TagComponent { tag }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Some(TagComponent::deserialize(deserializer)?.tag))
    }
}

/// Collect every non-null handle stored under a key ending in `AssetID`
fn collect_references(value: &Value, out: &mut Vec<Handle>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                if key.ends_with(ASSET_REFERENCE_SUFFIX) {
                    if let Some(raw) = value.as_u64().filter(|raw| *raw != 0) {
                        out.push(Handle::from_raw(raw));
                        continue;
                    }
                }
                collect_references(value, out);
            }
        }
        Value::Array(values) => values.iter().for_each(|value| collect_references(value, out)),
        _ => {}
    }
}

fn entity_references<'a>(entities: impl Iterator<Item = &'a SceneEntity>) -> Vec<Handle> {
    let mut handles = Vec::new();
    for entity in entities {
        for component in entity.components.values() {
            collect_references(component, &mut handles);
        }
    }
    handles.sort_unstable();
    handles.dedup();
    handles
}

/// Serialized scene graph
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    name: String,
    entities: Vec<SceneEntity>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
        }
    }

    pub(crate) fn from_entities(name: impl Into<String>, entities: Vec<SceneEntity>) -> Self {
        Self {
            name: name.into(),
            entities,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Create an entity with a fresh UUID
    pub fn create_entity(&mut self, tag: impl Into<String>) -> &mut SceneEntity {
        let uuid = loop {
            let uuid = Handle::generate().raw();
            if self.entity(uuid).is_none() {
                break uuid;
            }
        };
        self.entities.push(SceneEntity::new(uuid).with_tag(tag));
        let last = self.entities.len() - 1;
        &mut self.entities[last]
    }

    pub fn entity(&self, uuid: u64) -> Option<&SceneEntity> {
        self.entities.iter().find(|entity| entity.uuid == uuid)
    }

    pub fn entity_mut(&mut self, uuid: u64) -> Option<&mut SceneEntity> {
        self.entities.iter_mut().find(|entity| entity.uuid == uuid)
    }

    pub fn remove_entity(&mut self, uuid: u64) -> Option<SceneEntity> {
        let index = self.entities.iter().position(|entity| entity.uuid == uuid)?;
        Some(self.entities.remove(index))
    }

    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Handles of assets referenced by component data, sorted and deduplicated
    pub fn asset_references(&self) -> Vec<Handle> {
        entity_references(self.entities.iter())
    }
}

/// Reusable entity hierarchy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prefab {
    entities: Vec<SceneEntity>,
}

impl Prefab {
    pub fn new(entities: Vec<SceneEntity>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut Vec<SceneEntity> {
        &mut self.entities
    }

    /// Root entity, the first one serialized
    pub fn root(&self) -> Option<&SceneEntity> {
        self.entities.first()
    }

    pub fn asset_references(&self) -> Vec<Handle> {
        entity_references(self.entities.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_document_shape() {
        let value = json!({
            "UUID": 77,
            "TagComponent": { "Tag": "Player" },
            "TransformComponent": { "Position": [0.0, 1.0, 0.0] }
        });
        let entity: SceneEntity = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(entity.uuid, 77);
        assert_eq!(entity.tag.as_deref(), Some("Player"));
        assert!(entity.component("TransformComponent").is_some());
        assert_eq!(serde_json::to_value(&entity).unwrap(), value);
    }

    #[test]
    fn test_asset_references_from_nested_components() {
        let mut scene = Scene::new("Main");
        let uuid = scene.create_entity("Cube").uuid;
        let entity = scene.entity_mut(uuid).unwrap();
        entity.set_component(
            "MeshComponent",
            json!({
                "AssetID": 11,
                "Materials": [{ "AssetID": 5 }, { "AssetID": 0 }, { "AssetID": 5 }]
            }),
        );
        entity.set_component("SkyLightComponent", json!({ "EnvMapAssetID": 3 }));

        assert_eq!(
            scene.asset_references(),
            vec![Handle::from_raw(3), Handle::from_raw(5), Handle::from_raw(11)]
        );
    }

    #[test]
    fn test_remove_entity() {
        let mut scene = Scene::new("Main");
        let uuid = scene.create_entity("A").uuid;
        scene.create_entity("B");
        assert!(scene.remove_entity(uuid).is_some());
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.entity(uuid).is_none());
    }
}
