use glam::{Vec2, Vec4};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{expect_payload, read_document, write_document, AssetSerializer, LoadArgs, LoadContext};
use crate::asset::{Asset, AssetData};
use crate::error::{AssetError, Result};
use crate::handle::Handle;
use crate::manager::AssetManager;
use crate::types::{
    AnimationBlueprint, AnimationInput, AnimationNode, AnimationPin, InputType, InputValue,
    MeshAsset, NodeType, PinKind, PinLink,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlueprintDocument {
    mesh_asset: u64,
    #[serde(default)]
    inputs: Vec<InputDocument>,
    #[serde(default)]
    nodes: Vec<NodeDocument>,
    #[serde(default)]
    pin_links: Vec<PinLinkDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InputDocument {
    handle: u64,
    #[serde(rename = "Type")]
    input_type: String,
    name: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NodeDocument {
    handle: u64,
    #[serde(rename = "Type")]
    node_type: String,
    #[serde(default)]
    node_position_in_grid: [f32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_handle: Option<u64>,
    #[serde(default)]
    input_pins: Vec<PinDocument>,
    #[serde(default)]
    output_pins: Vec<PinDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinDocument {
    pin_name: String,
    handle: u64,
    animation_parent_node: u64,
    pin_type: String,
    #[serde(default = "white")]
    pin_color: [f32; 4],
}

fn white() -> [f32; 4] {
    [1.0; 4]
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinLinkDocument {
    #[serde(rename = "LinkID")]
    link_id: u64,
    parent_node_a: u64,
    pin_a: u64,
    parent_node_b: u64,
    pin_b: u64,
}

impl From<&AnimationBlueprint> for BlueprintDocument {
    fn from(blueprint: &AnimationBlueprint) -> Self {
        let inputs = blueprint
            .inputs()
            .iter()
            .map(|(handle, input)| InputDocument {
                handle: handle.raw(),
                input_type: input.input_type().as_str().to_string(),
                name: input.name.clone(),
                data: match &input.value {
                    InputValue::Float(value) => Value::from(*value),
                    InputValue::Int(value) => Value::from(*value),
                    InputValue::Bool(value) => Value::from(*value),
                    InputValue::Animation(clip) => {
                        clip.clone().map(Value::from).unwrap_or(Value::Null)
                    }
                },
            })
            .collect();

        let pin_document = |pin: &AnimationPin| PinDocument {
            pin_name: pin.name.clone(),
            handle: pin.handle.raw(),
            animation_parent_node: pin.parent_node.raw(),
            pin_type: pin.pin_type.as_str().to_string(),
            pin_color: pin.color.to_array(),
        };
        let nodes = blueprint
            .nodes()
            .values()
            .map(|node| {
                let bound_type = node
                    .input_binding
                    .and_then(|binding| blueprint.input(binding))
                    .map(|input| input.input_type().as_str().to_string());
                NodeDocument {
                    handle: node.id.raw(),
                    node_type: node.node_type.as_str().to_string(),
                    node_position_in_grid: node.position.to_array(),
                    input_type: bound_type,
                    input_handle: node.input_binding.map(Handle::raw),
                    input_pins: node.inputs.iter().map(pin_document).collect(),
                    output_pins: node.outputs.iter().map(pin_document).collect(),
                }
            })
            .collect();

        let pin_links = blueprint
            .links()
            .iter()
            .map(|link| PinLinkDocument {
                link_id: link.link_id.raw(),
                parent_node_a: link.node_a.raw(),
                pin_a: link.pin_a.raw(),
                parent_node_b: link.node_b.raw(),
                pin_b: link.pin_b.raw(),
            })
            .collect();

        Self {
            mesh_asset: blueprint.mesh().raw(),
            inputs,
            nodes,
            pin_links,
        }
    }
}

fn parse_input(document: &InputDocument, clips: Option<&[String]>) -> Result<AnimationInput> {
    let input_type: InputType = document.input_type.parse()?;
    let mismatch = || {
        AssetError::DeserializationError(format!(
            "input '{}' has data that is not a {input_type}",
            document.name
        ))
    };

    let value = match input_type {
        InputType::Float => InputValue::Float(document.data.as_f64().ok_or_else(mismatch)? as f32),
        InputType::Int => {
            let value = document.data.as_i64().ok_or_else(mismatch)?;
            InputValue::Int(i32::try_from(value).map_err(|_| mismatch())?)
        }
        InputType::Bool => InputValue::Bool(document.data.as_bool().ok_or_else(mismatch)?),
        InputType::Animation => {
            let clip = document.data.as_str().unwrap_or(&document.name).to_string();
            match clips {
                Some(clips) if !clips.contains(&clip) => {
                    tracing::warn!(
                        "Animation '{}' of input '{}' does not exist in the parent mesh",
                        clip,
                        document.name
                    );
                    InputValue::Animation(None)
                }
                _ => InputValue::Animation(Some(clip)),
            }
        }
    };

    Ok(AnimationInput {
        name: document.name.clone(),
        value,
    })
}

fn parse_pin(document: &PinDocument, kind: PinKind) -> Result<AnimationPin> {
    Ok(AnimationPin {
        name: document.pin_name.clone(),
        handle: Handle::from_raw(document.handle),
        parent_node: Handle::from_raw(document.animation_parent_node),
        pin_type: document.pin_type.parse()?,
        kind,
        color: Vec4::from_array(document.pin_color),
    })
}

fn parse_node(document: &NodeDocument) -> Result<AnimationNode> {
    let node_type: NodeType = document.node_type.parse()?;
    let input_binding = match (node_type, document.input_handle) {
        (NodeType::Input, Some(handle)) => Some(Handle::from_raw(handle)),
        (NodeType::Input, None) => {
            return Err(AssetError::StructuralMismatch(format!(
                "input node {} has no input handle",
                document.handle
            )))
        }
        _ => None,
    };

    let inputs = document
        .input_pins
        .iter()
        .map(|pin| parse_pin(pin, PinKind::Input))
        .collect::<Result<Vec<_>>>()?;
    let outputs = document
        .output_pins
        .iter()
        .map(|pin| parse_pin(pin, PinKind::Output))
        .collect::<Result<Vec<_>>>()?;

    Ok(AnimationNode::from_parts(
        Handle::from_raw(document.handle),
        node_type,
        input_binding,
        inputs,
        outputs,
        Vec2::from_array(document.node_position_in_grid),
    ))
}

fn parent_mesh(ctx: &LoadContext) -> Result<Handle> {
    match ctx.args {
        LoadArgs::ParentMesh(mesh) if mesh.is_non_zero() => Ok(mesh),
        _ => Err(AssetError::StructuralMismatch(format!(
            "animation blueprint '{}' needs a parent mesh",
            ctx.metadata.persisted_path()
        ))),
    }
}

/// Blueprint graphs, bound to exactly one mesh
pub struct AnimationBlueprintSerializer;

impl AssetSerializer for AnimationBlueprintSerializer {
    fn try_load_data(&self, manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let mesh = parent_mesh(ctx)?;
        let document: BlueprintDocument = read_document(&ctx.path)?;
        if document.mesh_asset != mesh.raw() {
            return Err(AssetError::StructuralMismatch(format!(
                "animation blueprint '{}' belongs to mesh {}, not {}",
                ctx.metadata.persisted_path(),
                document.mesh_asset,
                mesh
            )));
        }

        let clips = manager
            .get_or_load_asset_by_handle::<MeshAsset>(mesh, LoadArgs::None)
            .map(|mesh| mesh.read().animations().to_vec());
        if clips.is_none() {
            tracing::warn!(
                "Parent mesh {} of '{}' is not loaded, animation inputs stay unresolved",
                mesh,
                ctx.metadata.persisted_path()
            );
        }

        let mut inputs = IndexMap::new();
        for input in &document.inputs {
            inputs.insert(Handle::from_raw(input.handle), parse_input(input, clips.as_deref())?);
        }
        let mut nodes = IndexMap::new();
        for node in &document.nodes {
            let node = parse_node(node)?;
            nodes.insert(node.id, node);
        }
        let links = document
            .pin_links
            .iter()
            .map(|link| PinLink {
                link_id: Handle::from_raw(link.link_id),
                node_a: Handle::from_raw(link.parent_node_a),
                pin_a: Handle::from_raw(link.pin_a),
                node_b: Handle::from_raw(link.parent_node_b),
                pin_b: Handle::from_raw(link.pin_b),
            })
            .collect();

        let blueprint = AnimationBlueprint::from_parts(mesh, inputs, nodes, links)?;
        Ok(AssetData::AnimationBlueprint(blueprint))
    }

    fn serialize(&self, _manager: &AssetManager, ctx: &LoadContext, asset: &Asset) -> Result<()> {
        let blueprint = expect_payload::<AnimationBlueprint>(asset)?;
        write_document(&ctx.path, &BlueprintDocument::from(blueprint))
    }

    fn create_asset(&self, manager: &AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let mesh = parent_mesh(ctx)?;
        let clips = manager
            .get_asset_by_handle::<MeshAsset>(mesh)
            .map(|mesh| mesh.read().animations().to_vec())
            .unwrap_or_default();
        Ok(AssetData::AnimationBlueprint(AnimationBlueprint::new(mesh, &clips)))
    }
}
