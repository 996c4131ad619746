//! Animation blueprint graph
//!
//! A blueprint is bound to one mesh. It owns a table of named inputs, a set of
//! nodes exposing typed pins, and links joining an output pin to an input pin.

use glam::{Vec2, Vec4};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::{AssetError, Result};
use crate::handle::Handle;

/// Value type carried by an input or a pin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputType {
    Float,
    Int,
    Bool,
    Animation,
}

impl InputType {
    pub const fn as_str(self) -> &'static str {
        match self {
            InputType::Float => "Float",
            InputType::Int => "Int",
            InputType::Bool => "Bool",
            InputType::Animation => "Animation",
        }
    }

    /// Editor colour used for pins of this type
    pub fn color(self) -> Vec4 {
        match self {
            InputType::Float => Vec4::new(0.5, 0.67, 0.36, 1.0),
            InputType::Int => Vec4::new(0.85, 0.4, 1.0, 1.0),
            InputType::Bool => Vec4::new(1.0, 0.4, 0.53, 1.0),
            InputType::Animation => Vec4::new(0.38, 0.57, 0.91, 1.0),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Float" => Ok(InputType::Float),
            "Int" => Ok(InputType::Int),
            "Bool" => Ok(InputType::Bool),
            "Animation" => Ok(InputType::Animation),
            other => Err(AssetError::DeserializationError(format!(
                "unknown animation input type '{other}'"
            ))),
        }
    }
}

/// Current value of a blueprint input
#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    /// Animation clip of the parent mesh, `None` when the clip is not resolved
    Animation(Option<String>),
}

impl InputValue {
    pub fn input_type(&self) -> InputType {
        match self {
            InputValue::Float(_) => InputType::Float,
            InputValue::Int(_) => InputType::Int,
            InputValue::Bool(_) => InputType::Bool,
            InputValue::Animation(_) => InputType::Animation,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationInput {
    pub name: String,
    pub value: InputValue,
}

impl AnimationInput {
    pub fn input_type(&self) -> InputType {
        self.value.input_type()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Input,
    Output,
    Blend,
    Condition,
}

impl NodeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeType::Input => "Input",
            NodeType::Output => "Output",
            NodeType::Blend => "Blend",
            NodeType::Condition => "Condition",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Input" => Ok(NodeType::Input),
            "Output" => Ok(NodeType::Output),
            "Blend" => Ok(NodeType::Blend),
            "Condition" => Ok(NodeType::Condition),
            other => Err(AssetError::DeserializationError(format!(
                "unknown animation node type '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinKind {
    Input,
    Output,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationPin {
    pub name: String,
    pub handle: Handle,
    pub parent_node: Handle,
    pub pin_type: InputType,
    pub kind: PinKind,
    pub color: Vec4,
}

impl AnimationPin {
    fn new(
        name: &str,
        parent_node: Handle,
        pin_type: InputType,
        kind: PinKind,
        color: Vec4,
    ) -> Self {
        Self {
            name: name.to_string(),
            handle: Handle::generate(),
            parent_node,
            pin_type,
            kind,
            color,
        }
    }

    /// Pins keep the default white unless their role calls for a colour
    pub fn is_colored(&self) -> bool {
        self.color != Vec4::ONE
    }
}

pub type PinList = SmallVec<[AnimationPin; 3]>;

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationNode {
    pub id: Handle,
    pub node_type: NodeType,
    /// Input table entry an `Input` node reads from
    pub input_binding: Option<Handle>,
    pub inputs: PinList,
    pub outputs: PinList,
    /// Position in the node editor grid
    pub position: Vec2,
}

impl AnimationNode {
    fn empty(node_type: NodeType) -> Self {
        Self {
            id: Handle::generate(),
            node_type,
            input_binding: None,
            inputs: PinList::new(),
            outputs: PinList::new(),
            position: Vec2::ZERO,
        }
    }

    fn add_input_pin(&mut self, name: &str, pin_type: InputType, color: Vec4) {
        let pin = AnimationPin::new(name, self.id, pin_type, PinKind::Input, color);
        self.inputs.push(pin);
    }

    fn add_output_pin(&mut self, name: &str, pin_type: InputType, color: Vec4) {
        let pin = AnimationPin::new(name, self.id, pin_type, PinKind::Output, color);
        self.outputs.push(pin);
    }

    /// Final pose sink, one per blueprint
    pub fn output() -> Self {
        let mut node = Self::empty(NodeType::Output);
        node.add_input_pin("Skeleton", InputType::Float, Vec4::new(1.0, 0.38, 0.38, 1.0));
        node.add_input_pin("Pose", InputType::Animation, Vec4::ONE);
        node
    }

    pub fn blend() -> Self {
        let mut node = Self::empty(NodeType::Blend);
        node.add_input_pin("A", InputType::Animation, Vec4::ONE);
        node.add_input_pin("Blend Factor", InputType::Float, Vec4::ONE);
        node.add_input_pin("B", InputType::Animation, Vec4::ONE);
        node.add_output_pin("Pose", InputType::Animation, Vec4::ONE);
        node
    }

    pub fn condition() -> Self {
        let mut node = Self::empty(NodeType::Condition);
        node.add_input_pin("Condition", InputType::Bool, Vec4::ONE);
        node.add_input_pin("True", InputType::Animation, Vec4::new(0.38, 1.0, 0.38, 1.0));
        node.add_input_pin("False", InputType::Animation, Vec4::new(1.0, 0.38, 0.38, 1.0));
        node.add_output_pin("Result", InputType::Animation, Vec4::ONE);
        node
    }

    /// Node exposing one blueprint input through a single output pin
    pub fn input(binding: Handle, input: &AnimationInput) -> Self {
        let mut node = Self::empty(NodeType::Input);
        let input_type = input.input_type();
        node.input_binding = Some(binding);
        node.add_output_pin(&input.name, input_type, input_type.color());
        node
    }

    /// Rebuild a node from persisted parts, re-parenting every pin to `id`
    pub fn from_parts(
        id: Handle,
        node_type: NodeType,
        input_binding: Option<Handle>,
        inputs: impl IntoIterator<Item = AnimationPin>,
        outputs: impl IntoIterator<Item = AnimationPin>,
        position: Vec2,
    ) -> Self {
        let reparent = |kind: PinKind| {
            move |mut pin: AnimationPin| {
                pin.parent_node = id;
                pin.kind = kind;
                pin
            }
        };
        Self {
            id,
            node_type,
            input_binding,
            inputs: inputs.into_iter().map(reparent(PinKind::Input)).collect(),
            outputs: outputs.into_iter().map(reparent(PinKind::Output)).collect(),
            position,
        }
    }

    pub fn pins(&self) -> impl Iterator<Item = &AnimationPin> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn input_pin(&self, name: &str) -> Option<&AnimationPin> {
        self.inputs.iter().find(|pin| pin.name == name)
    }

    pub fn output_pin(&self, name: &str) -> Option<&AnimationPin> {
        self.outputs.iter().find(|pin| pin.name == name)
    }
}

/// Link from an output pin (`A`) to an input pin (`B`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinLink {
    pub link_id: Handle,
    pub node_a: Handle,
    pub pin_a: Handle,
    pub node_b: Handle,
    pub pin_b: Handle,
}

/// Node graph driving a mesh's animation
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationBlueprint {
    mesh: Handle,
    inputs: IndexMap<Handle, AnimationInput>,
    nodes: IndexMap<Handle, AnimationNode>,
    links: Vec<PinLink>,
    output_node: Handle,
}

impl AnimationBlueprint {
    /// New blueprint with an output node and one input per mesh animation clip
    pub fn new(mesh: Handle, animations: &[String]) -> Self {
        let output = AnimationNode::output();
        let output_node = output.id;
        let mut nodes = IndexMap::new();
        nodes.insert(output_node, output);

        let mut blueprint = Self {
            mesh,
            inputs: IndexMap::new(),
            nodes,
            links: Vec::new(),
            output_node,
        };
        for clip in animations {
            blueprint.add_animation_input(clip.clone(), clip.clone());
        }
        blueprint
    }

    /// Assemble a blueprint from persisted parts, checking its references
    pub fn from_parts(
        mesh: Handle,
        inputs: IndexMap<Handle, AnimationInput>,
        nodes: IndexMap<Handle, AnimationNode>,
        links: Vec<PinLink>,
    ) -> Result<Self> {
        let mut outputs = nodes
            .values()
            .filter(|node| node.node_type == NodeType::Output)
            .map(|node| node.id);
        let output_node = match (outputs.next(), outputs.next()) {
            (Some(id), None) => id,
            _ => {
                return Err(AssetError::StructuralMismatch(
                    "blueprint must have exactly one output node".to_string(),
                ))
            }
        };

        for node in nodes.values() {
            if let Some(binding) = node.input_binding {
                if !inputs.contains_key(&binding) {
                    return Err(AssetError::StructuralMismatch(format!(
                        "node {} is bound to unknown input {binding}",
                        node.id
                    )));
                }
            }
        }

        let mut blueprint = Self {
            mesh,
            inputs,
            nodes,
            links: Vec::with_capacity(links.len()),
            output_node,
        };
        for link in links {
            let pin_a = blueprint.pin_on(link.node_a, link.pin_a);
            let pin_b = blueprint.pin_on(link.node_b, link.pin_b);
            if pin_a.is_none() || pin_b.is_none() {
                return Err(AssetError::StructuralMismatch(format!(
                    "link {} references an unknown pin",
                    link.link_id
                )));
            }
            blueprint.links.push(link);
        }
        Ok(blueprint)
    }

    /// Mesh this blueprint is bound to
    pub fn mesh(&self) -> Handle {
        self.mesh
    }

    pub fn inputs(&self) -> &IndexMap<Handle, AnimationInput> {
        &self.inputs
    }

    pub fn input(&self, handle: Handle) -> Option<&AnimationInput> {
        self.inputs.get(&handle)
    }

    pub fn nodes(&self) -> &IndexMap<Handle, AnimationNode> {
        &self.nodes
    }

    pub fn node(&self, id: Handle) -> Option<&AnimationNode> {
        self.nodes.get(&id)
    }

    pub fn output_node(&self) -> Handle {
        self.output_node
    }

    pub fn links(&self) -> &[PinLink] {
        &self.links
    }

    /// Add a Float, Int or Bool input with a zero value
    pub fn add_input(&mut self, name: impl Into<String>, input_type: InputType) -> Result<Handle> {
        let value = match input_type {
            InputType::Float => InputValue::Float(0.0),
            InputType::Int => InputValue::Int(0),
            InputType::Bool => InputValue::Bool(false),
            InputType::Animation => {
                return Err(AssetError::StructuralMismatch(
                    "animation inputs must name a clip".to_string(),
                ))
            }
        };
        Ok(self.push_input(name.into(), value))
    }

    pub fn add_animation_input(
        &mut self,
        name: impl Into<String>,
        clip: impl Into<String>,
    ) -> Handle {
        self.push_input(name.into(), InputValue::Animation(Some(clip.into())))
    }

    fn push_input(&mut self, name: String, value: InputValue) -> Handle {
        let handle = loop {
            let handle = Handle::generate();
            if !self.inputs.contains_key(&handle) {
                break handle;
            }
        };
        self.inputs.insert(handle, AnimationInput { name, value });
        handle
    }

    /// Set every input with this name and type; returns false if none matched
    pub fn set_float_input(&mut self, name: &str, value: f32) -> bool {
        self.set_input(name, InputValue::Float(value))
    }

    pub fn set_int_input(&mut self, name: &str, value: i32) -> bool {
        self.set_input(name, InputValue::Int(value))
    }

    pub fn set_bool_input(&mut self, name: &str, value: bool) -> bool {
        self.set_input(name, InputValue::Bool(value))
    }

    fn set_input(&mut self, name: &str, value: InputValue) -> bool {
        let mut matched = false;
        for input in self.inputs.values_mut() {
            if input.name == name && input.input_type() == value.input_type() {
                input.value = value.clone();
                matched = true;
            }
        }
        matched
    }

    /// Remove an input and every input node bound to it
    pub fn delete_input(&mut self, handle: Handle) -> bool {
        if !self.inputs.contains_key(&handle) {
            return false;
        }
        let bound: Vec<Handle> = self
            .nodes
            .values()
            .filter(|node| node.input_binding == Some(handle))
            .map(|node| node.id)
            .collect();
        for node in bound {
            self.delete_node(node);
        }
        self.inputs.shift_remove(&handle);
        true
    }

    pub fn add_input_node(&mut self, input: Handle) -> Result<Handle> {
        let node = {
            let value = self.inputs.get(&input).ok_or(AssetError::HandleNotFound(input))?;
            AnimationNode::input(input, value)
        };
        tracing::debug!("Added input node {} for input {}", node.id, input);
        Ok(self.push_node(node))
    }

    pub fn add_blend_node(&mut self) -> Handle {
        let node = AnimationNode::blend();
        tracing::debug!("Added blend node {}", node.id);
        self.push_node(node)
    }

    pub fn add_condition_node(&mut self) -> Handle {
        let node = AnimationNode::condition();
        tracing::debug!("Added condition node {}", node.id);
        self.push_node(node)
    }

    fn push_node(&mut self, node: AnimationNode) -> Handle {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Delete a node and every link touching it. The output node cannot be deleted.
    pub fn delete_node(&mut self, id: Handle) -> bool {
        if id == self.output_node || self.nodes.shift_remove(&id).is_none() {
            return false;
        }
        self.links.retain(|link| link.node_a != id && link.node_b != id);
        true
    }

    pub fn set_node_position(&mut self, id: Handle, position: Vec2) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Find a pin anywhere in the graph
    pub fn find_pin(&self, pin: Handle) -> Option<&AnimationPin> {
        self.nodes
            .values()
            .flat_map(AnimationNode::pins)
            .find(|candidate| candidate.handle == pin)
    }

    fn pin_on(&self, node: Handle, pin: Handle) -> Option<&AnimationPin> {
        self.nodes
            .get(&node)?
            .pins()
            .find(|candidate| candidate.handle == pin)
    }

    /// Link an output pin to an input pin of the same type.
    ///
    /// An input pin accepts one link; linking it again replaces the old link.
    pub fn link_pins(&mut self, output_pin: Handle, input_pin: Handle) -> Result<Handle> {
        let source = self.find_pin(output_pin).ok_or(AssetError::HandleNotFound(output_pin))?;
        let target = self.find_pin(input_pin).ok_or(AssetError::HandleNotFound(input_pin))?;

        if source.kind != PinKind::Output || target.kind != PinKind::Input {
            return Err(AssetError::StructuralMismatch(
                "links run from an output pin to an input pin".to_string(),
            ));
        }
        if source.parent_node == target.parent_node {
            return Err(AssetError::StructuralMismatch(
                "cannot link a node to itself".to_string(),
            ));
        }
        if source.pin_type != target.pin_type {
            return Err(AssetError::StructuralMismatch(format!(
                "cannot link {} pin to {} pin",
                source.pin_type, target.pin_type
            )));
        }

        let link = PinLink {
            link_id: Handle::generate(),
            node_a: source.parent_node,
            pin_a: output_pin,
            node_b: target.parent_node,
            pin_b: input_pin,
        };
        self.links.retain(|existing| existing.pin_b != input_pin);
        self.links.push(link);
        Ok(link.link_id)
    }

    pub fn erase_link(&mut self, link_id: Handle) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.link_id != link_id);
        self.links.len() != before
    }

    /// Output pin feeding an input pin, if linked
    pub fn linked_pin(&self, input_pin: Handle) -> Option<Handle> {
        self.links
            .iter()
            .find(|link| link.pin_b == input_pin)
            .map(|link| link.pin_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blueprint() -> AnimationBlueprint {
        AnimationBlueprint::new(Handle::from_raw(10), &["Walk".to_string(), "Run".to_string()])
    }

    #[test]
    fn test_new_blueprint_has_output_and_clip_inputs() {
        let blueprint = blueprint();
        assert_eq!(blueprint.nodes().len(), 1);
        let output = blueprint.node(blueprint.output_node()).unwrap();
        assert_eq!(output.node_type, NodeType::Output);
        assert_eq!(blueprint.inputs().len(), 2);
        assert!(blueprint
            .inputs()
            .values()
            .all(|input| input.input_type() == InputType::Animation));
    }

    #[test]
    fn test_link_pins_checks_direction_and_type() {
        let mut blueprint = blueprint();
        let blend = blueprint.add_blend_node();
        let pose_out = blueprint.node(blend).unwrap().output_pin("Pose").unwrap().handle;
        let output = blueprint.node(blueprint.output_node()).unwrap();
        let pose_in = output.input_pin("Pose").unwrap().handle;
        let skeleton_in = output.input_pin("Skeleton").unwrap().handle;

        assert!(blueprint.link_pins(pose_out, pose_in).is_ok());
        assert_eq!(blueprint.linked_pin(pose_in), Some(pose_out));
        assert!(matches!(
            blueprint.link_pins(pose_out, skeleton_in),
            Err(AssetError::StructuralMismatch(_))
        ));
        assert!(matches!(
            blueprint.link_pins(pose_in, pose_out),
            Err(AssetError::StructuralMismatch(_))
        ));
    }

    #[test]
    fn test_relinking_input_replaces_link() {
        let mut blueprint = blueprint();
        let first = blueprint.add_blend_node();
        let second = blueprint.add_condition_node();
        let pose_in = blueprint
            .node(blueprint.output_node())
            .unwrap()
            .input_pin("Pose")
            .unwrap()
            .handle;
        let first_out = blueprint.node(first).unwrap().outputs[0].handle;
        let second_out = blueprint.node(second).unwrap().outputs[0].handle;

        blueprint.link_pins(first_out, pose_in).unwrap();
        blueprint.link_pins(second_out, pose_in).unwrap();
        assert_eq!(blueprint.links().len(), 1);
        assert_eq!(blueprint.linked_pin(pose_in), Some(second_out));
    }

    #[test]
    fn test_delete_input_cascades_to_nodes_and_links() {
        let mut blueprint = blueprint();
        let speed = blueprint.add_input("Speed", InputType::Float).unwrap();
        let node = blueprint.add_input_node(speed).unwrap();
        let blend = blueprint.add_blend_node();
        let speed_out = blueprint.node(node).unwrap().outputs[0].handle;
        let factor_in = blueprint.node(blend).unwrap().input_pin("Blend Factor").unwrap().handle;
        blueprint.link_pins(speed_out, factor_in).unwrap();

        assert!(blueprint.delete_input(speed));
        assert!(blueprint.node(node).is_none());
        assert!(blueprint.links().is_empty());
        assert!(blueprint.input(speed).is_none());
    }

    #[test]
    fn test_output_node_is_protected() {
        let mut blueprint = blueprint();
        let output = blueprint.output_node();
        assert!(!blueprint.delete_node(output));
        assert!(blueprint.node(output).is_some());
    }

    #[test]
    fn test_set_inputs_by_name() {
        let mut blueprint = blueprint();
        blueprint.add_input("Grounded", InputType::Bool).unwrap();
        assert!(blueprint.set_bool_input("Grounded", true));
        assert!(!blueprint.set_float_input("Grounded", 1.0));
        assert!(blueprint
            .inputs()
            .values()
            .any(|input| input.value == InputValue::Bool(true)));
        assert!(blueprint.add_input("Clip", InputType::Animation).is_err());
    }

    #[test]
    fn test_from_parts_rejects_dangling_link() {
        let blueprint = blueprint();
        let mut links = blueprint.links().to_vec();
        links.push(PinLink {
            link_id: Handle::from_raw(1),
            node_a: blueprint.output_node(),
            pin_a: Handle::from_raw(2),
            node_b: blueprint.output_node(),
            pin_b: Handle::from_raw(3),
        });
        let result = AnimationBlueprint::from_parts(
            blueprint.mesh(),
            blueprint.inputs().clone(),
            blueprint.nodes().clone(),
            links,
        );
        assert!(matches!(result, Err(AssetError::StructuralMismatch(_))));
    }
}
