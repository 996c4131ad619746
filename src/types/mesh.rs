use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AssetError, Result};

/// One drawable part of a mesh
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Submesh {
    pub name: String,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// Imported mesh summary.
///
/// Geometry upload is the renderer's job; the asset keeps the layout it
/// needs to allocate buffers and the animation clips it exposes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshAsset {
    source: PathBuf,
    submeshes: Vec<Submesh>,
    animations: Vec<String>,
}

impl MeshAsset {
    pub fn new(
        source: impl Into<PathBuf>,
        submeshes: Vec<Submesh>,
        animations: Vec<String>,
    ) -> Self {
        Self {
            source: source.into(),
            submeshes,
            animations,
        }
    }

    /// Import a mesh file. Only `.obj` and `.gltf` are decoded here.
    pub fn import(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let mesh = match extension {
            "obj" => {
                let text = read_text(path)?;
                Self::new(path, parse_obj(&text), Vec::new())
            }
            "gltf" => {
                let text = read_text(path)?;
                parse_gltf(path, &text)?
            }
            _ => return Err(AssetError::UnsupportedFormat(path.to_path_buf())),
        };

        if mesh.submeshes.is_empty() {
            return Err(AssetError::DecodeError {
                path: path.to_path_buf(),
                reason: "file contains no geometry".to_string(),
            });
        }
        Ok(mesh)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Names of the animation clips in the source file
    pub fn animations(&self) -> &[String] {
        &self.animations
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.iter().any(|animation| animation == name)
    }

    pub fn vertex_count(&self) -> u32 {
        self.submeshes.iter().map(|submesh| submesh.vertex_count).sum()
    }

    pub fn index_count(&self) -> u32 {
        self.submeshes.iter().map(|submesh| submesh.index_count).sum()
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| AssetError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Wavefront OBJ: one submesh per `o`/`g` group, faces fan-triangulated
fn parse_obj(text: &str) -> Vec<Submesh> {
    let mut submeshes: Vec<Submesh> = Vec::new();
    let mut current = Submesh::default();
    let mut seen_vertices = ahash::AHashSet::new();

    let mut flush = |current: &mut Submesh, seen: &mut ahash::AHashSet<String>| {
        if current.index_count > 0 {
            current.vertex_count = seen.len() as u32;
            submeshes.push(std::mem::take(current));
        }
        seen.clear();
    };

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("o") | Some("g") => {
                flush(&mut current, &mut seen_vertices);
                current.name = tokens.collect::<Vec<_>>().join(" ");
            }
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() < 3 {
                    continue;
                }
                for corner in &corners {
                    seen_vertices.insert((*corner).to_string());
                }
                current.index_count += 3 * (corners.len() as u32 - 2);
            }
            _ => {}
        }
    }
    flush(&mut current, &mut seen_vertices);
    submeshes
}

#[derive(Deserialize)]
struct GltfDocument {
    #[serde(default)]
    accessors: Vec<GltfAccessor>,
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    animations: Vec<GltfAnimation>,
}

#[derive(Deserialize)]
struct GltfAccessor {
    count: u32,
}

#[derive(Deserialize)]
struct GltfMesh {
    #[serde(default)]
    name: Option<String>,
    primitives: Vec<GltfPrimitive>,
}

#[derive(Deserialize)]
struct GltfPrimitive {
    attributes: std::collections::BTreeMap<String, usize>,
    #[serde(default)]
    indices: Option<usize>,
}

#[derive(Deserialize)]
struct GltfAnimation {
    #[serde(default)]
    name: Option<String>,
}

fn parse_gltf(path: &Path, text: &str) -> Result<MeshAsset> {
    let document: GltfDocument = serde_json::from_str(text).map_err(|e| AssetError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let accessor_count = |index: usize| -> Result<u32> {
        document
            .accessors
            .get(index)
            .map(|accessor| accessor.count)
            .ok_or_else(|| AssetError::DecodeError {
                path: path.to_path_buf(),
                reason: format!("accessor {index} out of range"),
            })
    };

    let mut submeshes = Vec::new();
    for (mesh_index, mesh) in document.meshes.iter().enumerate() {
        for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
            let Some(&position) = primitive.attributes.get("POSITION") else {
                continue;
            };
            let vertex_count = accessor_count(position)?;
            let index_count = match primitive.indices {
                Some(indices) => accessor_count(indices)?,
                None => vertex_count,
            };
            let name = mesh
                .name
                .clone()
                .unwrap_or_else(|| format!("mesh_{mesh_index}"));
            submeshes.push(Submesh {
                name: format!("{name}.{primitive_index}"),
                vertex_count,
                index_count,
            });
        }
    }

    let animations = document
        .animations
        .iter()
        .enumerate()
        .map(|(i, animation)| animation.name.clone().unwrap_or_else(|| format!("animation_{i}")))
        .collect();

    Ok(MeshAsset::new(path, submeshes, animations))
}
