use editor_assets::{
    AssetError, AssetManager, AssetType, Handle, LoadArgs, MaterialAsset, MaterialTexture,
    MeshAsset, PhysicsMaterial, Project, ProjectContext, Result, Scene, TextureSlot,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Field order matters: the manager flushes its index on drop, before the
// directory is removed.
struct Fixture {
    manager: AssetManager,
    _dir: TempDir,
}

impl Fixture {
    fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let assets = dir.path().join("Assets");
        fs::create_dir_all(&assets)?;
        let mut manager = AssetManager::new(&assets, dir.path().join("Assets/AssetRegistry.fr"));
        manager.init()?;
        Ok(Self { manager, _dir: dir })
    }

    fn asset_path(&self, relative: &str) -> PathBuf {
        self.manager.asset_directory().join(relative)
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.asset_path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn registry_json(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.manager.registry_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    fn reopen(&mut self) -> Result<()> {
        self.manager.shutdown()?;
        self.manager.init()
    }
}

#[test]
fn create_new_material_registers_and_writes_file() -> Result<()> {
    let mut fx = Fixture::new()?;
    let manager = &mut fx.manager;

    let red = manager.create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
    assert!(red.handle().is_non_zero());
    assert!(manager.asset_directory().join("Materials/Red.fmat").exists());

    let entries = manager.registry().iter().collect::<Vec<_>>();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].handle, red.handle());
    assert_eq!(entries[0].asset_type, AssetType::Material);
    assert_eq!(entries[0].file_path, Path::new("Materials/Red.fmat"));

    let text = fs::read_to_string(manager.registry_path())?;
    let index: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(index[0]["Handle"], red.handle().raw());
    assert_eq!(index[0]["FilePath"], "Materials/Red.fmat");
    assert_eq!(index[0]["Type"], "Material");
    Ok(())
}

#[test]
fn create_at_existing_path_reuses_asset() -> Result<()> {
    let mut fx = Fixture::new()?;
    let first = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
    let second = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
    assert!(first.ptr_eq(&second));
    assert_eq!(fx.manager.registry().count(), 1);

    let clash = fx
        .manager
        .create_new_asset::<PhysicsMaterial>("Materials/Red.fmat", LoadArgs::None);
    assert!(matches!(clash, Err(AssetError::TypeMismatch { .. })));
    Ok(())
}

#[test]
fn index_round_trip_through_disk() -> Result<()> {
    let mut fx = Fixture::new()?;
    let red = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?
        .handle();
    let ice = fx
        .manager
        .create_new_asset::<PhysicsMaterial>("Physics/Ice.fpm", LoadArgs::None)?
        .handle();
    let main = fx
        .manager
        .create_new_asset::<Scene>("Scenes/Main.fsc", LoadArgs::None)?
        .handle();
    fs::remove_file(fx.asset_path("Scenes/Main.fsc"))?;

    fx.reopen()?;

    let mut triples: Vec<(Handle, PathBuf, AssetType)> = fx
        .manager
        .registry()
        .iter()
        .map(|m| (m.handle, m.file_path.clone(), m.asset_type))
        .collect();
    triples.sort();
    let mut expected = vec![
        (red, PathBuf::from("Materials/Red.fmat"), AssetType::Material),
        (ice, PathBuf::from("Physics/Ice.fpm"), AssetType::PhysicsMat),
    ];
    expected.sort();
    assert_eq!(triples, expected);
    assert!(!fx.manager.is_asset_handle_valid(main));
    Ok(())
}

#[test]
fn index_file_is_sorted_by_handle() -> Result<()> {
    let mut fx = Fixture::new()?;
    for name in ["a", "b", "c", "d"] {
        fx.manager
            .create_new_asset::<MaterialAsset>(format!("{name}.fmat"), LoadArgs::None)?;
    }
    let index = fx.registry_json();
    let handles: Vec<u64> = index
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["Handle"].as_u64().unwrap())
        .collect();
    let mut sorted = handles.clone();
    sorted.sort_unstable();
    assert_eq!(handles, sorted);
    Ok(())
}

#[test]
fn repeated_load_returns_same_instance_without_reading() -> Result<()> {
    let mut fx = Fixture::new()?;
    fx.write(
        "Physics/Ice.fpm",
        r#"{ "StaticFriction": 0.05, "DynamicFriction": 0.02, "Bounciness": 0.1 }"#,
    );
    let handle = fx.manager.import_asset("Physics/Ice.fpm")?;

    let first = fx
        .manager
        .get_or_load_asset::<PhysicsMaterial>("Physics/Ice.fpm", LoadArgs::None)
        .unwrap();
    assert_eq!(first.read().static_friction, 0.05);
    assert_eq!(first.read().name, "Ice");

    fs::remove_file(fx.asset_path("Physics/Ice.fpm"))?;
    let second = fx
        .manager
        .get_or_load_asset_by_handle::<PhysicsMaterial>(handle, LoadArgs::None)
        .unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(fx.manager.cache_stats().total_loads, 1);
    Ok(())
}

#[test]
fn load_of_wrong_type_or_unknown_path_is_none() -> Result<()> {
    let mut fx = Fixture::new()?;
    fx.manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;

    assert!(fx
        .manager
        .get_or_load_asset::<Scene>("Materials/Red.fmat", LoadArgs::None)
        .is_none());
    assert!(fx
        .manager
        .get_or_load_asset::<MaterialAsset>("Materials/Blue.fmat", LoadArgs::None)
        .is_none());
    assert!(!fx.manager.registry().contains("Materials/Blue.fmat"));
    Ok(())
}

#[test]
fn rename_preserves_identity() -> Result<()> {
    let mut fx = Fixture::new()?;
    let material = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
    let handle = material.handle();

    fs::rename(fx.asset_path("Materials/Red.fmat"), fx.asset_path("Materials/Crimson.fmat"))?;
    fx.manager.on_rename_asset("Materials/Red.fmat", "Crimson")?;

    assert!(fx.manager.get_metadata_by_path("Materials/Red.fmat").is_none());
    let renamed = fx.manager.get_metadata_by_path("Materials/Crimson.fmat").unwrap();
    assert_eq!(renamed.handle, handle);
    assert_eq!(
        fx.manager.get_metadata(handle).unwrap().file_path,
        Path::new("Materials/Crimson.fmat")
    );
    assert_eq!(material.read().name(), "Crimson");
    assert_eq!(fx.registry_json()[0]["FilePath"], "Materials/Crimson.fmat");
    Ok(())
}

#[test]
fn rename_onto_registered_path_evicts_replaced_asset() -> Result<()> {
    let mut fx = Fixture::new()?;
    let a = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/A.fmat", LoadArgs::None)?
        .handle();
    let b = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/B.fmat", LoadArgs::None)?
        .handle();

    fs::rename(fx.asset_path("Materials/A.fmat"), fx.asset_path("Materials/B.fmat"))?;
    fx.manager.on_rename_asset("Materials/A.fmat", "B")?;

    assert!(fx.manager.is_asset_handle_valid(a));
    assert!(!fx.manager.is_asset_handle_valid(b));
    assert!(!fx.manager.is_asset_loaded(b));
    assert_eq!(fx.manager.asset_handle_from_file_path("Materials/B.fmat"), a);
    assert_eq!(fx.manager.registry().count(), 1);
    assert_eq!(fx.manager.loaded_assets_of_type::<MaterialAsset>().len(), 1);
    Ok(())
}

#[test]
fn directory_move_onto_registered_paths_evicts_replaced_assets() -> Result<()> {
    let mut fx = Fixture::new()?;
    let moved = fx
        .manager
        .create_new_asset::<Scene>("Old/Main.fsc", LoadArgs::None)?
        .handle();
    let replaced = fx
        .manager
        .create_new_asset::<Scene>("New/Main.fsc", LoadArgs::None)?
        .handle();

    fs::remove_dir_all(fx.asset_path("New"))?;
    fs::rename(fx.asset_path("Old"), fx.asset_path("New"))?;
    assert_eq!(fx.manager.on_move_filepath("Old", "New")?, 1);

    assert_eq!(fx.manager.asset_handle_from_file_path("New/Main.fsc"), moved);
    assert!(fx.manager.get_metadata(replaced).is_none());
    assert!(!fx.manager.is_asset_loaded(replaced));
    assert!(fx.manager.is_asset_loaded(moved));
    Ok(())
}

#[test]
fn single_file_move_preserves_identity() -> Result<()> {
    let mut fx = Fixture::new()?;
    let handle = fx
        .manager
        .create_new_asset::<Scene>("Main.fsc", LoadArgs::None)?
        .handle();

    fs::create_dir_all(fx.asset_path("Scenes"))?;
    fs::rename(fx.asset_path("Main.fsc"), fx.asset_path("Scenes/Main.fsc"))?;
    fx.manager.on_move_asset("Main.fsc", "Scenes/Main.fsc")?;
    assert_eq!(fx.manager.asset_handle_from_file_path("Scenes/Main.fsc"), handle);
    assert_eq!(fx.manager.asset_handle_from_file_path("Main.fsc"), Handle::NULL);
    assert!(matches!(
        fx.manager.on_move_asset("Gone.fsc", "Elsewhere.fsc"),
        Err(AssetError::AssetNotFound(_))
    ));
    Ok(())
}

#[test]
fn directory_move_relocates_subtree() -> Result<()> {
    let mut fx = Fixture::new()?;
    let a = fx
        .manager
        .create_new_asset::<MaterialAsset>("dir/a.fmat", LoadArgs::None)?
        .handle();
    let b = fx
        .manager
        .create_new_asset::<MaterialAsset>("dir/sub/b.fmat", LoadArgs::None)?
        .handle();
    let other = fx
        .manager
        .create_new_asset::<MaterialAsset>("dirt/c.fmat", LoadArgs::None)?
        .handle();

    fs::rename(fx.asset_path("dir"), fx.asset_path("dir2"))?;
    let moved = fx.manager.on_move_filepath("dir", "dir2")?;
    assert_eq!(moved, 2);
    assert_eq!(fx.manager.asset_handle_from_file_path("dir2/a.fmat"), a);
    assert_eq!(fx.manager.asset_handle_from_file_path("dir2/sub/b.fmat"), b);
    assert_eq!(fx.manager.asset_handle_from_file_path("dirt/c.fmat"), other);
    assert!(!fx.manager.registry().contains("dir/a.fmat"));
    assert_eq!(fx.registry_json().as_array().unwrap().len(), 3);
    Ok(())
}

#[test]
fn intermediate_folder_move_keeps_outer_segments() -> Result<()> {
    let mut fx = Fixture::new()?;
    let prop = fx
        .manager
        .create_new_asset::<MaterialAsset>("Levels/Forest/Props/Log.fmat", LoadArgs::None)?
        .handle();
    let sibling = fx
        .manager
        .create_new_asset::<MaterialAsset>("Levels/ForestOld/Moss.fmat", LoadArgs::None)?
        .handle();

    fs::rename(fx.asset_path("Levels/Forest"), fx.asset_path("Levels/Jungle"))?;
    assert_eq!(fx.manager.on_move_filepath("Levels/Forest", "Levels/Jungle")?, 1);
    assert_eq!(fx.manager.asset_handle_from_file_path("Levels/Jungle/Props/Log.fmat"), prop);
    assert_eq!(fx.manager.asset_handle_from_file_path("Levels/ForestOld/Moss.fmat"), sibling);
    Ok(())
}

#[test]
fn directory_rename_handles_dotted_names() -> Result<()> {
    let mut fx = Fixture::new()?;
    let a = fx
        .manager
        .create_new_asset::<MaterialAsset>("v1.2/a.fmat", LoadArgs::None)?
        .handle();

    fs::rename(fx.asset_path("v1.2"), fx.asset_path("v1.3"))?;
    assert_eq!(fx.manager.on_rename_filepath("v1.2", "v1.3")?, 1);
    assert_eq!(fx.manager.asset_handle_from_file_path("v1.3/a.fmat"), a);
    Ok(())
}

#[test]
fn dangling_texture_reference_falls_back_to_placeholder() -> Result<()> {
    let mut fx = Fixture::new()?;
    fx.write(
        "Materials/Old.fmat",
        r#"{ "AlbedoColor": [0.5, 0.5, 0.5, 1.0], "AlbedoTexture": 999999, "UseNormalMap": 1 }"#,
    );
    fx.manager.import_asset("Materials/Old.fmat")?;

    let material = fx
        .manager
        .get_or_load_asset::<MaterialAsset>("Materials/Old.fmat", LoadArgs::None)
        .expect("material should load despite the dangling texture");
    let slot = material.read().texture(TextureSlot::Albedo);
    assert_eq!(slot, MaterialTexture::Placeholder);
    assert!(material.read().is_using_normal_map());

    let texture = fx.manager.resolve_material_texture(slot);
    assert!(texture.ptr_eq(&fx.manager.placeholder_texture()));
    assert_eq!(texture.read().pixels(), &[255, 255, 255, 255]);
    Ok(())
}

#[test]
fn delete_removes_from_index_and_cache() -> Result<()> {
    let mut fx = Fixture::new()?;
    let handle = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?
        .handle();
    assert!(fx.manager.is_asset_loaded(handle));

    fx.manager.on_asset_deleted(handle)?;
    assert!(fx.manager.get_metadata(handle).is_none());
    assert!(!fx.manager.is_asset_loaded(handle));
    assert_eq!(fx.registry_json(), serde_json::json!([]));
    Ok(())
}

#[test]
fn shutdown_empties_cache_with_cross_references() -> Result<()> {
    let mut fx = Fixture::new()?;
    fx.write("Meshes/Cube.obj", "o Cube\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n");
    let cube = fx.manager.import_asset("Meshes/Cube.obj")?;
    let mesh = fx
        .manager
        .get_or_load_asset_by_handle::<MeshAsset>(cube, LoadArgs::None)
        .unwrap();
    let material = fx
        .manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
    let scene = fx.manager.create_new_asset::<Scene>("Scenes/Main.fsc", LoadArgs::None)?;
    scene.write().create_entity("Cube").set_component(
        "MeshComponent",
        serde_json::json!({
            "MeshAssetID": cube.raw(),
            "MaterialAssetID": material.handle().raw()
        }),
    );

    fx.manager.shutdown()?;
    assert!(!fx.manager.is_open());
    assert!(!fx.manager.is_asset_loaded(cube));
    assert!(fx.manager.loaded_assets_of_type::<MaterialAsset>().is_empty());
    assert_eq!(mesh.read().submeshes().len(), 1);
    Ok(())
}

#[test]
fn loaded_assets_of_type_lists_resident_only() -> Result<()> {
    let mut fx = Fixture::new()?;
    let red = fx
        .manager
        .create_new_asset::<MaterialAsset>("Red.fmat", LoadArgs::None)?
        .handle();
    let blue = fx
        .manager
        .create_new_asset::<MaterialAsset>("Blue.fmat", LoadArgs::None)?
        .handle();
    fx.manager.create_new_asset::<Scene>("Main.fsc", LoadArgs::None)?;
    fx.manager.remove_asset_from_memory(blue)?;

    let materials = fx.manager.loaded_assets_of_type::<MaterialAsset>();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].handle(), red);
    Ok(())
}

#[test]
fn listing_and_shutdown_while_an_asset_is_being_written() -> Result<()> {
    let mut fx = Fixture::new()?;
    let material = fx
        .manager
        .create_new_asset::<MaterialAsset>("Red.fmat", LoadArgs::None)?;
    let scene = fx.manager.create_new_asset::<Scene>("Main.fsc", LoadArgs::None)?;
    let handle = material.handle();

    let mut editing = material.write();
    editing.set_roughness(0.75);

    assert_eq!(material.handle(), handle);
    assert_eq!(fx.manager.loaded_assets_of_type::<Scene>().len(), 1);
    let listed = fx.manager.loaded_assets_of_type::<MaterialAsset>();
    assert_eq!(listed[0].handle(), handle);
    let resident = fx
        .manager
        .get_or_load_asset_by_handle::<MaterialAsset>(handle, LoadArgs::None)
        .unwrap();
    assert!(resident.ptr_eq(&material));
    assert!(fx.manager.get_asset_by_handle::<Scene>(scene.handle()).is_some());

    fx.manager.shutdown()?;
    assert!(!fx.manager.is_asset_loaded(handle));
    drop(editing);
    assert_eq!(material.read().roughness(), 0.75);
    Ok(())
}

#[test]
fn scan_imports_unregistered_files() -> Result<()> {
    let mut fx = Fixture::new()?;
    fx.manager
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
    fx.write("Materials/Blue.fmat", "{}");
    fx.write("Physics/Rubber.fpm", "{}");
    fx.write("Notes/readme.txt", "not an asset");

    assert_eq!(fx.manager.scan_asset_directory()?, 2);
    assert_eq!(fx.manager.registry().count(), 3);
    assert_eq!(
        fx.manager.get_metadata_by_path("Physics/Rubber.fpm").unwrap().asset_type,
        AssetType::PhysicsMat
    );
    assert_eq!(fx.manager.scan_asset_directory()?, 0);
    assert_eq!(fx.registry_json().as_array().unwrap().len(), 3);
    Ok(())
}

#[test]
fn import_rejects_unknown_extension() -> Result<()> {
    let mut fx = Fixture::new()?;
    fx.write("Notes/readme.txt", "hello");
    assert!(matches!(
        fx.manager.import_asset("Notes/readme.txt"),
        Err(AssetError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        fx.manager.import_asset("Materials/Nope.fmat"),
        Err(AssetError::AssetNotFound(_))
    ));
    Ok(())
}

#[test]
fn project_switch_flushes_previous_project() -> Result<()> {
    let first_dir = TempDir::new()?;
    let second_dir = TempDir::new()?;
    let mut context = ProjectContext::new();

    context.set_active(Some(Project::new(first_dir.path(), "First")))?;
    let red = context
        .assets_mut()?
        .create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?
        .handle();

    context.set_active(Some(Project::new(second_dir.path(), "Second")))?;
    assert!(first_dir.path().join("First.fproj").exists());
    assert!(!context.assets()?.is_asset_handle_valid(red));
    assert!(context.assets()?.registry().is_empty());

    let reopened = Project::load(first_dir.path().join("First.fproj"))?;
    context.set_active(Some(reopened))?;
    assert!(context.assets()?.is_asset_handle_valid(red));
    assert!(!context.assets()?.is_asset_loaded(red));
    Ok(())
}
