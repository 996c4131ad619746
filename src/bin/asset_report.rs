//! Open a project, import everything under its asset directory, load every
//! registered asset once and print a per-type summary. With the `profiling`
//! feature the run is traced to `asset_report.log`.

use editor_assets::{
    AssetKind, AssetManager, AssetType, Font, Handle, LoadArgs, MaterialAsset, MeshAsset,
    PhysicsMaterial, Prefab, Project, Result, Scene, Texture2D, TextureCubeMap,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

#[cfg(feature = "profiling")]
use std::fs::File;

fn try_load<T: AssetKind>(manager: &mut AssetManager, handle: Handle) -> bool {
    manager
        .get_or_load_asset_by_handle::<T>(handle, LoadArgs::None)
        .is_some()
}

fn load_all(manager: &mut AssetManager) -> BTreeMap<AssetType, (usize, usize)> {
    let entries: Vec<_> = manager
        .registry()
        .iter()
        .map(|metadata| (metadata.handle, metadata.asset_type))
        .collect();

    let mut summary = BTreeMap::new();
    for (handle, asset_type) in entries {
        let loaded = match asset_type {
            AssetType::Scene => try_load::<Scene>(manager, handle),
            AssetType::Prefab => try_load::<Prefab>(manager, handle),
            AssetType::MeshAsset => try_load::<MeshAsset>(manager, handle),
            AssetType::Material => try_load::<MaterialAsset>(manager, handle),
            AssetType::PhysicsMat => try_load::<PhysicsMaterial>(manager, handle),
            AssetType::Texture => try_load::<Texture2D>(manager, handle),
            AssetType::EnvMap => try_load::<TextureCubeMap>(manager, handle),
            AssetType::Font => try_load::<Font>(manager, handle),
            // Blueprints need their parent mesh, which only the document names
            AssetType::AnimationBlueprint => manager.is_asset_loaded(handle),
            AssetType::None => false,
        };
        let counts: &mut (usize, usize) = summary.entry(asset_type).or_default();
        counts.0 += 1;
        if loaded {
            counts.1 += 1;
        }
    }
    summary
}

fn run(project_file: PathBuf) -> Result<()> {
    let project = Project::load(&project_file)?;
    let mut manager = AssetManager::from_project(&project);
    manager.init()?;

    let start = Instant::now();
    let imported = {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("scan").entered();
        manager.scan_asset_directory()?
    };
    let summary = {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("load_all").entered();
        load_all(&mut manager)
    };
    let elapsed = start.elapsed();

    println!("Project '{}' ({})", project.name(), project.asset_directory().display());
    println!("Imported {imported} new file(s)");
    for (asset_type, (registered, loaded)) in &summary {
        println!("  {asset_type:<16} {loaded:>5} / {registered:<5} loaded");
    }
    println!(
        "Loaded {} asset(s) in {:?} ({} cache miss(es))",
        manager.cache_stats().total_loads,
        elapsed,
        manager.cache_stats().misses
    );
    manager.shutdown()
}

#[cfg(feature = "profiling")]
fn main() -> Result<()> {
    let file = File::create("asset_report.log")?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .init();

    let Some(project_file) = std::env::args().nth(1) else {
        eprintln!("usage: asset_report <project.fproj>");
        return Ok(());
    };
    run(PathBuf::from(project_file))
}

#[cfg(not(feature = "profiling"))]
fn main() -> Result<()> {
    let Some(project_file) = std::env::args().nth(1) else {
        eprintln!("usage: asset_report <project.fproj>");
        return Ok(());
    };
    run(PathBuf::from(project_file))
}
