//! Scene loading from a manifest of source models.
//!
//! A manifest is a whitespace-separated list of model paths: the brick map
//! first, then the bricks in id order (brick id 1 is the second entry).
//! Parsing the model files themselves is left to a [`ModelSource`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use brickcast_core::constants::MAX_CELL_VALUE;
use brickcast_core::{LoadError, Result};
use brickcast_voxel::{Brick, BrickMap, OverflowPolicy, Scene, SourceScene};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Supplies decoded source models by path.
///
/// Implemented by the voxel file parser. Reads may happen from several
/// threads at once.
pub trait ModelSource: Send + Sync {
    fn read(&self, path: &Path) -> Result<SourceScene>;
}

/// Models held in memory, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    models: HashMap<PathBuf, SourceScene>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under `path`, replacing any previous one.
    pub fn insert(&mut self, path: impl Into<PathBuf>, scene: SourceScene) {
        self.models.insert(path.into(), scene);
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, path: impl Into<PathBuf>, scene: SourceScene) -> Self {
        self.insert(path, scene);
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelSource for InMemorySource {
    fn read(&self, path: &Path) -> Result<SourceScene> {
        self.models
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::ModelNotFound(path.to_path_buf()))
    }
}

/// Parsed scene manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneManifest {
    pub brick_map: PathBuf,
    pub bricks: Vec<PathBuf>,
}

impl SceneManifest {
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().map(PathBuf::from);
        let brick_map = tokens
            .next()
            .ok_or_else(|| LoadError::Manifest("no brick map entry".into()))?;
        let bricks: Vec<PathBuf> = tokens.collect();

        if bricks.len() > MAX_CELL_VALUE as usize {
            warn!(
                bricks = bricks.len(),
                "manifest lists more bricks than a map cell can reference"
            );
        }

        Ok(Self { brick_map, bricks })
    }
}

/// Scene loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory manifest entries are resolved against.
    pub asset_root: PathBuf,
    /// How bricks with too many colors are handled.
    pub overflow_policy: OverflowPolicy,
}

/// Builds validated [`Scene`]s from manifests.
#[derive(Debug, Clone, Default)]
pub struct SceneLoader {
    config: LoaderConfig,
}

impl SceneLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read a manifest file and load the scene it describes.
    pub fn load(&self, manifest_path: &Path, source: &dyn ModelSource) -> Result<Scene> {
        let text = fs::read_to_string(manifest_path).map_err(|source| LoadError::Io {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let manifest = SceneManifest::parse(&text)?;
        self.load_manifest(&manifest, source)
    }

    /// Load every model named by `manifest`. Bricks are decoded in parallel.
    ///
    /// Either the whole scene loads or an error is returned.
    pub fn load_manifest(
        &self,
        manifest: &SceneManifest,
        source: &dyn ModelSource,
    ) -> Result<Scene> {
        let map_path = self.resolve(&manifest.brick_map);
        let brick_map = BrickMap::from_source(&source.read(&map_path)?)?;
        debug!(path = %map_path.display(), size = %brick_map.size(), "brick map loaded");

        let policy = self.config.overflow_policy;
        let bricks = manifest
            .bricks
            .par_iter()
            .map(|path| {
                let path = self.resolve(path);
                let brick = Brick::from_source(&source.read(&path)?, policy)?;
                debug!(
                    path = %path.display(),
                    materials = brick.material_count(),
                    "brick loaded"
                );
                Ok(brick)
            })
            .collect::<Result<Vec<_>>>()?;

        let scene = Scene::new(brick_map, bricks)?;
        info!(
            bricks = scene.bricks().len(),
            size = %scene.brick_map().size(),
            "scene loaded"
        );
        Ok(scene)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.config.asset_root.join(path)
    }
}
