use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use crate::model::{ClaimError, ClaimedArea, Position};

/// Highest solid surface per integer (x, z) column of one world.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMap {
    pub default_height: f64,
    columns: BTreeMap<(i64, i64), f64>,
}

impl SurfaceMap {
    pub fn flat(height: f64) -> Self {
        Self {
            default_height: height,
            columns: BTreeMap::new(),
        }
    }

    pub fn set_height(&mut self, x: i64, z: i64, height: f64) {
        self.columns.insert((x, z), height);
    }

    pub fn highest_solid(&self, x: i64, z: i64) -> f64 {
        self.columns
            .get(&(x, z))
            .copied()
            .unwrap_or(self.default_height)
    }
}

/// Terrain/position service: surface heights for every loaded world.
#[derive(Resource, Debug, Clone, Default)]
pub struct Terrain {
    worlds: BTreeMap<String, SurfaceMap>,
}

impl Terrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_world(mut self, name: impl Into<String>, surface: SurfaceMap) -> Self {
        self.insert_world(name, surface);
        self
    }

    pub fn insert_world(&mut self, name: impl Into<String>, surface: SurfaceMap) {
        self.worlds.insert(name.into(), surface);
    }

    pub fn world_mut(&mut self, name: &str) -> Option<&mut SurfaceMap> {
        self.worlds.get_mut(name)
    }

    /// Safe standing point at the centre of a claimed area: one unit above the
    /// highest solid surface.
    pub fn surface_point(&self, claim: &ClaimedArea) -> Result<Position, ClaimError> {
        let surface = self
            .worlds
            .get(&claim.world)
            .ok_or_else(|| ClaimError::UnknownWorld(claim.world.clone()))?;
        let (x, z) = claim.center_column()?;
        let y = surface.highest_solid(x, z) + 1.0;
        Ok(Position::new(x as f64, y, z as f64))
    }

    /// Spawn point derived from the first claim record of a settlement.
    pub fn resolve_first_claim(&self, claims: &[String]) -> Result<Position, ClaimError> {
        let first = claims.first().ok_or(ClaimError::NoClaims)?;
        let claim: ClaimedArea = first.parse()?;
        self.surface_point(&claim)
    }
}
