use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Edge length of a claimed area, in world units.
pub const CLAIM_CHUNK_SIZE: i64 = 16;

/// Failure to turn a settlement's claim records into a spawn point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("settlement has no claimed areas")]
    NoClaims,
    #[error("malformed claim record {0:?}")]
    Malformed(String),
    #[error("claim refers to unknown world {0:?}")]
    UnknownWorld(String),
}

/// One claimed area, persisted as `"<world>:<chunk_x>:<chunk_z>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedArea {
    pub world: String,
    pub chunk_x: i64,
    pub chunk_z: i64,
}

impl ClaimedArea {
    pub fn new(world: impl Into<String>, chunk_x: i64, chunk_z: i64) -> Self {
        Self {
            world: world.into(),
            chunk_x,
            chunk_z,
        }
    }

    /// Horizontal centre of the area as integer column coordinates, or
    /// `Malformed` when the chunk index lies outside the addressable range.
    pub fn center_column(&self) -> Result<(i64, i64), ClaimError> {
        let half = CLAIM_CHUNK_SIZE / 2;
        let center = |chunk: i64| {
            chunk
                .checked_mul(CLAIM_CHUNK_SIZE)
                .and_then(|edge| edge.checked_add(half))
                .ok_or_else(|| ClaimError::Malformed(self.to_string()))
        };
        Ok((center(self.chunk_x)?, center(self.chunk_z)?))
    }
}

impl FromStr for ClaimedArea {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClaimError::Malformed(s.to_string());
        let mut parts = s.split(':');
        let (Some(world), Some(x), Some(z), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if world.is_empty() {
            return Err(malformed());
        }
        let chunk_x = x.trim().parse().map_err(|_| malformed())?;
        let chunk_z = z.trim().parse().map_err(|_| malformed())?;
        Ok(ClaimedArea::new(world, chunk_x, chunk_z))
    }
}

impl fmt::Display for ClaimedArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.world, self.chunk_x, self.chunk_z)
    }
}
