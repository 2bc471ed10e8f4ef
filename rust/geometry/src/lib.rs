// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! rackmap Geometry
//!
//! Slot placement with cumulative rack stacking, and batched box meshes
//! (one buffer per visual category) built with nalgebra.

pub mod batch;
pub mod config;
pub mod error;
pub mod mesh;
pub mod placement;
pub mod rack;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use batch::{BatchedScene, BoxSpec, CategoryMesh, MeshBatcher, MeshCategory, BOX_TRIANGLES, BOX_VERTICES};
pub use config::{LayoutConfig, RackDimensions};
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use placement::{compute_geometry, lateral_position, level_height, stack_bases, SlotGeometry};
