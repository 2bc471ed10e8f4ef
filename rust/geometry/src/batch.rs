// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Box batching: one shared mesh per visual category.
//!
//! A warehouse holds tens of thousands of slots. Rendering each box as its own
//! primitive does not scale, so boxes are appended to one vertex/index buffer
//! per category and the renderer issues at most one draw call per category.
//!
//! [`MeshBatcher`] accumulates boxes; [`MeshBatcher::build`] consumes it into
//! an immutable [`BatchedScene`]. A new pass starts from a fresh batcher.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// Vertices contributed by one box.
pub const BOX_VERTICES: usize = 8;

/// Triangles contributed by one box.
pub const BOX_TRIANGLES: usize = 12;

/// Corner order: bottom face counter-clockwise from the origin, then top.
const CORNERS: [(f64, f64, f64); BOX_VERTICES] = [
    (0.0, 0.0, 0.0),
    (1.0, 0.0, 0.0),
    (1.0, 1.0, 0.0),
    (0.0, 1.0, 0.0),
    (0.0, 0.0, 1.0),
    (1.0, 0.0, 1.0),
    (1.0, 1.0, 1.0),
    (0.0, 1.0, 1.0),
];

/// Outward-facing triangles over [`CORNERS`].
const FACES: [[u32; 3]; BOX_TRIANGLES] = [
    [0, 2, 1], [0, 3, 2], // bottom
    [4, 5, 6], [4, 6, 7], // top
    [0, 1, 5], [0, 5, 4], // y min
    [3, 7, 6], [3, 6, 2], // y max
    [0, 4, 7], [0, 7, 3], // x min
    [1, 2, 6], [1, 6, 5], // x max
];

/// Visual category of a batched box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshCategory {
    Structure = 0,
    Beam = 1,
    PalletBase = 2,
    Cargo = 3,
    ExpiredCargo = 4,
}

impl MeshCategory {
    pub const ALL: [MeshCategory; 5] = [
        MeshCategory::Structure,
        MeshCategory::Beam,
        MeshCategory::PalletBase,
        MeshCategory::Cargo,
        MeshCategory::ExpiredCargo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeshCategory::Structure => "structure",
            MeshCategory::Beam => "beam",
            MeshCategory::PalletBase => "pallet_base",
            MeshCategory::Cargo => "cargo",
            MeshCategory::ExpiredCargo => "expired_cargo",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Axis-aligned box given by its minimum corner and its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpec {
    pub origin: Point3<f64>,
    pub extents: Vector3<f64>,
}

impl BoxSpec {
    pub fn new(origin: Point3<f64>, extents: Vector3<f64>) -> Self {
        Self { origin, extents }
    }

    /// Box centred on `(x, y)` in plan, standing on `z`.
    pub fn standing(x: f64, y: f64, z: f64, width: f64, depth: f64, height: f64) -> Self {
        Self {
            origin: Point3::new(x - width / 2.0, y - depth / 2.0, z),
            extents: Vector3::new(width, depth, height),
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = self.origin.coords.iter().chain(self.extents.iter()).all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidBox(format!("non-finite box {:?}", self)));
        }
        if self.extents.iter().any(|&e| e <= 0.0) {
            return Err(Error::InvalidBox(format!(
                "extents must be positive, got {:?}",
                self.extents
            )));
        }
        Ok(())
    }
}

/// One finished category buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMesh {
    pub category: MeshCategory,
    pub box_count: usize,
    pub mesh: Mesh,
}

/// Accumulating state: boxes are appended per category.
#[derive(Debug, Clone)]
pub struct MeshBatcher {
    meshes: [Mesh; 5],
    box_counts: [usize; 5],
}

impl MeshBatcher {
    pub fn new() -> Self {
        Self {
            meshes: std::array::from_fn(|_| Mesh::new()),
            box_counts: [0; 5],
        }
    }

    /// Pre-size a category buffer for `boxes` more boxes.
    pub fn reserve(&mut self, category: MeshCategory, boxes: usize) {
        self.meshes[category.index()].reserve(boxes * BOX_VERTICES, boxes * BOX_TRIANGLES * 3);
    }

    /// Append a box to its category buffer.
    ///
    /// Adds 8 vertices and 12 triangles; indices are offset by the vertices
    /// already in the buffer.
    pub fn push_box(&mut self, category: MeshCategory, spec: &BoxSpec) -> Result<()> {
        spec.validate()?;

        let mesh = &mut self.meshes[category.index()];
        let offset = mesh.vertex_count() as u32;

        for &(cx, cy, cz) in &CORNERS {
            let position = Point3::new(
                spec.origin.x + cx * spec.extents.x,
                spec.origin.y + cy * spec.extents.y,
                spec.origin.z + cz * spec.extents.z,
            );
            let normal = Vector3::new(cx * 2.0 - 1.0, cy * 2.0 - 1.0, cz * 2.0 - 1.0).normalize();
            mesh.add_vertex(position, normal);
        }
        for [a, b, c] in FACES {
            mesh.add_triangle(offset + a, offset + b, offset + c);
        }

        self.box_counts[category.index()] += 1;
        Ok(())
    }

    pub fn box_count(&self, category: MeshCategory) -> usize {
        self.box_counts[category.index()]
    }

    /// Finish the pass. Empty categories are dropped.
    pub fn build(self) -> BatchedScene {
        let batches = MeshCategory::ALL
            .into_iter()
            .zip(self.meshes)
            .zip(self.box_counts)
            .filter(|(_, box_count)| *box_count > 0)
            .map(|((category, mesh), box_count)| CategoryMesh {
                category,
                box_count,
                mesh,
            })
            .collect();
        BatchedScene { batches }
    }
}

impl Default for MeshBatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Built state: read-only category buffers, in category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchedScene {
    batches: Vec<CategoryMesh>,
}

impl BatchedScene {
    pub fn batches(&self) -> &[CategoryMesh] {
        &self.batches
    }

    pub fn get(&self, category: MeshCategory) -> Option<&CategoryMesh> {
        self.batches.iter().find(|b| b.category == category)
    }

    /// One draw call per non-empty category.
    pub fn draw_calls(&self) -> usize {
        self.batches.len()
    }

    pub fn box_count(&self) -> usize {
        self.batches.iter().map(|b| b.box_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
