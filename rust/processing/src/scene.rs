// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene assembly: resolved slots to batched rack boxes.

use crate::error::Result;
use crate::palette::category_color;
use crate::resolved::ResolvedSlot;
use rackmap_core::SlotAddress;
use rackmap_geometry::{BatchedScene, MeshBatcher, MeshCategory, RackDimensions};
use std::collections::BTreeMap;
use std::io::Write;

/// Which lateral coordinate the scene is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneView {
    /// All aisles side by side (`y_macro`).
    Warehouse,
    /// A single aisle, both sides around the walkway (`y_micro`).
    Aisle(u32),
}

impl SceneView {
    fn lateral(&self, slot: &ResolvedSlot) -> f64 {
        match self {
            SceneView::Warehouse => slot.geometry.y_macro,
            SceneView::Aisle(_) => slot.geometry.y_micro,
        }
    }

    fn includes(&self, slot: &ResolvedSlot) -> bool {
        match self {
            SceneView::Warehouse => true,
            SceneView::Aisle(aisle) => slot.location.aisle == *aisle,
        }
    }
}

struct Stack {
    x: f64,
    y: f64,
    top: f64,
}

/// Emit rack boxes for `slots` into per-category buffers.
///
/// One upright pair per (aisle, column) reaching the top of its highest
/// level and one beam per level. Sub-positions sharing a level split the
/// beam into lanes in address order; occupied lanes get a pallet base and
/// cargo. Levels are emitted in address order so output is deterministic.
pub fn build_scene<'a>(
    slots: impl IntoIterator<Item = &'a ResolvedSlot>,
    view: SceneView,
    dims: &RackDimensions,
) -> Result<BatchedScene> {
    dims.validate()?;

    let mut levels: BTreeMap<SlotAddress, Vec<&ResolvedSlot>> = BTreeMap::new();
    for slot in slots.into_iter().filter(|s| view.includes(s)) {
        levels.entry(slot.location).or_default().push(slot);
    }

    let mut stacks: BTreeMap<(u32, u32), Stack> = BTreeMap::new();
    let mut batcher = MeshBatcher::new();

    for (location, level) in levels.iter_mut() {
        level.sort_by(|a, b| a.address.cmp(&b.address));
        let Some(first) = level.first() else {
            continue;
        };
        let x = first.geometry.x;
        let y = view.lateral(first);
        let z = first.geometry.z_base;
        let height = level
            .iter()
            .map(|s| s.geometry.level_height)
            .fold(first.geometry.level_height, f64::max);

        let stack = stacks
            .entry(location.stack_key())
            .or_insert(Stack { x, y, top: z + height });
        stack.top = stack.top.max(z + height);

        batcher.push_box(MeshCategory::Beam, &dims.beam(x, y, z))?;

        for (index, slot) in level.iter().enumerate() {
            if !slot.is_occupied() {
                continue;
            }
            let (cx, lane) = dims.lane(x, index, level.len());
            batcher.push_box(MeshCategory::PalletBase, &lane.pallet_base(cx, y, z))?;
            let category = if slot.is_expired {
                MeshCategory::ExpiredCargo
            } else {
                MeshCategory::Cargo
            };
            batcher.push_box(category, &lane.cargo(cx, y, z, slot.geometry.level_height))?;
        }
    }

    batcher.reserve(MeshCategory::Structure, stacks.len() * 2);
    for stack in stacks.values() {
        for upright in dims.uprights(stack.x, stack.y, stack.top) {
            batcher.push_box(MeshCategory::Structure, &upright)?;
        }
    }

    Ok(batcher.build())
}

/// Write a batched scene as Wavefront OBJ, one object group per category.
///
/// Each group uses the material named after its category; pass the name of
/// the file written by [`write_mtl`] as `material_lib` to reference it.
pub fn write_obj<W: Write>(
    scene: &BatchedScene,
    material_lib: Option<&str>,
    mut out: W,
) -> Result<()> {
    writeln!(out, "# rackmap scene: {} boxes", scene.box_count())?;
    if let Some(lib) = material_lib {
        writeln!(out, "mtllib {lib}")?;
    }

    let mut base = 1u32;
    for batch in scene.batches() {
        let mesh = &batch.mesh;
        writeln!(out, "o {}", batch.category.as_str())?;
        writeln!(out, "usemtl {}", batch.category.as_str())?;
        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
        }
        for t in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (t[0] + base, t[1] + base, t[2] + base);
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        base += mesh.vertex_count() as u32;
    }
    out.flush()?;
    Ok(())
}

/// Write one Wavefront material per category present in `scene`.
pub fn write_mtl<W: Write>(scene: &BatchedScene, mut out: W) -> Result<()> {
    for batch in scene.batches() {
        let [r, g, b, a] = category_color(batch.category);
        writeln!(out, "newmtl {}", batch.category.as_str())?;
        writeln!(out, "Kd {r:.4} {g:.4} {b:.4}")?;
        writeln!(out, "d {a:.4}")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_slot, occupied_slot};
    use rackmap_geometry::{BOX_TRIANGLES, BOX_VERTICES};

    fn slots() -> Vec<ResolvedSlot> {
        let mut expired = occupied_slot("025-071-050-001", "PAL", "2", None);
        expired.is_expired = true;
        vec![
            occupied_slot("025-071-040-001", "PAL", "1", None),
            expired,
            empty_slot("025-071-060-001", "PAL"),
            empty_slot("021-001-010-001", "BLK"),
        ]
    }

    #[test]
    fn test_warehouse_scene_counts() {
        let scene = build_scene(&slots(), SceneView::Warehouse, &RackDimensions::default()).unwrap();

        // Two stacks, two uprights each
        assert_eq!(scene.get(MeshCategory::Structure).unwrap().box_count, 4);
        assert_eq!(scene.get(MeshCategory::Beam).unwrap().box_count, 4);
        assert_eq!(scene.get(MeshCategory::PalletBase).unwrap().box_count, 2);
        assert_eq!(scene.get(MeshCategory::Cargo).unwrap().box_count, 1);
        assert_eq!(scene.get(MeshCategory::ExpiredCargo).unwrap().box_count, 1);
        assert_eq!(scene.draw_calls(), 5);

        for batch in scene.batches() {
            assert_eq!(batch.mesh.vertex_count(), batch.box_count * BOX_VERTICES);
            assert_eq!(batch.mesh.triangle_count(), batch.box_count * BOX_TRIANGLES);
        }
    }

    #[test]
    fn test_aisle_view_uses_micro_offset() {
        let dims = RackDimensions::default();
        let scene = build_scene(&slots(), SceneView::Aisle(21), &dims).unwrap();
        assert_eq!(scene.box_count(), 3);
        assert!(scene.get(MeshCategory::Cargo).is_none());

        let beam = &scene.get(MeshCategory::Beam).unwrap().mesh;
        let (min, max) = beam.bounds();
        // Odd column sits on the negative side of the walkway
        assert!(((min.y + max.y) / 2.0 + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_input_builds_empty_scene() {
        let scene = build_scene(
            std::iter::empty::<&ResolvedSlot>(),
            SceneView::Warehouse,
            &RackDimensions::default(),
        )
        .unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_obj_groups_and_indices() {
        let scene = build_scene(&slots(), SceneView::Warehouse, &RackDimensions::default()).unwrap();
        let mut buffer = Vec::new();
        write_obj(&scene, Some("scene.mtl"), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().nth(1), Some("mtllib scene.mtl"));
        assert_eq!(text.lines().filter(|l| l.starts_with("o ")).count(), 5);
        assert_eq!(text.lines().filter(|l| l.starts_with("usemtl ")).count(), 5);
        let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
        assert_eq!(vertices, scene.box_count() * BOX_VERTICES);
        let max_index = text
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l[2..].split(' '))
            .filter_map(|v| v.split("//").next()?.parse::<usize>().ok())
            .max()
            .unwrap();
        assert_eq!(max_index, vertices);
    }

    #[test]
    fn test_sub_positions_share_beam() {
        let slots = vec![
            occupied_slot("025-071-040-002", "PAL", "2", None),
            occupied_slot("025-071-040-001", "PAL", "1", None),
        ];
        let scene = build_scene(&slots, SceneView::Warehouse, &RackDimensions::default()).unwrap();

        assert_eq!(scene.get(MeshCategory::Beam).unwrap().box_count, 1);
        assert_eq!(scene.get(MeshCategory::Structure).unwrap().box_count, 2);
        let cargo = scene.get(MeshCategory::Cargo).unwrap();
        assert_eq!(cargo.box_count, 2);

        // Two lanes side by side, no shared volume
        let first = &cargo.mesh.positions[..BOX_VERTICES * 3];
        let second = &cargo.mesh.positions[BOX_VERTICES * 3..];
        let max_x = |p: &[f32]| p.chunks_exact(3).map(|v| v[0]).fold(f32::MIN, f32::max);
        let min_x = |p: &[f32]| p.chunks_exact(3).map(|v| v[0]).fold(f32::MAX, f32::min);
        assert!(max_x(first) < min_x(second));
    }

    #[test]
    fn test_mtl_has_category_colors() {
        let scene = build_scene(&slots(), SceneView::Warehouse, &RackDimensions::default()).unwrap();
        let mut buffer = Vec::new();
        write_mtl(&scene, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("newmtl ")).count(), 5);
        assert!(text.contains("newmtl expired_cargo\nKd 0.8392 0.1529 0.1569\n"));
        assert!(text.contains("d 1.0000\n"));
    }
}
