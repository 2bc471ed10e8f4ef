// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement and batching over a small two-aisle rack.

use approx::assert_relative_eq;
use rackmap_core::Slot;
use rackmap_geometry::{
    compute_geometry, LayoutConfig, MeshBatcher, MeshCategory, RackDimensions, BOX_TRIANGLES,
    BOX_VERTICES,
};

fn rack() -> Vec<Slot> {
    [
        ("025-071-010-001", Some("P160")),
        ("025-071-020-001", Some("P120")),
        ("025-071-030-001", Some("P200")),
        ("025-072-010-001", Some("P160")),
        ("025-072-010-002", Some("P180")),
        ("025-072-020-001", None),
        ("026-001-010-001", Some("X")),
    ]
    .into_iter()
    .filter_map(|(address, code)| Slot::new(address, "PAL", code))
    .collect()
}

#[test]
fn test_stacking_and_lateral_placement() {
    let slots = rack();
    let geometry = compute_geometry(&slots, &LayoutConfig::default());
    assert_eq!(geometry.len(), slots.len());

    let z: Vec<f64> = geometry.iter().map(|g| g.z_base).collect();
    assert_relative_eq!(z[0], 0.0);
    assert_relative_eq!(z[1], 1.6);
    assert_relative_eq!(z[2], 2.8, epsilon = 1e-9);

    // Shared level takes the taller clearance
    assert_relative_eq!(z[3], 0.0);
    assert_relative_eq!(z[4], 0.0);
    assert_relative_eq!(z[5], 1.8);

    // Code without digits falls back to the default height
    assert_relative_eq!(geometry[6].level_height, 1.6);

    assert!(geometry[0].y_macro < geometry[3].y_macro);
    assert!(geometry[3].y_macro < geometry[6].y_macro);
    assert_relative_eq!(geometry[0].y_micro, -geometry[3].y_micro);
}

#[test]
fn test_one_buffer_per_category() {
    let slots = rack();
    let geometry = compute_geometry(&slots, &LayoutConfig::default());
    let dims = RackDimensions::default();

    let mut batcher = MeshBatcher::new();
    for g in &geometry {
        batcher.push_box(MeshCategory::Beam, &dims.beam(g.x, g.y_macro, g.z_base)).unwrap();
        batcher
            .push_box(MeshCategory::Cargo, &dims.cargo(g.x, g.y_macro, g.z_base, g.level_height))
            .unwrap();
    }
    let scene = batcher.build();

    assert_eq!(scene.draw_calls(), 2);
    for batch in scene.batches() {
        assert_eq!(batch.box_count, slots.len());
        assert_eq!(batch.mesh.vertex_count(), slots.len() * BOX_VERTICES);
        assert_eq!(batch.mesh.triangle_count(), slots.len() * BOX_TRIANGLES);
        assert!(batch
            .mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < batch.mesh.vertex_count()));
    }
}
