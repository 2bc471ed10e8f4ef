// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # rackmap Processing
//!
//! Resolve pipeline shared by the command-line front end and any renderer:
//! stock merge, slot classification, filters, indicators and scene assembly.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rackmap_processing::{Pipeline, Upload, SlotFilter, SceneView, build_scene};
//!
//! let mut pipeline = Pipeline::open("layout.csv", LayoutConfig::default())?;
//! let table = pipeline.resolve(Some(&Upload::new("estoque.csv", bytes)), now)?;
//! let visible = table.filter(&SlotFilter::new().hide_structure());
//! let scene = build_scene(visible, SceneView::Warehouse, &RackDimensions::default())?;
//! ```

pub mod cache;
pub mod classify;
pub mod error;
pub mod filter;
pub mod merge;
pub mod metrics;
pub mod palette;
pub mod pipeline;
pub mod resolved;
pub mod scene;
pub mod table;

#[cfg(test)]
mod test_support;

pub use cache::{content_digest, CacheStats, ResolveCache, UploadIdentity};
pub use classify::{classify, classify_all, is_stocked_product};
pub use error::{Error, Result};
pub use filter::{aisle_options, area_options, expiry_options, SlotFilter};
pub use merge::{merge_stock, MergedSlot};
pub use metrics::{stocked_quantity, top_products, OccupancySummary, ProductTotal};
pub use palette::{category_color, AreaPalette, Rgba, AREA_COLORS, EMPTY_COLOR};
pub use pipeline::{MergedSnapshot, Pipeline, Upload};
pub use resolved::{ResolvedSlot, SlotStatus, EMPTY_STRUCTURE};
pub use scene::{build_scene, write_mtl, write_obj, SceneView};
pub use table::ResolvedTable;
