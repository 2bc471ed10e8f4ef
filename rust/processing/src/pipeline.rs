// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolve pipeline: layout once, then merge and classify per upload.

use crate::cache::{ResolveCache, UploadIdentity};
use crate::classify::classify_all;
use crate::error::Result;
use crate::merge::{merge_stock, MergedSlot};
use crate::table::ResolvedTable;
use chrono::NaiveDateTime;
use rackmap_core::{Layout, StockReport, StockTable};
use rackmap_geometry::{compute_geometry, LayoutConfig, SlotGeometry};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// An uploaded stock snapshot.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn identity(&self) -> UploadIdentity {
        UploadIdentity::of(&self.file_name, &self.bytes)
    }
}

/// Merged slots of one upload, reused until the upload changes.
#[derive(Debug)]
pub struct MergedSnapshot {
    pub slots: Vec<MergedSlot>,
    pub report: StockReport,
}

/// Owns the fixed layout and its geometry; resolves uploads against them.
#[derive(Debug)]
pub struct Pipeline {
    layout: Arc<Layout>,
    geometry: Vec<SlotGeometry>,
    config: LayoutConfig,
    cache: ResolveCache<MergedSnapshot>,
    last_report: Option<StockReport>,
}

impl Pipeline {
    /// Load the layout at `path` and compute its geometry.
    ///
    /// A missing layout file is fatal (`LayoutNotFound`).
    pub fn open(path: impl AsRef<Path>, config: LayoutConfig) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();
        let layout = Layout::load(path)?;

        let report = layout.report();
        tracing::info!(
            path = %path.display(),
            slots = layout.len(),
            skipped = report.skipped(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded layout"
        );
        if !report.malformed_addresses.is_empty() {
            tracing::warn!(
                count = report.malformed_addresses.len(),
                first = %report.malformed_addresses[0],
                "Skipped layout rows with malformed addresses"
            );
        }
        if !report.duplicate_addresses.is_empty() {
            tracing::warn!(
                count = report.duplicate_addresses.len(),
                first = %report.duplicate_addresses[0],
                "Duplicate layout addresses, kept first occurrence"
            );
        }

        Self::from_layout(layout, config)
    }

    pub fn from_layout(layout: Layout, config: LayoutConfig) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();
        let geometry = compute_geometry(layout.slots(), &config);
        tracing::debug!(
            slots = geometry.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Computed slot geometry"
        );

        Ok(Self {
            layout: Arc::new(layout),
            geometry,
            config,
            cache: ResolveCache::new(),
            last_report: None,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn geometry(&self) -> &[SlotGeometry] {
        &self.geometry
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Load report of the most recent upload, if any.
    pub fn stock_report(&self) -> Option<&StockReport> {
        self.last_report.as_ref()
    }

    pub fn cache(&self) -> &ResolveCache<MergedSnapshot> {
        &self.cache
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Resolve every layout slot against `upload`, evaluating expiry at `now`.
    ///
    /// Without an upload every slot resolves Empty. Merged slots are cached
    /// per upload identity; classification reruns on every call.
    pub fn resolve(
        &mut self,
        upload: Option<&Upload>,
        now: NaiveDateTime,
    ) -> Result<ResolvedTable> {
        let start = Instant::now();

        let slots = match upload {
            Some(upload) => {
                let identity = upload.identity();
                let layout = &self.layout;
                let geometry = &self.geometry;
                // A failed upload must not leave the previous report behind.
                self.last_report = None;
                let snapshot = self.cache.get_or_try_insert_with(&identity, || {
                    merge_upload(layout, geometry, upload)
                })?;
                self.last_report = Some(snapshot.report.clone());
                classify_all(&snapshot.slots, now)
            }
            None => {
                self.last_report = None;
                classify_all(&merge_stock(&self.layout, &self.geometry, None), now)
            }
        };

        let table = ResolvedTable::new(slots, now);
        tracing::debug!(
            slots = table.len(),
            upload = upload.map(|u| u.file_name.as_str()).unwrap_or("-"),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Resolved slots"
        );
        Ok(table)
    }
}

fn merge_upload(
    layout: &Layout,
    geometry: &[SlotGeometry],
    upload: &Upload,
) -> Result<MergedSnapshot> {
    let start = Instant::now();
    let stock = StockTable::from_upload(&upload.file_name, &upload.bytes)?;
    let report = stock.report().clone();

    tracing::info!(
        file = %upload.file_name,
        rows = report.rows,
        records = stock.len(),
        missing_address = report.missing_address,
        duplicates = report.duplicate_addresses.len(),
        invalid_expiry = report.invalid_expiry,
        invalid_quantity = report.invalid_quantity,
        "Loaded stock snapshot"
    );
    if !report.has_expiry_column {
        tracing::warn!(file = %upload.file_name, "Stock snapshot has no expiry column");
    }

    let slots = merge_stock(layout, geometry, Some(&stock));
    let matched = slots.iter().filter(|s| s.matched).count();
    tracing::debug!(
        matched,
        unmatched_stock = stock.len().saturating_sub(matched),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Merged stock onto layout"
    );

    Ok(MergedSnapshot { slots, report })
}
