use tracing::info;

use crate::config::PipelineConfig;
use crate::document::{Batch, Drawing, EntityId, EntityKind, LayerId};
use crate::error::Result;
use crate::operations::{
    AssembleChains, ContainmentGroup, EliminateDuplicates, Explode, GroupNesting, MinLengthFilter,
    OffsetGroups, Segment, SimplifyChain, SnapEndpoints,
};

/// What a pipeline run changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub circles_exploded: usize,
    pub polylines_exploded: usize,
    pub short_removed: usize,
    pub duplicates_removed: usize,
    /// Segments whose endpoints were moved onto a neighbour.
    pub segments_snapped: usize,
    /// Polyline entities created by chain assembly, in seed order.
    pub chains: Vec<EntityId>,
    pub closed_chains: usize,
    /// Chains that lost at least one shape to simplification.
    pub chains_simplified: usize,
    pub groups: Vec<ContainmentGroup>,
    /// Offset polylines created on the offset layer.
    pub offsets: Vec<EntityId>,
}

/// Runs every normalization stage against a drawing.
///
/// Each stage that changes the drawing stages one batch and commits it
/// before the next stage starts. A failing stage commits nothing; stages
/// already committed stay applied. Entities on the offset layer are left
/// out of every stage.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an out-of-range setting, and any
    /// `OperationError` raised by a stage (`AmbiguousConnection`,
    /// `NestingViolation`, `OffsetFailure`).
    pub fn execute(&self, drawing: &mut Drawing) -> Result<PipelineReport> {
        self.config.validate()?;
        let mut report = PipelineReport::default();

        let engraving = self
            .config
            .engraving_layer
            .as_deref()
            .and_then(|name| drawing.layer_by_name(name));
        let offset_layer = drawing.layer_by_name(&self.config.offset_layer);

        // Explode
        let exploded = Explode::new(drawing).ignoring_layer(offset_layer).execute();
        report.circles_exploded = exploded.circles;
        report.polylines_exploded = exploded.polylines;
        apply(drawing, exploded.batch)?;
        info!(
            circles = exploded.circles,
            polylines = exploded.polylines,
            "exploded"
        );

        let segments: Vec<Segment> = Segment::collect(drawing)
            .into_iter()
            .filter(|s| Some(s.layer) != offset_layer)
            .collect();

        // Filter
        let pruned = MinLengthFilter::new(&segments, self.config.min_segment_length).execute();
        report.short_removed = pruned.removed.len();
        apply(drawing, deletions(&pruned.removed))?;
        info!(removed = pruned.removed.len(), kept = pruned.kept.len(), "filtered short segments");

        // Deduplicate
        let unique = EliminateDuplicates::new(&pruned.kept).execute();
        report.duplicates_removed = unique.removed.len();
        apply(drawing, deletions(&unique.removed))?;
        info!(removed = unique.removed.len(), kept = unique.kept.len(), "removed duplicates");

        // Snap
        let snapped = SnapEndpoints::new(&unique.kept)
            .excluding_layer(engraving)
            .execute()?;
        let mut batch = Batch::new();
        for &i in &snapped.modified {
            let segment = &snapped.segments[i];
            batch.modify(segment.id, EntityKind::from(segment.shape));
        }
        report.segments_snapped = snapped.modified.len();
        apply(drawing, batch)?;
        info!(modified = snapped.modified.len(), "snapped endpoints");

        // Assemble
        let chains = AssembleChains::new(&snapped.segments)
            .excluding_layer(engraving)
            .execute()?;
        let mut batch = Batch::new();
        for assembled in &chains {
            for &id in &assembled.sources {
                batch.delete(id);
            }
            batch.create(assembled.layer, EntityKind::Polyline(assembled.chain.clone()));
        }
        report.chains = apply(drawing, batch)?;
        report.closed_chains = chains.iter().filter(|c| c.chain.closed).count();
        info!(chains = chains.len(), closed = report.closed_chains, "assembled chains");

        // Simplify
        let mut batch = Batch::new();
        for (assembled, &id) in chains.iter().zip(&report.chains) {
            let simplified = SimplifyChain::new(&assembled.chain).execute();
            if simplified.len() < assembled.chain.len() {
                batch.modify(id, EntityKind::Polyline(simplified));
            }
        }
        report.chains_simplified = batch.modifies.len();
        apply(drawing, batch)?;
        info!(simplified = report.chains_simplified, "simplified chains");

        // Nesting
        report.groups = GroupNesting::new(drawing)
            .engraving_layer(engraving)
            .ignoring_layer(offset_layer)
            .execute()?;
        info!(groups = report.groups.len(), "grouped nesting");

        // Offset
        let curves = OffsetGroups::new(drawing, &report.groups, &self.config)
            .engraving_layer(engraving)
            .execute()?;
        if !curves.is_empty() {
            let layer: LayerId = drawing.ensure_layer(&self.config.offset_layer);
            let mut batch = Batch::new();
            for curve in curves {
                batch.create(layer, EntityKind::Polyline(curve.chain));
            }
            report.offsets = apply(drawing, batch)?;
        }
        info!(
            offsets = report.offsets.len(),
            distance = self.config.offset_distance,
            "offset boundaries"
        );

        Ok(report)
    }
}

fn deletions(ids: &[EntityId]) -> Batch {
    let mut batch = Batch::new();
    for &id in ids {
        batch.delete(id);
    }
    batch
}

/// Commits `batch` unless it is empty; returns the created ids.
fn apply(drawing: &mut Drawing, batch: Batch) -> Result<Vec<EntityId>> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }
    drawing.stage(batch);
    Ok(drawing.commit()?)
}
