use log::warn;
use serde::Serialize;

use crate::aggregate::{self, GroupedAggregate, KpiSummary};
use crate::dataset::Dataset;
use crate::filter::{self, FilterSelection};
use crate::schema::ColumnSchema;

/// A checkpoint stopped the render cycle. Nothing after the failing
/// stage runs; the process itself keeps serving.
#[derive(Clone, Debug, PartialEq)]
pub enum Halt {
    /// A required column is absent after normalization. Carries the
    /// first missing column in declared order.
    SchemaFailure { column: String },
    /// The filter selections matched no rows.
    EmptyResult,
}

impl Halt {
    /// Severity tag for the UI: schema problems are errors, an empty
    /// filter result is only a warning.
    pub fn kind(&self) -> &'static str {
        match self {
            Halt::SchemaFailure { .. } => "error",
            Halt::EmptyResult => "warning",
        }
    }

    /// The user-facing message, in the dashboard's display language.
    pub fn message(&self) -> String {
        match self {
            Halt::SchemaFailure { column } => {
                format!("La colonne {} est manquante dans les données.", column)
            }
            Halt::EmptyResult => {
                "Aucune donnée disponible selon les paramètres de filtre actuels !".to_string()
            }
        }
    }
}

/// Everything the presentation layer needs for one successful render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardReport {
    pub row_count: usize,
    pub kpis: KpiSummary,
    pub cost_by_therapy_type: GroupedAggregate,
    pub duration_by_therapist: GroupedAggregate,
}

/// Outcome of one top-to-bottom pipeline pass.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    Report(DashboardReport),
    Halted(Halt),
}

/// Run one render cycle: validate the schema, filter, aggregate.
///
/// Each checkpoint returns a tagged halt instead of exiting control
/// flow, so the caller stops at the first failed stage and surfaces its
/// message. KPI and grouping code only ever sees a non-empty view.
pub fn render(
    dataset: &Dataset,
    schema: &ColumnSchema,
    selection: &FilterSelection,
) -> RenderOutcome {
    if let Some(column) = schema.first_missing_column(dataset) {
        warn!("render halted: missing column {}", column);
        return RenderOutcome::Halted(Halt::SchemaFailure {
            column: column.to_string(),
        });
    }

    let records = dataset.sessions(schema);
    let view = filter::apply(&records, selection);
    if view.is_empty() {
        warn!("render halted: filter selection matched no rows");
        return RenderOutcome::Halted(Halt::EmptyResult);
    }

    RenderOutcome::Report(DashboardReport {
        row_count: view.len(),
        kpis: aggregate::summarize(&view),
        cost_by_therapy_type: aggregate::cost_by_therapy_type(&view),
        duration_by_therapist: aggregate::duration_by_therapist(&view),
    })
}
