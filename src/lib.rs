/*!
# Therapy Session Dashboard

A single-page reporting dashboard for therapy-session records, built in
Rust.

## Overview

The application reads a workbook of therapy sessions, lets the user
filter by therapist and therapy type, and shows three headline numbers
(total cost, average duration, average participants) alongside two bar
charts (cost by therapy type, duration by therapist).

The pipeline is strictly linear and re-runs on every interaction:

1. **Loader** — reads the configured sheet into an in-memory table,
   normalizing column headers; failures degrade to an empty table plus a
   user-visible message. The read is memoized per (path, mtime).
2. **Validator** — checks the five required columns, halting the render
   on the first missing one.
3. **Filter** — keeps the rows whose therapist AND therapy type are in
   the user's selection sets; an empty result halts with a warning.
4. **Aggregation** — the KPI block and the two grouped sums.
5. **Presentation** — axum handlers serving the page, the JSON report,
   and the plotters-rendered chart PNGs.

## Modules

- **config**: workbook path, sheet name, bind address
- **dataset**: the in-memory table, header normalization, typed records
- **schema**: required-column validation
- **loader**: workbook reading and the dataset cache
- **filter**: selection sets and the filtered view
- **aggregate**: KPIs and grouped aggregates
- **pipeline**: the checkpointed render driver
- **charts**: bar-chart PNG rendering
- **app**: routing and handlers
*/

pub mod aggregate;
pub mod app;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod schema;

pub use aggregate::{GroupedAggregate, KpiSummary};
pub use config::DashboardConfig;
pub use dataset::{Dataset, SessionRecord, Value};
pub use filter::{FilterSelection, FilteredView};
pub use loader::DatasetCache;
pub use pipeline::{DashboardReport, Halt, RenderOutcome};
pub use schema::ColumnSchema;
