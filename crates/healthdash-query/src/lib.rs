//! HealthDash Query - Filtering, summary statistics and chart descriptions
//!
//! This crate implements the query use cases over a loaded dataset: selecting
//! one metric for a set of countries and a year range, computing the KPIs, and
//! describing the charts a presentation layer draws.

pub mod chart;
pub mod engine;
pub mod models;
pub mod options;

pub use chart::{bar_chart, line_chart, Bar, BarChart, ChartPoint, LineChart, LineSeries};
pub use engine::QueryEngine;
pub use models::{
    CountryLatest, FilterOutcome, FilterPlan, FilterResult, SummaryStats, YearRange, ALL_REGIONS,
};
pub use options::SelectionOptions;
