//! Table and chart projections of a reading set.
//!
//! These carry data only. Colours, tooltips and layout belong to whatever
//! renders them; each cell already has its classification so the renderer
//! never needs to know the threshold table.

use serde::Serialize;

use crate::classify::classify;
use crate::models::{ClassificationResult, NormalizedReading, Parameter};

// ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub parameter: Parameter,
    pub value: Option<f64>,
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub display_date: String,
    pub display_time: String,
    pub npk: f64,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub record_count: usize,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub display_date: String,
    pub display_time: String,
    pub label: String,
    pub value: Option<f64>,
}

/// One line chart: a single parameter over the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub parameter: Parameter,
    pub title: &'static str,
    pub unit: &'static str,
    pub points: Vec<ChartPoint>,
}

/// Build the classified table, rows in the order given.
pub fn table_view(readings: &[NormalizedReading]) -> TableView {
    // ---
    let rows = readings
        .iter()
        .map(|r| TableRow {
            display_date: r.display_date.clone(),
            display_time: r.display_time.clone(),
            npk: r.npk,
            cells: Parameter::ALL
                .into_iter()
                .map(|parameter| {
                    let value = r.value(parameter);
                    TableCell {
                        parameter,
                        value,
                        classification: classify(parameter, value),
                    }
                })
                .collect(),
        })
        .collect();

    TableView {
        record_count: readings.len(),
        rows,
    }
}

/// Build one series per parameter.
pub fn chart_view(readings: &[NormalizedReading]) -> Vec<ChartSeries> {
    // ---
    Parameter::ALL
        .into_iter()
        .map(|parameter| ChartSeries {
            parameter,
            title: parameter.title(),
            unit: parameter.unit(),
            points: readings
                .iter()
                .map(|r| ChartPoint {
                    display_date: r.display_date.clone(),
                    display_time: r.display_time.clone(),
                    label: r.label(),
                    value: r.value(parameter),
                })
                .collect(),
        })
        .collect()
}
