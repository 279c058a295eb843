//! Chart descriptions built from a filter result
//!
//! These are plain data; rendering is up to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::models::FilterResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub year: i32,
    pub value: f64,
}

/// One line per country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub country: String,
    pub points: Vec<ChartPoint>,
}

/// Time-series chart of the selected metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub y_label: String,
    /// Whether points use the indexed scale (first year = 100)
    pub indexed: bool,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub country: String,
    pub region: String,
    pub value: f64,
}

/// Country comparison at the upper year of the range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub year: i32,
    pub unit: String,
    /// Bars sorted by value, highest first
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Distinct regions in bar order, one legend entry each
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for bar in &self.bars {
            if !regions.contains(&bar.region.as_str()) {
                regions.push(&bar.region);
            }
        }
        regions
    }
}

/// Line chart with one series per selected country that has data
pub fn line_chart(result: &FilterResult, indexed: bool) -> LineChart {
    let plan = &result.plan;

    let series = result
        .selection
        .iter()
        .filter_map(|country| {
            let mut points: Vec<ChartPoint> = result
                .rows
                .iter()
                .filter(|o| &o.country == country)
                .filter_map(|o| {
                    let value = if indexed { o.value_indexed? } else { o.value };
                    Some(ChartPoint { year: o.year, value })
                })
                .collect();

            if points.is_empty() {
                return None;
            }
            points.sort_by_key(|p| p.year);
            Some(LineSeries { country: country.clone(), points })
        })
        .collect();

    let y_label = if indexed {
        "Index (first year = 100)".to_string()
    } else {
        format!("{} ({})", plan.metric, result.summary.unit)
    };

    LineChart {
        title: format!("{} ({})", plan.metric, plan.years),
        y_label,
        indexed,
        series,
    }
}

/// Bar chart of the values at the upper year, `None` when no row has that year
pub fn bar_chart(result: &FilterResult) -> Option<BarChart> {
    let year = result.plan.years.to;

    let mut bars: Vec<Bar> = result
        .rows
        .iter()
        .filter(|o| o.year == year)
        .map(|o| Bar { country: o.country.clone(), region: o.who_region.clone(), value: o.value })
        .collect();

    if bars.is_empty() {
        return None;
    }
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));

    Some(BarChart {
        title: format!("{} in {}", result.plan.metric, year),
        year,
        unit: result.summary.unit.clone(),
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::QueryEngine;
    use crate::models::{FilterPlan, YearRange};
    use healthdash_core::models::{DataQuality, Dataset, DevelopmentTier, Observation};

    fn obs(country: &str, year: i32, value: f64, region: &str) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            metric: "Life Expectancy".to_string(),
            value,
            unit: "years".to_string(),
            who_region: region.to_string(),
            development_level: DevelopmentTier::Mixed,
            data_quality: DataQuality::Synthetic,
            value_indexed: Some(value / 2.0),
        }
    }

    fn result(dataset: &Dataset, years: YearRange) -> FilterResult {
        let plan = FilterPlan::new("Life Expectancy", years).with_countries(["Japan", "Brazil", "Chad"]);
        QueryEngine::new(dataset).execute(&plan).result().unwrap().clone()
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            obs("Japan", 2020, 84.6, "WPRO"),
            obs("Japan", 2010, 82.9, "WPRO"),
            obs("Brazil", 2010, 73.6, "AMRO"),
            obs("Brazil", 2020, 75.9, "AMRO"),
        ])
    }

    #[test]
    fn test_line_chart_sorted_by_year() {
        let dataset = dataset();
        let chart = line_chart(&result(&dataset, YearRange::new(2010, 2020)), false);

        assert_eq!(chart.title, "Life Expectancy (2010-2020)");
        assert_eq!(chart.y_label, "Life Expectancy (years)");
        // Chad has no rows and gets no line
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].country, "Japan");
        assert_eq!(
            chart.series[0].points,
            vec![ChartPoint { year: 2010, value: 82.9 }, ChartPoint { year: 2020, value: 84.6 }]
        );
    }

    #[test]
    fn test_line_chart_indexed_scale() {
        let dataset = dataset();
        let chart = line_chart(&result(&dataset, YearRange::new(2010, 2020)), true);

        assert!(chart.indexed);
        assert_eq!(chart.series[1].points[0].value, 73.6 / 2.0);
    }

    #[test]
    fn test_bar_chart_descending() {
        let dataset = dataset();
        let chart = bar_chart(&result(&dataset, YearRange::new(2010, 2020))).unwrap();

        assert_eq!(chart.title, "Life Expectancy in 2020");
        assert_eq!(chart.bars[0].country, "Japan");
        assert_eq!(chart.bars[1].country, "Brazil");
        assert_eq!(chart.regions(), vec!["WPRO", "AMRO"]);
    }

    #[test]
    fn test_bar_chart_absent_without_upper_year() {
        let dataset = dataset();
        assert!(bar_chart(&result(&dataset, YearRange::new(2005, 2015))).is_none());
    }
}
