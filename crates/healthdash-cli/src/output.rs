use console::{style, Color};
use healthdash_query::{BarChart, LineChart};
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Width of the longest bar in the comparison chart
const BAR_WIDTH: usize = 40;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const REGION_COLORS: [Color; 6] =
    [Color::Cyan, Color::Magenta, Color::Green, Color::Yellow, Color::Blue, Color::Red];

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("✓").green().bold(), message);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "message": message.to_string(),
                });
                println!("{:#}", output);
            }
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "info",
                    "message": message.to_string(),
                });
                eprintln!("{:#}", output);
            }
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("⚠").yellow().bold(), message);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "warning",
                    "message": message.to_string(),
                });
                eprintln!("{:#}", output);
            }
        }
    }

    pub fn table<T: Tabled>(&self, data: Vec<T>) {
        // JSON callers emit the same rows through `result`
        if let OutputFormat::Human = self.format {
            if data.is_empty() {
                println!("{}", style("(no data)").dim());
            } else {
                let mut table = Table::new(data);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "data": data,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{}: {}", style(key).bold(), value);
        }
    }

    pub fn section(&self, title: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// One sparkline per country, scaled to the chart's overall range
    pub fn line_chart(&self, chart: &LineChart) {
        if self.is_json() {
            return;
        }

        self.section(&chart.title);
        println!("{}", style(&chart.y_label).dim());

        let values = chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let name_width = chart.series.iter().map(|s| s.country.len()).max().unwrap_or(0);

        for series in &chart.series {
            let spark: String = series.points.iter().map(|p| spark_level(p.value, min, max)).collect();
            let (Some(first), Some(last)) = (series.points.first(), series.points.last()) else {
                continue;
            };
            println!(
                "{:<width$}  {}  {:.1} ({}) → {:.1} ({})",
                series.country,
                style(spark).cyan(),
                first.value,
                first.year,
                last.value,
                last.year,
                width = name_width
            );
        }
    }

    /// Horizontal bars colored by region
    pub fn bar_chart(&self, chart: &BarChart) {
        if self.is_json() {
            return;
        }

        self.section(&chart.title);

        let regions = chart.regions();
        let color_of = |region: &str| {
            let idx = regions.iter().position(|r| *r == region).unwrap_or(0);
            REGION_COLORS[idx % REGION_COLORS.len()]
        };

        let max = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        let name_width = chart.bars.iter().map(|b| b.country.len()).max().unwrap_or(0);

        for bar in &chart.bars {
            let len = if max > 0.0 {
                ((bar.value / max) * BAR_WIDTH as f64).round().max(0.0) as usize
            } else {
                0
            };
            println!(
                "{:<width$}  {} {:.1} {}",
                bar.country,
                style("█".repeat(len)).fg(color_of(bar.region.as_str())),
                bar.value,
                chart.unit,
                width = name_width
            );
        }

        let legend: Vec<String> =
            regions.iter().map(|r| style(format!("■ {}", r)).fg(color_of(*r)).to_string()).collect();
        println!("{}", legend.join("  "));
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

fn spark_level(value: f64, min: f64, max: f64) -> char {
    if max <= min {
        return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
    }
    let ratio = (value - min) / (max - min);
    let idx = (ratio * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
    SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spark_levels_span_range() {
        assert_eq!(spark_level(0.0, 0.0, 10.0), '▁');
        assert_eq!(spark_level(10.0, 0.0, 10.0), '█');
        assert_eq!(spark_level(5.0, 5.0, 5.0), '▅');
    }
}
