//! Delimited text (CSV/TSV) source reader

use std::fs;
use std::path::Path;

use crate::error::{HealthError, Result};
use crate::formats::validation::{SourceValidation, SourceValidator};
use crate::formats::{SourceEncoding, SourceLayout, SourceReader, SourceRecord, SourceTable};

/// Reader for long-form indicator tables in delimited text files
#[derive(Debug, Clone, Default)]
pub struct CsvSourceReader {
    layout: SourceLayout,
}

impl CsvSourceReader {
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    /// Decode the raw file bytes using the configured encoding
    fn decode(&self, path: &Path, bytes: Vec<u8>) -> Result<String> {
        match self.layout.encoding {
            SourceEncoding::Utf8 => {
                let text = String::from_utf8(bytes).map_err(|e| HealthError::SourceMalformed {
                    path: path.to_path_buf(),
                    reason: format!("File is not valid UTF-8: {}", e),
                })?;
                Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
            }
            // Every Latin-1 byte maps to the Unicode code point of the same value
            SourceEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    fn parse(&self, path: &Path, text: &str) -> Result<(Vec<SourceRecord>, usize)> {
        let malformed = |reason: String| HealthError::SourceMalformed {
            path: path.to_path_buf(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.layout.delimiter)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| malformed(format!("Cannot read header row: {}", e)))?
            .clone();
        let header_names: Vec<&str> = headers.iter().collect();

        let columns = &self.layout.columns;
        let mut required = vec![
            columns.country.as_str(),
            columns.year.as_str(),
            columns.metric.as_str(),
            columns.value.as_str(),
        ];
        if let Some(filter) = &self.layout.row_filter {
            required.push(filter.column.as_str());
        }

        let missing = SourceValidator::missing_columns(&header_names, &required);
        if !missing.is_empty() {
            return Err(malformed(format!("Missing expected columns: {}", missing.join(", "))));
        }

        let position = |name: &str| header_names.iter().position(|h| *h == name).unwrap_or(0);
        let country_idx = position(columns.country.as_str());
        let year_idx = position(columns.year.as_str());
        let metric_idx = position(columns.metric.as_str());
        let value_idx = position(columns.value.as_str());
        let filter = self
            .layout
            .row_filter
            .as_ref()
            .map(|f| (position(f.column.as_str()), f.equals.as_str()));

        let mut records = Vec::new();
        let mut filtered_out = 0;

        for (idx, result) in rdr.records().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let record = result.map_err(|e| malformed(format!("Line {}: {}", line, e)))?;
            let field = |i: usize| record.get(i).unwrap_or("");

            if let Some((filter_idx, expected)) = filter {
                if field(filter_idx) != expected {
                    filtered_out += 1;
                    continue;
                }
            }

            let country = field(country_idx);
            if country.is_empty() {
                return Err(malformed(format!("Line {}: empty country", line)));
            }

            let year = field(year_idx).parse::<i32>().map_err(|_| {
                malformed(format!("Line {}: invalid year '{}'", line, field(year_idx)))
            })?;

            let value = field(value_idx)
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    malformed(format!("Line {}: invalid value '{}'", line, field(value_idx)))
                })?;

            records.push(SourceRecord {
                country: country.to_string(),
                year,
                metric: field(metric_idx).to_string(),
                value,
            });
        }

        Ok((records, filtered_out))
    }
}

impl SourceReader for CsvSourceReader {
    fn read(&self, path: &Path) -> Result<SourceTable> {
        let bytes = fs::read(path).map_err(|e| HealthError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let text = self.decode(path, bytes)?;
        let (records, filtered_out) = self.parse(path, &text)?;

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();

        tracing::debug!(
            "Read {} records from {} ({} filtered out)",
            records.len(),
            path.display(),
            filtered_out
        );

        Ok(SourceTable { name, records, filtered_out })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["csv", "tsv", "txt"]
    }

    fn format_name(&self) -> &str {
        "Delimited text"
    }

    fn validate(&self, path: &Path) -> SourceValidation {
        let validation = SourceValidator::validate_file_exists(path);
        if !validation.is_valid() {
            return validation;
        }
        validation.merge(SourceValidator::validate_extension(path, self.supported_extensions()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{ColumnMapping, RowFilter};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_who_export() {
        let file = write_file(
            b"GHO (CODE),GHO (DISPLAY),YEAR,COUNTRY,Numeric\n\
              WHOSIS_000001,Life expectancy at birth (years),2000,Japan,81.1\n\
              WHOSIS_000001,Life expectancy at birth (years),2001,Japan,81.4\n",
        );

        let table = CsvSourceReader::default().read(file.path()).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].country, "Japan");
        assert_eq!(table.records[0].year, 2000);
        assert_eq!(table.records[1].metric, "Life expectancy at birth (years)");
        assert!((table.records[1].value - 81.4).abs() < 1e-9);
        assert_eq!(table.filtered_out, 0);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = CsvSourceReader::default().read(Path::new("/nonexistent/who.csv"));
        assert!(matches!(result, Err(HealthError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let file = write_file(b"COUNTRY,YEAR,Numeric\nJapan,2000,81.1\n");

        let result = CsvSourceReader::default().read(file.path());
        match result {
            Err(HealthError::SourceMalformed { reason, .. }) => {
                assert!(reason.contains("GHO (DISPLAY)"));
            }
            other => panic!("expected SourceMalformed, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_value_is_malformed() {
        let file = write_file(b"COUNTRY,YEAR,GHO (DISPLAY),Numeric\nJapan,2000,LE,n/a\n");

        let result = CsvSourceReader::default().read(file.path());
        assert!(matches!(result, Err(HealthError::SourceMalformed { .. })));
    }

    #[test]
    fn test_custom_layout() {
        let file = write_file(
            b"Location;Period;Indicator;Dim1;FactValueNumeric\n\
              Kenya;2010;LE;Both sexes;60.5\n\
              Kenya;2010;LE;Male;58.0\n",
        );

        let reader = CsvSourceReader::new(SourceLayout {
            delimiter: b';',
            encoding: SourceEncoding::Utf8,
            columns: ColumnMapping {
                country: "Location".to_string(),
                year: "Period".to_string(),
                metric: "Indicator".to_string(),
                value: "FactValueNumeric".to_string(),
            },
            row_filter: Some(RowFilter {
                column: "Dim1".to_string(),
                equals: "Both sexes".to_string(),
            }),
        });

        let table = reader.read(file.path()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.filtered_out, 1);
        assert!((table.records[0].value - 60.5).abs() < 1e-9);
    }

    #[test]
    fn test_latin1_encoding() {
        // "Côte d'Ivoire" with 0xF4 for 'ô'
        let mut content = b"COUNTRY,YEAR,GHO (DISPLAY),Numeric\nC".to_vec();
        content.push(0xF4);
        content.extend_from_slice(b"te d'Ivoire,2000,LE,50.1\n");
        let file = write_file(&content);

        let utf8 = CsvSourceReader::default().read(file.path());
        assert!(matches!(utf8, Err(HealthError::SourceMalformed { .. })));

        let reader = CsvSourceReader::new(SourceLayout {
            encoding: SourceEncoding::Latin1,
            ..SourceLayout::default()
        });
        let table = reader.read(file.path()).unwrap();
        assert_eq!(table.records[0].country, "Côte d'Ivoire");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let file = write_file(b"\xEF\xBB\xBFCOUNTRY,YEAR,GHO (DISPLAY),Numeric\nJapan,2000,LE,81.1\n");
        let table = CsvSourceReader::default().read(file.path()).unwrap();
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let file = write_file(b"COUNTRY,YEAR,GHO (DISPLAY),Numeric\nJapan,2000,LE\n");
        let result = CsvSourceReader::default().read(file.path());
        assert!(matches!(result, Err(HealthError::SourceMalformed { .. })));
    }
}
