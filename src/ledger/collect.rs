use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use super::error::RecordError;
use super::normalize::{LoadFilter, LoadReport, normalize_records};
use super::parse::{RawRecord, parse_csv, parse_json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "cannot tell the format of {}; expected a .csv or .json file",
                path.display()
            ),
        }
    }
}

pub fn read_source(path: &Path) -> Result<(Vec<RawRecord>, Vec<RecordError>)> {
    let format = SourceFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger source {}", path.display()))?;
    let source_name = path.display().to_string();

    match format {
        SourceFormat::Csv => parse_csv(&source_name, &text),
        SourceFormat::Json => parse_json(&source_name, &text),
    }
}

pub fn load_sources(paths: &[PathBuf], filter: &LoadFilter) -> Result<LoadReport> {
    if paths.is_empty() {
        bail!("no ledger sources given");
    }

    let mut raws = Vec::new();
    let mut malformed = Vec::new();
    for path in paths {
        let (records, errors) = read_source(path)?;
        info!(
            source = %path.display(),
            rows = records.len(),
            malformed = errors.len(),
            "read ledger source"
        );
        raws.extend(records);
        malformed.extend(errors);
    }

    let mut report = normalize_records(&raws, filter);
    malformed.append(&mut report.rejected);
    report.rejected = malformed;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("data/ledger.CSV")).expect("csv"),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("extra.json")).expect("json"),
            SourceFormat::Json
        );
        assert!(SourceFormat::from_path(Path::new("ledger.xlsx")).is_err());
    }

    #[test]
    fn empty_source_list_is_an_error() {
        assert!(load_sources(&[], &LoadFilter::default()).is_err());
    }
}
