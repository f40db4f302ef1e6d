//! One-time CSV loading for the four source tables.
//!
//! Every file is read with all columns as String, header whitespace trimmed,
//! an optional column-rename map applied, required columns checked, and the
//! typed columns cast strictly (a malformed cell fails the load rather than
//! turning into a null).

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use polars::prelude::*;

use crate::error::WageError;
use crate::schema::{category, location, prefecture, wage};

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names and applies optional rename.
pub fn read_csv_as_strings(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, WageError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| file_load(path, e))?
        .finish()
        .map_err(|e| file_load(path, e))?;

    // Trim whitespace from column names
    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    // Apply optional column rename
    if let Some(map) = rename {
        let old: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        let new: Vec<&str> = map.values().map(|s| s.as_str()).collect();
        df = df.lazy().rename(old, new, true).collect()?;
    }

    Ok(df)
}

/// Load the national-by-industry wage table.
///
/// Required columns: year, age_bracket, per_capita_wage, scheduled_wage,
/// special_wage. One row per (year, age_bracket).
pub fn load_national(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, WageError> {
    let raw = read_csv_as_strings(path, rename)?;
    require_columns(
        &raw,
        &[
            wage::YEAR,
            wage::AGE_BRACKET,
            wage::PER_CAPITA_WAGE,
            wage::SCHEDULED_WAGE,
            wage::SPECIAL_WAGE,
        ],
    )?;
    let df = cast_wage_columns(raw, &wage::VALUES).map_err(|e| recast(path, e))?;
    debug!("loaded national wage table: {} rows", df.height());
    Ok(df)
}

/// Load the national-by-industry-category wage table.
///
/// Required columns: the national set plus industry_category.
/// One row per (year, age_bracket, industry_category).
pub fn load_categories(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, WageError> {
    let raw = read_csv_as_strings(path, rename)?;
    require_columns(
        &raw,
        &[
            wage::YEAR,
            wage::AGE_BRACKET,
            category::INDUSTRY_CATEGORY,
            wage::PER_CAPITA_WAGE,
            wage::SCHEDULED_WAGE,
            wage::SPECIAL_WAGE,
        ],
    )?;
    let df = cast_wage_columns(raw, &wage::VALUES).map_err(|e| recast(path, e))?;
    debug!("loaded category wage table: {} rows", df.height());
    Ok(df)
}

/// Load the prefecture-by-industry wage table.
///
/// Required columns: year, age_bracket, prefecture_name, per_capita_wage.
/// One row per (year, age_bracket, prefecture_name).
pub fn load_prefectures(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, WageError> {
    let raw = read_csv_as_strings(path, rename)?;
    require_columns(
        &raw,
        &[
            wage::YEAR,
            wage::AGE_BRACKET,
            prefecture::PREFECTURE_NAME,
            wage::PER_CAPITA_WAGE,
        ],
    )?;
    let df = cast_wage_columns(raw, &[wage::PER_CAPITA_WAGE]).map_err(|e| recast(path, e))?;
    debug!("loaded prefecture wage table: {} rows", df.height());
    Ok(df)
}

/// Load the prefecture-to-coordinate lookup table.
///
/// File columns: pref_name, lat, lon. `pref_name` is renamed to
/// `prefecture_name` so the map join key matches the wage table.
pub fn load_locations(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, WageError> {
    let mut raw = read_csv_as_strings(path, rename)?;

    if raw.column(location::PREF_NAME).is_ok() {
        raw = raw
            .lazy()
            .rename([location::PREF_NAME], [prefecture::PREFECTURE_NAME], true)
            .collect()?;
    }
    require_columns(
        &raw,
        &[
            prefecture::PREFECTURE_NAME,
            location::LATITUDE,
            location::LONGITUDE,
        ],
    )?;

    let df = raw
        .lazy()
        .with_columns([
            col(location::LATITUDE).strict_cast(DataType::Float64),
            col(location::LONGITUDE).strict_cast(DataType::Float64),
        ])
        .collect()
        .map_err(|e| recast(path, WageError::Polars(e)))?;
    debug!("loaded location table: {} rows", df.height());
    Ok(df)
}

pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), WageError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(WageError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Cast `year` to Int64 and the given wage columns to Float64.
fn cast_wage_columns(df: DataFrame, value_cols: &[&str]) -> Result<DataFrame, WageError> {
    let mut exprs = vec![col(wage::YEAR)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .strict_cast(DataType::Int64)];
    for &c in value_cols {
        exprs.push(
            col(c)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .strict_cast(DataType::Float64),
        );
    }
    Ok(df.lazy().with_columns(exprs).collect()?)
}

fn file_load(path: &Path, source: polars::error::PolarsError) -> WageError {
    WageError::FileLoad {
        file: path.display().to_string(),
        source,
    }
}

/// A cast failure means a malformed cell, which is a load failure for the
/// file, not a pipeline error.
fn recast(path: &Path, err: WageError) -> WageError {
    match err {
        WageError::Polars(source) => file_load(path, source),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn national_load_casts_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "national_wage.csv",
            "year,age_bracket,per_capita_wage,scheduled_wage,special_wage\n\
             2019,all_ages,400.5,300.1,80.2\n\
             2018,all_ages,395.0,298.0,78.0\n",
        );

        let df = load_national(&path, None).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(
            df.column("per_capita_wage").unwrap().dtype(),
            &DataType::Float64
        );
        assert_eq!(df.column("age_bracket").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn rename_map_applies_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "pref.csv",
            "fiscal_year,age_bracket,prefecture_name,per_capita_wage\n2019,all_ages,Tokyo,620.0\n",
        );

        let rename: HashMap<String, String> =
            [("fiscal_year".to_string(), "year".to_string())].into();
        let df = load_prefectures(&path, Some(rename)).unwrap();
        assert!(df.column("year").is_ok());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "national_wage.csv",
            "year,age_bracket,per_capita_wage\n2019,all_ages,400.0\n",
        );

        let err = load_national(&path, None).unwrap_err();
        match err {
            WageError::MissingColumn(name) => assert_eq!(name, "scheduled_wage"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn malformed_cell_fails_as_file_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "prefecture_wage.csv",
            "year,age_bracket,prefecture_name,per_capita_wage\n2019,all_ages,Tokyo,not-a-number\n",
        );

        let err = load_prefectures(&path, None).unwrap_err();
        match err {
            WageError::FileLoad { file, .. } => assert!(file.ends_with("prefecture_wage.csv")),
            other => panic!("expected FileLoad, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_locations(&path, None).unwrap_err();
        match err {
            WageError::FileLoad { file, .. } => assert!(file.ends_with("nope.csv")),
            other => panic!("expected FileLoad, got {other:?}"),
        }
    }

    #[test]
    fn location_load_renames_pref_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "pref_lat_lon.csv",
            "pref_name,lat,lon\nTokyo,35.689185,139.691648\nOsaka,34.686316,135.519711\n",
        );

        let df = load_locations(&path, None).unwrap();
        assert!(df.column("prefecture_name").is_ok());
        assert!(df.column("pref_name").is_err());
        assert_eq!(df.column("lon").unwrap().dtype(), &DataType::Float64);
    }
}
