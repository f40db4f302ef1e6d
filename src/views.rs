//! The four derived views the dashboard renders.
//!
//! Every function here is a pure function of the loaded snapshots plus the
//! current UI selection; nothing is cached and the inputs are never mutated,
//! so identical calls yield identical frames.

use std::collections::BTreeSet;

use log::{debug, warn};
use polars::prelude::*;

use crate::error::WageError;
use crate::schema::{age, category, defaults, derived, location, prefecture, wage};

/// Which wage column a bar chart ranks industries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WageField {
    PerCapita,
    Scheduled,
    Special,
}

impl WageField {
    pub fn column(self) -> &'static str {
        match self {
            WageField::PerCapita => wage::PER_CAPITA_WAGE,
            WageField::Scheduled => wage::SCHEDULED_WAGE,
            WageField::Special => wage::SPECIAL_WAGE,
        }
    }

    /// Parse one of the schema field-name constants.
    pub fn parse(name: &str) -> Result<Self, WageError> {
        match name {
            wage::PER_CAPITA_WAGE => Ok(WageField::PerCapita),
            wage::SCHEDULED_WAGE => Ok(WageField::Scheduled),
            wage::SPECIAL_WAGE => Ok(WageField::Special),
            other => Err(WageError::InvalidSelection {
                what: "wage field",
                value: other.to_string(),
            }),
        }
    }
}

/// Bar view: the filtered rows plus the derived x-axis upper bound.
#[derive(Debug)]
pub struct BarView {
    pub frame: DataFrame,
    pub axis_bound: f64,
}

// ── Map view ────────────────────────────────────────────────────────────────

/// Heat-map input: prefecture wages for one (year, bracket) joined with
/// coordinates, plus a min-max normalized weight column.
///
/// Wage rows without a matching coordinate row are dropped by the inner
/// join; the drop is counted and logged.
pub fn build_map_view(
    prefectures: &DataFrame,
    locations: &DataFrame,
    year: i64,
    bracket: &str,
) -> Result<DataFrame, WageError> {
    let filtered = prefectures
        .clone()
        .lazy()
        .filter(
            col(wage::AGE_BRACKET)
                .eq(lit(bracket))
                .and(col(wage::YEAR).eq(lit(year))),
        )
        .collect()?;

    let joined = filtered
        .clone()
        .lazy()
        .join(
            locations.clone().lazy().select([
                col(prefecture::PREFECTURE_NAME),
                col(location::LONGITUDE),
                col(location::LATITUDE),
            ]),
            [col(prefecture::PREFECTURE_NAME)],
            [col(prefecture::PREFECTURE_NAME)],
            JoinArgs::new(JoinType::Inner),
        )
        .select([
            col(prefecture::PREFECTURE_NAME),
            col(location::LONGITUDE),
            col(location::LATITUDE),
            col(wage::PER_CAPITA_WAGE),
        ])
        .collect()?;

    if joined.height() < filtered.height() {
        warn!(
            "map view: {} prefecture wage rows have no coordinates and were dropped",
            filtered.height() - joined.height()
        );
    }
    debug!("map view: {} rows for year {}", joined.height(), year);

    min_max_normalize(joined, wage::PER_CAPITA_WAGE, derived::NORMALIZED_WAGE)
}

/// Append `dst` = (`src` - min) / (max - min) over the whole frame.
///
/// When every value is equal (max == min) the weights fall back to 0.0
/// instead of dividing by zero; an empty frame stays empty.
pub fn min_max_normalize(
    df: DataFrame,
    src: &str,
    dst: &str,
) -> Result<DataFrame, WageError> {
    let values = df.column(src)?.f64()?;
    let normalized = match (values.min(), values.max()) {
        (Some(lo), Some(hi)) if hi > lo => values.apply_values(|v| (v - lo) / (hi - lo)),
        _ => values.apply_values(|_| 0.0),
    };

    let mut series = normalized.into_series();
    series.rename(dst.into());

    let mut out = df;
    out.with_column(series)?;
    Ok(out)
}

// ── Trend view ──────────────────────────────────────────────────────────────

/// National vs one prefecture, all-ages wage by year, ascending.
///
/// Output columns: year, national_wage, prefecture_wage. Years present in
/// only one of the two series are omitted (inner join).
pub fn build_trend_view(
    national: &DataFrame,
    prefectures: &DataFrame,
    selected_prefecture: &str,
) -> Result<DataFrame, WageError> {
    let known = prefecture_options(prefectures)?;
    if !known.iter().any(|p| p == selected_prefecture) {
        return Err(WageError::InvalidSelection {
            what: "prefecture",
            value: selected_prefecture.to_string(),
        });
    }

    let national_series = national
        .clone()
        .lazy()
        .filter(col(wage::AGE_BRACKET).eq(lit(age::ALL_AGES)))
        .select([
            col(wage::YEAR),
            col(wage::PER_CAPITA_WAGE).alias(derived::NATIONAL_WAGE),
        ]);

    let prefecture_series = prefectures
        .clone()
        .lazy()
        .filter(
            col(wage::AGE_BRACKET)
                .eq(lit(age::ALL_AGES))
                .and(col(prefecture::PREFECTURE_NAME).eq(lit(selected_prefecture))),
        )
        .select([
            col(wage::YEAR),
            col(wage::PER_CAPITA_WAGE).alias(derived::PREFECTURE_WAGE),
        ]);

    let df = national_series
        .join(
            prefecture_series,
            [col(wage::YEAR)],
            [col(wage::YEAR)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort([wage::YEAR], SortMultipleOptions::default())
        .collect()?;

    debug!(
        "trend view: {} years for '{}'",
        df.height(),
        selected_prefecture
    );
    Ok(df)
}

// ── Bubble view ─────────────────────────────────────────────────────────────

/// Per-bracket national wages with the all-ages aggregate excluded; one
/// animation frame per year, grouped by age bracket.
pub fn build_age_bubble_view(national: &DataFrame) -> Result<DataFrame, WageError> {
    let df = national
        .clone()
        .lazy()
        .filter(col(wage::AGE_BRACKET).neq(lit(age::ALL_AGES)))
        .select([
            col(wage::YEAR),
            col(wage::AGE_BRACKET),
            col(wage::PER_CAPITA_WAGE),
            col(wage::SPECIAL_WAGE),
            col(wage::SCHEDULED_WAGE),
        ])
        .collect()?;
    Ok(df)
}

// ── Bar view ────────────────────────────────────────────────────────────────

/// Per-industry wages for one year; one animation frame per age bracket.
/// The x-axis bound is the selected column's maximum plus a fixed margin.
pub fn build_industry_bar_view(
    categories: &DataFrame,
    selected_year: i64,
    field: WageField,
) -> Result<BarView, WageError> {
    let known = year_options(categories)?;
    if !known.contains(&selected_year) {
        return Err(WageError::InvalidSelection {
            what: "year",
            value: selected_year.to_string(),
        });
    }

    let frame = categories
        .clone()
        .lazy()
        .filter(col(wage::YEAR).eq(lit(selected_year)))
        .select([
            col(category::INDUSTRY_CATEGORY),
            col(wage::AGE_BRACKET),
            col(field.column()),
        ])
        .collect()?;

    let max = frame.column(field.column())?.f64()?.max().unwrap_or(0.0);
    let axis_bound = max + defaults::BAR_AXIS_MARGIN;

    Ok(BarView { frame, axis_bound })
}

// ── Selector options ────────────────────────────────────────────────────────

/// Sorted distinct prefecture names, for the host's select box.
pub fn prefecture_options(prefectures: &DataFrame) -> Result<Vec<String>, WageError> {
    let names = prefectures
        .column(prefecture::PREFECTURE_NAME)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect::<BTreeSet<String>>();
    Ok(names.into_iter().collect())
}

/// Sorted distinct aggregation years, for the host's select box.
pub fn year_options(categories: &DataFrame) -> Result<Vec<i64>, WageError> {
    let years = categories
        .column(wage::YEAR)?
        .i64()?
        .into_iter()
        .flatten()
        .collect::<BTreeSet<i64>>();
    Ok(years.into_iter().collect())
}

/// The three wage field names, in the order the dashboard offers them.
pub fn wage_field_options() -> Vec<String> {
    wage::VALUES.iter().map(|s| s.to_string()).collect()
}
