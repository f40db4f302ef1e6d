use std::collections::HashMap;
use std::path::PathBuf;

use polars::prelude::*;

use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::error::WageError;
use crate::schema::{age, defaults};
use crate::tables;
use crate::views::{self, WageField};
use crate::visualization::{
    self, BarChartConfig, BubbleChartConfig, MapChartConfig, TrendChartConfig,
};

/// Host-facing dashboard model.
///
/// Holds the four source tables as load-once, read-only snapshots; every
/// build/render call recomputes its view from the snapshots plus the
/// selection parameters the host passes in.
#[pyclass]
pub struct WageModel {
    base_path: PathBuf,
    national: Option<DataFrame>,
    categories: Option<DataFrame>,
    prefectures: Option<DataFrame>,
    locations: Option<DataFrame>,
}

#[pymethods]
impl WageModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            base_path: PathBuf::from(base_path),
            national: None,
            categories: None,
            prefectures: None,
            locations: None,
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load any CSV into a Polars DataFrame with all columns as strings.
    /// Optionally rename columns via a map.
    #[pyo3(signature = (filename, rename=None))]
    fn load_csv(
        &self,
        filename: &str,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<PyDataFrame> {
        let df = tables::read_csv_as_strings(&self.base_path.join(filename), rename)?;
        Ok(PyDataFrame(df))
    }

    /// Load the national-by-industry wage table (one row per year × age
    /// bracket). The rename map lets hosts with differently-labelled exports
    /// adapt the headers before validation.
    #[pyo3(signature = (filename=None, rename=None))]
    fn load_national(
        &mut self,
        filename: Option<&str>,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or(defaults::NATIONAL_FILE);
        let df = tables::load_national(&self.base_path.join(fname), rename)?;
        self.national = Some(df.clone());
        Ok(PyDataFrame(df))
    }

    /// Load the national-by-industry-category wage table (one row per
    /// year × age bracket × industry category).
    #[pyo3(signature = (filename=None, rename=None))]
    fn load_categories(
        &mut self,
        filename: Option<&str>,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or(defaults::CATEGORY_FILE);
        let df = tables::load_categories(&self.base_path.join(fname), rename)?;
        self.categories = Some(df.clone());
        Ok(PyDataFrame(df))
    }

    /// Load the prefecture-by-industry wage table (one row per year × age
    /// bracket × prefecture).
    #[pyo3(signature = (filename=None, rename=None))]
    fn load_prefectures(
        &mut self,
        filename: Option<&str>,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or(defaults::PREFECTURE_FILE);
        let df = tables::load_prefectures(&self.base_path.join(fname), rename)?;
        self.prefectures = Some(df.clone());
        Ok(PyDataFrame(df))
    }

    /// Load the prefecture-to-coordinate lookup table.
    #[pyo3(signature = (filename=None, rename=None))]
    fn load_locations(
        &mut self,
        filename: Option<&str>,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or(defaults::LOCATION_FILE);
        let df = tables::load_locations(&self.base_path.join(fname), rename)?;
        self.locations = Some(df.clone());
        Ok(PyDataFrame(df))
    }

    /// Load all four tables under their default file names.
    ///
    /// Meant for dashboard startup: any failure aborts with an error naming
    /// the offending file.
    fn load_all(&mut self) -> PyResult<()> {
        self.load_national(None, None)?;
        self.load_categories(None, None)?;
        self.load_prefectures(None, None)?;
        self.load_locations(None, None)?;
        Ok(())
    }

    // ── Derived views ───────────────────────────────────────────────────────

    /// Heat-map view: prefecture wages joined with coordinates plus a
    /// min-max normalized weight column. Defaults to the 2019 all-ages
    /// snapshot the dashboard opens with.
    #[pyo3(signature = (year=None, age_bracket=None))]
    fn build_map_view(&self, year: Option<i64>, age_bracket: Option<&str>) -> PyResult<PyDataFrame> {
        let df = views::build_map_view(
            self.prefectures()?,
            self.locations()?,
            year.unwrap_or(defaults::MAP_YEAR),
            age_bracket.unwrap_or(age::ALL_AGES),
        )?;
        Ok(PyDataFrame(df))
    }

    /// Trend view: national vs one prefecture, all-ages wage by year.
    fn build_trend_view(&self, prefecture: &str) -> PyResult<PyDataFrame> {
        let df = views::build_trend_view(self.national()?, self.prefectures()?, prefecture)?;
        Ok(PyDataFrame(df))
    }

    /// Bubble view: per-bracket national wages, all-ages row excluded.
    fn build_age_bubble_view(&self) -> PyResult<PyDataFrame> {
        let df = views::build_age_bubble_view(self.national()?)?;
        Ok(PyDataFrame(df))
    }

    /// Bar view for one year and wage field. Returns the rows plus the
    /// derived x-axis bound (field maximum plus the fixed margin).
    fn build_industry_bar_view(
        &self,
        year: i64,
        wage_field: &str,
    ) -> PyResult<(PyDataFrame, f64)> {
        let field = WageField::parse(wage_field)?;
        let view = views::build_industry_bar_view(self.categories()?, year, field)?;
        Ok((PyDataFrame(view.frame), view.axis_bound))
    }

    // ── Selector options ────────────────────────────────────────────────────

    /// Sorted distinct prefecture names for the host's select box.
    fn prefecture_options(&self) -> PyResult<Vec<String>> {
        Ok(views::prefecture_options(self.prefectures()?)?)
    }

    /// Sorted distinct aggregation years for the host's select box.
    fn year_options(&self) -> PyResult<Vec<i64>> {
        Ok(views::year_options(self.categories()?)?)
    }

    /// The three wage field names, in display order.
    #[staticmethod]
    fn wage_field_options() -> Vec<String> {
        views::wage_field_options()
    }

    // ── Visualization ───────────────────────────────────────────────────────

    /// Render the heat map as a self-contained HTML fragment.
    ///
    /// Use with `st.components.v1.html(model.render_map())` or
    /// `IPython.display.HTML` in a notebook.
    #[pyo3(signature = (year=None, age_bracket=None, opacity=None, threshold=None))]
    fn render_map(
        &self,
        year: Option<i64>,
        age_bracket: Option<&str>,
        opacity: Option<f64>,
        threshold: Option<f64>,
    ) -> PyResult<String> {
        let view = views::build_map_view(
            self.prefectures()?,
            self.locations()?,
            year.unwrap_or(defaults::MAP_YEAR),
            age_bracket.unwrap_or(age::ALL_AGES),
        )?;
        let mut config = MapChartConfig::default();
        if let Some(o) = opacity {
            config.opacity = o;
        }
        if let Some(t) = threshold {
            config.threshold = t;
        }
        Ok(visualization::generate_map_html(&view, &config)?)
    }

    /// Render the national-vs-prefecture line chart.
    fn render_trend(&self, prefecture: &str) -> PyResult<String> {
        let view = views::build_trend_view(self.national()?, self.prefectures()?, prefecture)?;
        Ok(visualization::generate_trend_html(
            &view,
            prefecture,
            &TrendChartConfig::default(),
        )?)
    }

    /// Render the animated age-bracket bubble chart.
    fn render_bubble(&self) -> PyResult<String> {
        let view = views::build_age_bubble_view(self.national()?)?;
        Ok(visualization::generate_bubble_html(
            &view,
            &BubbleChartConfig::default(),
        )?)
    }

    /// Render the animated per-industry bar chart.
    fn render_bar(&self, year: i64, wage_field: &str) -> PyResult<String> {
        let field = WageField::parse(wage_field)?;
        let view = views::build_industry_bar_view(self.categories()?, year, field)?;
        Ok(visualization::generate_bar_html(
            &view,
            field,
            &BarChartConfig::default(),
        )?)
    }

    // ── Properties ──────────────────────────────────────────────────────────

    #[getter]
    fn national_df(&self) -> PyResult<Option<PyDataFrame>> {
        Ok(self.national.clone().map(PyDataFrame))
    }

    #[getter]
    fn categories_df(&self) -> PyResult<Option<PyDataFrame>> {
        Ok(self.categories.clone().map(PyDataFrame))
    }

    #[getter]
    fn prefectures_df(&self) -> PyResult<Option<PyDataFrame>> {
        Ok(self.prefectures.clone().map(PyDataFrame))
    }

    #[getter]
    fn locations_df(&self) -> PyResult<Option<PyDataFrame>> {
        Ok(self.locations.clone().map(PyDataFrame))
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

impl WageModel {
    fn national(&self) -> Result<&DataFrame, WageError> {
        self.national
            .as_ref()
            .ok_or_else(|| WageError::NotLoaded("national".into()))
    }

    fn categories(&self) -> Result<&DataFrame, WageError> {
        self.categories
            .as_ref()
            .ok_or_else(|| WageError::NotLoaded("categories".into()))
    }

    fn prefectures(&self) -> Result<&DataFrame, WageError> {
        self.prefectures
            .as_ref()
            .ok_or_else(|| WageError::NotLoaded("prefectures".into()))
    }

    fn locations(&self) -> Result<&DataFrame, WageError> {
        self.locations
            .as_ref()
            .ok_or_else(|| WageError::NotLoaded("locations".into()))
    }
}
