use pyo3::prelude::*;
use pyo3::types::PyModule;

mod error;
mod model;
mod schema;
mod tables;
mod views;
mod visualization;

use model::WageModel;

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Wage columns
    let wage = PyModule::new(m.py(), "wage")?;
    wage.add("YEAR", schema::wage::YEAR)?;
    wage.add("AGE_BRACKET", schema::wage::AGE_BRACKET)?;
    wage.add("PER_CAPITA_WAGE", schema::wage::PER_CAPITA_WAGE)?;
    wage.add("SCHEDULED_WAGE", schema::wage::SCHEDULED_WAGE)?;
    wage.add("SPECIAL_WAGE", schema::wage::SPECIAL_WAGE)?;
    m.add_submodule(&wage)?;

    // Category
    let category = PyModule::new(m.py(), "category")?;
    category.add("INDUSTRY_CATEGORY", schema::category::INDUSTRY_CATEGORY)?;
    m.add_submodule(&category)?;

    // Prefecture
    let prefecture = PyModule::new(m.py(), "prefecture")?;
    prefecture.add("PREFECTURE_NAME", schema::prefecture::PREFECTURE_NAME)?;
    m.add_submodule(&prefecture)?;

    // Location
    let location = PyModule::new(m.py(), "location")?;
    location.add("PREF_NAME", schema::location::PREF_NAME)?;
    location.add("LATITUDE", schema::location::LATITUDE)?;
    location.add("LONGITUDE", schema::location::LONGITUDE)?;
    m.add_submodule(&location)?;

    // Age bracket values
    let age = PyModule::new(m.py(), "age")?;
    age.add("ALL_AGES", schema::age::ALL_AGES)?;
    m.add_submodule(&age)?;

    // Derived columns
    let derived = PyModule::new(m.py(), "derived")?;
    derived.add("NATIONAL_WAGE", schema::derived::NATIONAL_WAGE)?;
    derived.add("PREFECTURE_WAGE", schema::derived::PREFECTURE_WAGE)?;
    derived.add("NORMALIZED_WAGE", schema::derived::NORMALIZED_WAGE)?;
    m.add_submodule(&derived)?;

    // Defaults
    let defaults = PyModule::new(m.py(), "defaults")?;
    defaults.add("NATIONAL_FILE", schema::defaults::NATIONAL_FILE)?;
    defaults.add("CATEGORY_FILE", schema::defaults::CATEGORY_FILE)?;
    defaults.add("PREFECTURE_FILE", schema::defaults::PREFECTURE_FILE)?;
    defaults.add("LOCATION_FILE", schema::defaults::LOCATION_FILE)?;
    defaults.add("MAP_YEAR", schema::defaults::MAP_YEAR)?;
    defaults.add("BAR_AXIS_MARGIN", schema::defaults::BAR_AXIS_MARGIN)?;
    m.add_submodule(&defaults)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<WageModel>()?;
    add_schema_exports(m)?;
    Ok(())
}
