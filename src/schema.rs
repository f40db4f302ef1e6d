/// Column-name constants for the wage-dashkit schema.
/// Single source of truth - exported to Python via PyO3.

// ── Wage columns (shared by all three wage tables) ──────────────────────────
pub mod wage {
    pub const YEAR: &str = "year";
    pub const AGE_BRACKET: &str = "age_bracket";
    pub const PER_CAPITA_WAGE: &str = "per_capita_wage";
    pub const SCHEDULED_WAGE: &str = "scheduled_wage";
    pub const SPECIAL_WAGE: &str = "special_wage";

    pub const VALUES: [&str; 3] = [PER_CAPITA_WAGE, SCHEDULED_WAGE, SPECIAL_WAGE];
}

// ── Category table columns ──────────────────────────────────────────────────
pub mod category {
    pub const INDUSTRY_CATEGORY: &str = "industry_category";
}

// ── Prefecture table columns ────────────────────────────────────────────────
pub mod prefecture {
    pub const PREFECTURE_NAME: &str = "prefecture_name";
}

// ── Location table columns ──────────────────────────────────────────────────
// The lookup file ships with `pref_name`; it is renamed to `prefecture_name`
// on load so the map join needs no aliasing.
pub mod location {
    pub const PREF_NAME: &str = "pref_name";
    pub const LATITUDE: &str = "lat";
    pub const LONGITUDE: &str = "lon";
}

// ── Age bracket values ──────────────────────────────────────────────────────
pub mod age {
    /// Sentinel bracket holding the aggregate across all age groups.
    pub const ALL_AGES: &str = "all_ages";
}

// ── Derived columns ─────────────────────────────────────────────────────────
pub mod derived {
    pub const NATIONAL_WAGE: &str = "national_wage";
    pub const PREFECTURE_WAGE: &str = "prefecture_wage";
    pub const NORMALIZED_WAGE: &str = "normalized_wage";
}

// ── Defaults ────────────────────────────────────────────────────────────────
pub mod defaults {
    pub const NATIONAL_FILE: &str = "national_wage.csv";
    pub const CATEGORY_FILE: &str = "category_wage.csv";
    pub const PREFECTURE_FILE: &str = "prefecture_wage.csv";
    pub const LOCATION_FILE: &str = "pref_lat_lon.csv";

    pub const MAP_YEAR: i64 = 2019;

    /// Headroom added above the tallest bar when deriving the x-axis bound.
    pub const BAR_AXIS_MARGIN: f64 = 50.0;
}
