use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Modis,
    Landsat,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Modis => "modis",
            Platform::Landsat => "landsat",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Modis => "MODIS",
            Platform::Landsat => "Landsat",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Platform {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "modis" => Ok(Platform::Modis),
            "landsat" => Ok(Platform::Landsat),
            other => Err(format!("unknown satellite platform '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Aqua,
    Terra,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Aqua => "aqua",
            Product::Terra => "terra",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Product::Aqua => "Aqua",
            Product::Terra => "Terra",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Product {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "aqua" | "myd" | "myd11a1" => Ok(Product::Aqua),
            "terra" | "mod" | "mod11a1" => Ok(Product::Terra),
            other => Err(format!("unknown MODIS product '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Night => "night",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "Day",
            TimeOfDay::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TimeOfDay {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(TimeOfDay::Day),
            "night" | "n" => Ok(TimeOfDay::Night),
            other => Err(format!("unknown time of day '{other}'")),
        }
    }
}

/// Which satellite product a reading came from.
///
/// MODIS readings always carry both a product (Aqua/Terra) and a day/night
/// qualifier; Landsat readings carry neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SatelliteSource {
    pub platform: Platform,
    pub product: Option<Product>,
    pub time_of_day: Option<TimeOfDay>,
}

impl SatelliteSource {
    pub fn modis(product: Product, time_of_day: TimeOfDay) -> Self {
        Self {
            platform: Platform::Modis,
            product: Some(product),
            time_of_day: Some(time_of_day),
        }
    }

    pub fn landsat() -> Self {
        Self {
            platform: Platform::Landsat,
            product: None,
            time_of_day: None,
        }
    }

    pub fn new(
        platform: Platform,
        product: Option<Product>,
        time_of_day: Option<TimeOfDay>,
    ) -> Result<Self, String> {
        match (platform, product, time_of_day) {
            (Platform::Modis, Some(product), Some(time_of_day)) => {
                Ok(Self::modis(product, time_of_day))
            }
            (Platform::Modis, None, _) => {
                Err("MODIS selection requires a product (aqua or terra)".to_string())
            }
            (Platform::Modis, _, None) => {
                Err("MODIS selection requires a time of day (day or night)".to_string())
            }
            (Platform::Landsat, None, None) => Ok(Self::landsat()),
            (Platform::Landsat, _, _) => Err(
                "Landsat selection does not take a product or time of day qualifier".to_string(),
            ),
        }
    }

    /// Column holding the surface temperature for this selection.
    pub fn value_column(&self) -> &'static str {
        match (self.platform, self.time_of_day) {
            (Platform::Modis, Some(TimeOfDay::Night)) => "LST_Night_1km",
            (Platform::Modis, _) => "LST_Day_1km",
            (Platform::Landsat, _) => "ST_B10",
        }
    }

    /// Column holding the fractional-hour overpass time, if the product has one.
    pub fn view_time_column(&self) -> Option<&'static str> {
        match (self.platform, self.time_of_day) {
            (Platform::Modis, Some(TimeOfDay::Night)) => Some("Night_view_time"),
            (Platform::Modis, _) => Some("Day_view_time"),
            (Platform::Landsat, _) => None,
        }
    }
}

impl fmt::Display for SatelliteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform.display_name())?;
        if let Some(product) = self.product {
            write!(f, " {}", product.display_name())?;
        }
        if let Some(time_of_day) = self.time_of_day {
            write!(f, " {}", time_of_day.display_name())?;
        }
        Ok(())
    }
}

/// One satellite overpass as exported by the retrieval side, already in degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteRecord {
    pub date: String,
    pub view_time_hours: Option<f64>,
    pub value: f64,
    pub source: SatelliteSource,
}

/// One logger row: an instant string and the measured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundRecord {
    pub instant: String,
    pub value: f64,
}

impl GroundRecord {
    pub fn new(instant: impl Into<String>, value: f64) -> Self {
        Self {
            instant: instant.into(),
            value,
        }
    }
}

/// Why a data row produced no record. The table as a whole still parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A required cell was empty.
    MissingField(&'static str),
    /// Empty temperature cell in a satellite table; the pixel was cloud or QA masked.
    MaskedTemperature,
    NotANumber { column: String, value: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing {field}"),
            SkipReason::MaskedTemperature => f.write_str("masked temperature"),
            SkipReason::NotANumber { column, value } => {
                write!(f, "column '{column}' holds non-numeric value '{value}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line_index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ParsedTable<R> {
    pub parser: &'static str,
    pub records: Vec<R>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl<R> ParsedTable<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
