//! Origin and destination airport metadata.

/// Default transition altitude/level (feet) when the planning source does
/// not supply one.
pub const DEFAULT_TRANSITION_FT: f64 = 18_000.0;

/// Metadata for one end of the route.
///
/// Populated from the planning source at ingestion time; every field has an
/// explicit default so a sparse upstream record still yields a usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportInfo {
    /// ICAO identifier, `----` when unknown.
    pub icao: String,
    /// Field elevation in feet.
    pub elevation_ft: f64,
    /// Planned runway, `--` when unknown.
    pub runway: String,
    /// Minimum off-route altitude near the field, feet.
    pub mora_ft: f64,
    /// Transition altitude (climbing: switch to standard pressure), feet.
    pub transition_alt_ft: f64,
    /// Transition level (descending: switch to local QNH), feet.
    pub transition_level_ft: f64,
    /// Latest ATIS broadcast text.
    pub atis: String,
    /// ATIS information letter.
    pub atis_letter: String,
    /// Destination METAR text.
    pub metar: String,
    /// Active NOTAMs, one entry per notice.
    pub notams: Vec<String>,
}

impl Default for AirportInfo {
    fn default() -> Self {
        Self {
            icao: "----".to_string(),
            elevation_ft: 0.0,
            runway: "--".to_string(),
            mora_ft: 0.0,
            transition_alt_ft: DEFAULT_TRANSITION_FT,
            transition_level_ft: DEFAULT_TRANSITION_FT,
            atis: "NO ATIS DATA".to_string(),
            atis_letter: "-".to_string(),
            metar: "NO DATA".to_string(),
            notams: Vec::new(),
        }
    }
}

impl AirportInfo {
    /// Create a record with identifier and elevation, defaults elsewhere.
    pub fn new(icao: impl Into<String>, elevation_ft: f64) -> Self {
        Self {
            icao: icao.into(),
            elevation_ft,
            ..Self::default()
        }
    }

    /// Set the transition altitude (feet).
    pub fn with_transition_alt(mut self, feet: f64) -> Self {
        self.transition_alt_ft = feet;
        self
    }

    /// Set the transition level (feet).
    pub fn with_transition_level(mut self, feet: f64) -> Self {
        self.transition_level_ft = feet;
        self
    }
}
