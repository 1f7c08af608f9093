use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AccommodationLevel {
    Budget,
    #[default]
    MidRange,
    Luxury,
}

impl AccommodationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::MidRange => "mid-range",
            Self::Luxury => "luxury",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "budget" => Some(Self::Budget),
            "mid-range" => Some(Self::MidRange),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

/// A single trip planning request, the input to one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Free-text request from the traveler
    pub query: String,
    /// Destination name, e.g. "Bali, Indonesia"
    pub destination: String,
    /// Date range "YYYY-MM-DD to YYYY-MM-DD"
    pub travel_dates: String,
    pub num_days: u32,
    pub num_travelers: u32,
    pub accommodation_level: AccommodationLevel,
}

impl TripRequest {
    pub fn new(query: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            destination: destination.into(),
            travel_dates: String::new(),
            num_days: 1,
            num_travelers: 1,
            accommodation_level: AccommodationLevel::default(),
        }
    }

    pub fn with_dates(mut self, dates: impl Into<String>) -> Self {
        self.travel_dates = dates.into();
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.num_days = days;
        self
    }

    pub fn with_travelers(mut self, travelers: u32) -> Self {
        self.num_travelers = travelers;
        self
    }

    pub fn with_accommodation(mut self, level: AccommodationLevel) -> Self {
        self.accommodation_level = level;
        self
    }

    /// The traveler's query with the structured trip details appended,
    /// as sent to the reasoning backend.
    pub fn enhanced_query(&self) -> String {
        format!(
            "{}\n\nTrip Details:\n- Destination: {}\n- Dates: {}\n- Duration: {} days\n- Travelers: {}\n- Accommodation: {}",
            self.query,
            self.destination,
            self.travel_dates,
            self.num_days,
            self.num_travelers,
            self.accommodation_level.as_str()
        )
    }
}
