use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Safety and feasibility report for a destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationReport {
    pub destination: String,
    pub matched_location: String,
    pub is_safe: bool,
    pub safety_rating: f64,
    pub best_months: Vec<String>,
    pub travel_warnings: Vec<String>,
    pub recommendation: String,
    pub travel_dates: String,
}

impl DestinationReport {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

struct AdvisoryRow {
    city: &'static str,
    safety_rating: f64,
    best_months: &'static [&'static str],
    warnings: &'static [&'static str],
}

// Mock travel-advisory table; unknown destinations get a cautious default.
const ADVISORIES: [AdvisoryRow; 5] = [
    AdvisoryRow {
        city: "paris",
        safety_rating: 4.2,
        best_months: &["Apr", "May", "Sep", "Oct"],
        warnings: &[],
    },
    AdvisoryRow {
        city: "tokyo",
        safety_rating: 4.8,
        best_months: &["Mar", "Apr", "Oct", "Nov"],
        warnings: &["Typhoon season: Aug-Sep"],
    },
    AdvisoryRow {
        city: "bali",
        safety_rating: 4.5,
        best_months: &["Apr", "May", "Jun", "Sep"],
        warnings: &["Rainy season: Nov-Mar"],
    },
    AdvisoryRow {
        city: "new york",
        safety_rating: 4.0,
        best_months: &["Apr", "May", "Sep", "Oct"],
        warnings: &["Very cold winters"],
    },
    AdvisoryRow {
        city: "istanbul",
        safety_rating: 4.3,
        best_months: &["Apr", "May", "Sep", "Oct"],
        warnings: &[],
    },
];

/// Check whether a destination is safe and suitable for the given dates.
pub fn validate_destination(destination: &str, travel_dates: &str) -> DestinationReport {
    let key = destination
        .to_lowercase()
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let row = ADVISORIES
        .iter()
        .find(|row| key.contains(row.city) || row.city.contains(key.as_str()));

    let (matched_location, safety_rating, best_months, warnings) = match row {
        Some(row) => (
            title_case(row.city),
            row.safety_rating,
            row.best_months.iter().map(|m| m.to_string()).collect(),
            row.warnings.iter().map(|w| w.to_string()).collect(),
        ),
        None => (
            "Unknown".to_string(),
            3.5,
            Vec::new(),
            vec!["Limited information available - verify travel advisories".to_string()],
        ),
    };

    let is_safe = safety_rating >= 3.0;
    DestinationReport {
        destination: destination.to_string(),
        matched_location,
        is_safe,
        safety_rating,
        best_months,
        travel_warnings: warnings,
        recommendation: if is_safe {
            "Approved for travel".to_string()
        } else {
            "Check travel advisories".to_string()
        },
        travel_dates: travel_dates.to_string(),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
