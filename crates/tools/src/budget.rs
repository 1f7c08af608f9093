use serde::{Deserialize, Serialize};
use serde_json::Value;

use voyages_core::AccommodationLevel;

/// Estimated trip cost, split by expense category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub destination: String,
    pub num_days: u32,
    pub num_travelers: u32,
    pub accommodation_level: AccommodationLevel,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub local_transport: f64,
    pub total: f64,
}

impl BudgetBreakdown {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Daily rate per traveler for a destination and accommodation level.
///
/// Mock pricing table; unknown destinations fall back to a generic rate.
fn daily_rate(destination: &str, level: AccommodationLevel) -> f64 {
    let known: [(&str, [f64; 3]); 5] = [
        ("paris", [80.0, 150.0, 350.0]),
        ("tokyo", [70.0, 140.0, 400.0]),
        ("bali", [40.0, 90.0, 250.0]),
        ("new york", [100.0, 200.0, 500.0]),
        ("istanbul", [50.0, 100.0, 220.0]),
    ];

    let key = normalize(destination);
    let rates = known
        .iter()
        .find(|(city, _)| key.contains(city) || city.contains(key.as_str()))
        .map(|(_, rates)| *rates)
        .unwrap_or([60.0, 120.0, 300.0]);

    match level {
        AccommodationLevel::Budget => rates[0],
        AccommodationLevel::MidRange => rates[1],
        AccommodationLevel::Luxury => rates[2],
    }
}

fn normalize(destination: &str) -> String {
    destination
        .to_lowercase()
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Estimate the total trip cost.
///
/// The daily rate covers one traveler and is split 40/30/20/10 across
/// accommodation, food, activities and local transport.
pub fn calculate_trip_budget(
    destination: &str,
    num_days: u32,
    num_travelers: u32,
    level: AccommodationLevel,
) -> BudgetBreakdown {
    let rate = daily_rate(destination, level);
    let person_days = f64::from(num_days) * f64::from(num_travelers);

    let accommodation = rate * 0.4 * person_days;
    let food = rate * 0.3 * person_days;
    let activities = rate * 0.2 * person_days;
    let local_transport = rate * 0.1 * person_days;

    BudgetBreakdown {
        destination: destination.to_string(),
        num_days,
        num_travelers,
        accommodation_level: level,
        accommodation,
        food,
        activities,
        local_transport,
        total: accommodation + food + activities + local_transport,
    }
}
