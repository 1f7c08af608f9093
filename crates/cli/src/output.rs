use colored::Colorize;
use serde_json::Value;

use voyages_core::BlackboardSnapshot;

/// Slot display order for the final report.
const SLOT_ORDER: [(&str, &str); 8] = [
    ("validation_result", "Validation"),
    ("destination_research", "Destination Research"),
    ("activity_research", "Activities"),
    ("weather_research", "Weather"),
    ("itinerary_draft", "Itinerary"),
    ("budget_analysis", "Budget"),
    ("optimized_plan", "Optimized Plan"),
    ("booking_status", "Booking"),
];

pub fn print_summary(final_state: &BlackboardSnapshot) {
    println!();
    println!("{}", "Travel Plan".bold());
    println!("{}", "=".repeat(60));

    for (slot, title) in SLOT_ORDER {
        let Some(value) = final_state.get(slot) else {
            continue;
        };
        println!();
        println!("{}", title.bold().cyan());
        println!("{}", render_slot(value));
    }

    println!();
    println!("{}", "=".repeat(60));
}

pub fn print_approval_request(confirmation_id: &str, payload: &Value) {
    println!();
    println!("{}", "BOOKING APPROVAL REQUIRED".bold().yellow());
    if let (Some(cost), Some(threshold)) = (
        payload["total_cost"].as_f64(),
        payload["threshold"].as_f64(),
    ) {
        println!("  Total cost : ${:.2}", cost);
        println!("  Threshold  : ${:.2}", threshold);
    }
    if let Some(destination) = payload["destination"].as_str() {
        println!("  Destination: {}", destination);
    }
    if let Some(travelers) = payload["num_travelers"].as_u64() {
        println!("  Travelers  : {}", travelers);
    }
    println!("  Confirmation id: {}", confirmation_id.dimmed());
}

fn render_slot(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            if let Some(Value::String(summary)) = map.get("summary") {
                return summary.clone();
            }
            if let Some(Value::String(narrative)) = map.get("narrative") {
                return narrative.clone();
            }
            if let Some(Value::String(message)) = map.get("message") {
                return message.clone();
            }
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
