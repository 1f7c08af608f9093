//! Prompt construction for every work unit.

use serde_json::Value;

use voyages_core::TripRequest;

pub struct UnitPrompts;

impl UnitPrompts {
    pub const VALIDATION: &'static str = "You are a travel safety and feasibility validator. \
        Summarize the validation report you are given: safety rating, best months to visit, \
        any travel warnings, and a clear recommendation. Be concise.";

    pub const DESTINATION_RESEARCH: &'static str = "You are a destination research specialist. \
        Recommend top attractions, local culture highlights, must-see landmarks and hidden gems \
        for the destination. Name 3-5 specific attractions with brief descriptions. \
        Keep your findings to 150-200 words.";

    pub const ACTIVITY_RESEARCH: &'static str = "You are an activity and experience specialist. \
        Recommend activities, tours and experiences for the destination: outdoor, cultural, \
        food and adventure options, with realistic time estimates for each. \
        Keep your findings to 150-200 words.";

    pub const WEATHER_RESEARCH: &'static str = "You are a weather research specialist for travel \
        planning. Describe the typical temperature range, precipitation and seasonal patterns \
        for the destination during the travel dates, and list what to pack. \
        Keep your response to 120-150 words.";

    pub const ITINERARY: &'static str = "You are an expert travel itinerary planner. Using the \
        research you are given, create a day-by-day itinerary with morning, afternoon and \
        evening plans, grouping nearby locations and accounting for the weather. \
        Keep it practical, 200-300 words.";

    pub const BUDGET: &'static str = "You are a travel budget specialist. Call the \
        calculate_trip_budget function first, then present the breakdown clearly and give \
        three money-saving tips specific to the destination.";

    pub const OPTIMIZER: &'static str = "You are a travel plan optimization specialist. Review \
        the itinerary and budget for issues (too rushed, too expensive, poor timing), suggest \
        concrete improvements, and finish with your final recommendations. 150-200 words.";

    pub fn validation(request: &TripRequest, report: &Value) -> String {
        format!(
            "{}\n\nValidation report:\n{}",
            request.enhanced_query(),
            report
        )
    }

    pub fn research(request: &TripRequest) -> String {
        request.enhanced_query()
    }

    pub fn itinerary(
        request: &TripRequest,
        destination_research: &str,
        activity_research: &str,
        weather_research: &str,
    ) -> String {
        format!(
            "{}\n\nDestination info:\n{}\n\nActivities:\n{}\n\nWeather:\n{}",
            request.enhanced_query(),
            destination_research,
            activity_research,
            weather_research
        )
    }

    pub fn budget(request: &TripRequest) -> String {
        request.enhanced_query()
    }

    pub fn optimizer(request: &TripRequest, itinerary: &str, budget_narrative: &str) -> String {
        format!(
            "{}\n\nItinerary:\n{}\n\nBudget analysis:\n{}",
            request.enhanced_query(),
            itinerary,
            budget_narrative
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> TripRequest {
        TripRequest::new("Relaxing beach vacation", "Bali, Indonesia")
            .with_dates("2026-02-10 to 2026-02-15")
            .with_days(5)
            .with_travelers(2)
    }

    #[test]
    fn test_validation_prompt_contains_report() {
        let request = sample_request();
        let report = json!({"safety_rating": 4.5});
        let prompt = UnitPrompts::validation(&request, &report);

        assert!(prompt.contains("Bali, Indonesia"));
        assert!(prompt.contains("4.5"));
    }

    #[test]
    fn test_itinerary_prompt_contains_research() {
        let request = sample_request();
        let prompt = UnitPrompts::itinerary(&request, "temples", "surfing", "dry season");

        assert!(prompt.contains("temples"));
        assert!(prompt.contains("surfing"));
        assert!(prompt.contains("dry season"));
    }

    #[test]
    fn test_optimizer_prompt_contains_inputs() {
        let request = sample_request();
        let prompt = UnitPrompts::optimizer(&request, "Day 1: beach", "total $400");

        assert!(prompt.contains("Day 1: beach"));
        assert!(prompt.contains("total $400"));
    }

    #[test]
    fn test_budget_instruction_names_the_tool() {
        assert!(UnitPrompts::BUDGET.contains("calculate_trip_budget"));
    }
}
