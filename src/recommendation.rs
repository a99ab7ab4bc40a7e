use crate::ai_client::{
    ChatCompletionRequest, ChatMessage, OpenAiClient, ResponseFormat, CHAT_MODEL,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::PlaceRecord;
use regex::Regex;
use serde_json::{json, Value};

/// System prompt for place recommendations. Placeholders are substituted
/// per request.
const PLACE_RECOMMENDATION_PROMPT: &str = r#"You analyze candidate places for a group of users and produce a ranked, annotated recommendation list.

The user group is: {members}. They asked for these place categories: {place_types}.
They are at latitude {latitude}, longitude {longitude} and searched within {radius} meters.

For each place you recommend, classify it on two axes:

1. Party fit (pick one): family | solo | couple | friends
2. Crowd level (pick one): very crowded | crowded | moderate | quiet | very quiet

Base the classification on the place data you are given. Return ONLY a JSON array with no other text, where each element has this shape:

[
  {
    "place_id": "the place id",
    "party_fit": "family | solo | couple | friends",
    "crowd_level": "very crowded | crowded | moderate | quiet | very quiet",
    "address": "the place address",
    "latitude": "lat from the place geometry",
    "longitude": "lng from the place geometry",
    "name": "the place name",
    "type": "restaurant | cafe | department_store | book_store",
    "info": "about three sentences describing the place's location, character and main appeal",
    "distance_from_user": "meters from the user",
    "estimated_time": "estimated walking time in minutes"
  }
]"#;

/// Prompt for naming a multi-stop course. `{places_list}` is substituted
/// with the joined place names.
const COURSE_RECOMMENDATION_PROMPT: &str = r#"You propose a memorable name and a one-line introduction for an outing course.
Using the place list the user provides, create an original course name and a one-line summary.

Place list:
{places_list}

Reply with a JSON object in exactly this form and nothing else:

{
  "course_name": "the course name",
  "course_summary": "the one-line course introduction"
}

Do not add any other commentary or text."#;

const PARSE_FAILURE_MESSAGE: &str = "failed to parse model reply as JSON";

const PLACES_MAX_TOKENS: u32 = 2000;
const PLACES_TEMPERATURE: f64 = 0.4;
const COURSE_MAX_TOKENS: u32 = 300;
const COURSE_TEMPERATURE: f64 = 0.6;

/// Forwards aggregated places to the reasoning service and interprets
/// its replies.
pub struct RecommendationService {
    ai: OpenAiClient,
}

impl RecommendationService {
    pub fn new(config: &Config) -> Self {
        Self {
            ai: OpenAiClient::new(config),
        }
    }

    /// Asks the model to rank and annotate an aggregated place list.
    ///
    /// Returns an empty list without calling the model when there are no
    /// candidates. A reply that cannot be parsed yields a single marker
    /// element carrying the raw text; only transport-level failures
    /// propagate as errors.
    pub async fn recommend_from_places(
        &self,
        places: &[PlaceRecord],
        members: &str,
        place_labels: &[String],
        latitude: f64,
        longitude: f64,
        radius: u32,
    ) -> Result<Vec<Value>, AppError> {
        if places.is_empty() {
            tracing::info!("No candidate places, skipping model call");
            return Ok(Vec::new());
        }

        let members_context = if members.trim().is_empty() {
            "individual"
        } else {
            members
        };
        let labels_joined = place_labels.join(", ");
        let labels_context = if labels_joined.is_empty() {
            "restaurant".to_string()
        } else {
            labels_joined
        };

        let prompt = PLACE_RECOMMENDATION_PROMPT
            .replace("{members}", members_context)
            .replace("{place_types}", &labels_context)
            .replace("{latitude}", &latitude.to_string())
            .replace("{longitude}", &longitude.to_string())
            .replace("{radius}", &radius.to_string());

        let payload = serde_json::to_string(places)
            .map_err(|e| AppError::Internal(format!("Failed to serialize places: {}", e)))?;

        let request = ChatCompletionRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![ChatMessage::system(prompt), ChatMessage::user(payload)],
            max_tokens: PLACES_MAX_TOKENS,
            temperature: PLACES_TEMPERATURE,
            response_format: None,
        };

        let content = self.ai.chat_completion(&request).await?;
        Ok(extract_recommendations(&content))
    }

    /// Asks the model to name and summarize a course built from the
    /// given place names. Returns the raw JSON text of the reply; the
    /// caller is responsible for parsing it.
    pub async fn recommend_course(&self, place_names: &[String]) -> Result<String, AppError> {
        if place_names.is_empty() {
            return Err(AppError::BadRequest(
                "places_name must contain at least one place".to_string(),
            ));
        }

        let prompt =
            COURSE_RECOMMENDATION_PROMPT.replace("{places_list}", &place_names.join(", "));

        let request = ChatCompletionRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![ChatMessage::system(prompt)],
            max_tokens: COURSE_MAX_TOKENS,
            temperature: COURSE_TEMPERATURE,
            response_format: Some(ResponseFormat::json_object()),
        };

        self.ai.chat_completion(&request).await
    }
}

/// Pulls the recommendation array out of a free-text model reply.
///
/// The reply is expected to contain one JSON array; the span from the
/// first `[` to the last `]` is parsed. When there is no such span, or
/// it is not valid JSON, the result is a single marker element carrying
/// the raw reply so callers can still inspect what the model said.
pub fn extract_recommendations(content: &str) -> Vec<Value> {
    let bracket_span = Regex::new(r"\[[\s\S]*\]").unwrap();

    if let Some(found) = bracket_span.find(content) {
        match serde_json::from_str::<Vec<Value>>(found.as_str()) {
            Ok(recommendations) => return recommendations,
            Err(e) => {
                tracing::warn!("Model reply contained an unparseable array: {}", e);
            }
        }
    } else {
        tracing::warn!("Model reply contained no JSON array");
    }

    vec![json!({
        "error": PARSE_FAILURE_MESSAGE,
        "raw": content,
    })]
}
