//! Employee feedback submission

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{Feedback, FeedbackCreate};

use crate::booking::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::db;
use crate::state::AppState;

const MAX_MESSAGE_LEN: usize = 2000;

fn validate(req: &FeedbackCreate) -> Result<(), AppError> {
    validate_required_text(&req.message, "message", MAX_MESSAGE_LEN)?;
    if let Some(category) = &req.category
        && category.chars().count() > MAX_SHORT_TEXT_LEN
    {
        return Err(AppError::validation(format!(
            "category is too long (max {MAX_SHORT_TEXT_LEN} characters)"
        )));
    }
    if let Some(rating) = req.rating
        && !(1..=5).contains(&rating)
    {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "rating must be between 1 and 5")
                .with_detail("rating", rating),
        );
    }
    Ok(())
}

/// POST /api/feedback
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<FeedbackCreate>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    validate(&req)?;

    let category = req
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let now = shared::util::now_millis();
    let feedback = db::feedback::create(&state.pool, category, req.rating, req.message.trim(), now)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store feedback: {e}");
            AppError::database("Failed to submit feedback")
        })?;

    tracing::info!(feedback_id = feedback.id, "Feedback received");
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(message: &str, rating: Option<i64>) -> FeedbackCreate {
        FeedbackCreate {
            category: Some("Food".to_string()),
            rating,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(&req("Great paneer", Some(5))).is_ok());
        assert!(validate(&req("No rating", None)).is_ok());
        assert_eq!(
            validate(&req("  ", Some(3))).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate(&req("Too cold", Some(6))).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert_eq!(
            validate(&req("Too cold", Some(0))).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_message_limit_in_characters() {
        let message = "é".repeat(MAX_MESSAGE_LEN);
        assert!(validate(&req(&message, None)).is_ok());
        assert_eq!(
            validate(&req(&format!("{message}é"), None)).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }
}
