use adaquiz_core::quiz::generator::generate_question_set;
use adaquiz_core::quiz::session::{AdvanceOutcome, SessionState};
use adaquiz_model::question::{Question, UserResponse};
use adaquiz_model::results::QuizResults;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::instrument;

use crate::AppState;
use crate::routes::MAX_BATCH_SIZE;
use crate::routes::quiz::error::QuizRouteError;
use crate::session::{ExtractSessionId, SESSION_HEADER, session_cookie};

mod error;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/generate-initial-question", post(generate_initial_question))
        .route("/generate-next-question", post(generate_next_question))
        .route("/submit-quiz", post(submit_quiz))
        .route("/generate-questions", post(generate_questions))
        .with_state(())
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicRequest {
    topic: String,
}

/// Starts a quiz, reusing the client's session if it sent one.
#[instrument(skip_all)]
async fn generate_initial_question(
    Extension(state): Extension<AppState>,
    ExtractSessionId(session_id): ExtractSessionId,
    jar: CookieJar,
    Json(request): Json<TopicRequest>,
) -> Result<Response, QuizRouteError> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(QuizRouteError::BlankTopic);
    }

    let (session_id, session) = state.sessions().get_or_create(session_id).await;
    let mut session = session.lock().await;
    let question = match session.start(state.questions(), topic).await {
        Ok(question) => question,
        Err(error) => {
            if session.state() == SessionState::Empty {
                state.sessions().remove(session_id).await;
            }
            return Err(QuizRouteError::Start(error));
        }
    };
    tracing::info!(%session_id, topic, "started quiz");

    Ok((
        session_cookie(jar, session_id),
        [(SESSION_HEADER, session_id.to_string())],
        Json(question),
    )
        .into_response())
}

#[instrument(skip_all)]
async fn generate_next_question(
    Extension(state): Extension<AppState>,
    ExtractSessionId(session_id): ExtractSessionId,
    Json(response): Json<UserResponse>,
) -> Result<Json<Question>, QuizRouteError> {
    let session_id = session_id.ok_or(QuizRouteError::MissingSession)?;
    let session = state
        .sessions()
        .get(session_id)
        .await
        .ok_or(QuizRouteError::SessionNotFound(session_id))?;

    let outcome = session.lock().await.advance(state.questions(), &response).await?;
    match outcome {
        AdvanceOutcome::NextQuestion(question) => Ok(Json(question)),
        AdvanceOutcome::Complete => Err(QuizRouteError::QuizCompleted),
    }
}

/// Scores the quiz and forgets the session.
#[instrument(skip_all)]
async fn submit_quiz(
    Extension(state): Extension<AppState>,
    ExtractSessionId(session_id): ExtractSessionId,
) -> Result<Json<QuizResults>, QuizRouteError> {
    let session_id = session_id.ok_or(QuizRouteError::MissingSession)?;
    let session = state
        .sessions()
        .remove(session_id)
        .await
        .ok_or(QuizRouteError::SessionNotFound(session_id))?;

    let results = session.lock().await.finalize();
    tracing::info!(%session_id, score = %results.score, "submitted quiz");
    Ok(Json(results))
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionSetRequest {
    topic: String,
    num_questions: usize,
}

#[instrument(skip_all)]
async fn generate_questions(
    Extension(state): Extension<AppState>,
    Json(request): Json<QuestionSetRequest>,
) -> Result<Json<Vec<Question>>, QuizRouteError> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(QuizRouteError::BlankTopic);
    }
    if !(1..=MAX_BATCH_SIZE).contains(&request.num_questions) {
        return Err(QuizRouteError::InvalidQuestionCount(MAX_BATCH_SIZE));
    }

    let questions = generate_question_set(state.questions(), topic, request.num_questions).await?;
    Ok(Json(questions))
}

#[cfg(test)]
mod tests {
    use adaquiz_core::quiz::error::GenerationError;
    use adaquiz_test_helpers::ScriptedGenerator;
    use http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use test_log::test;

    use crate::routes::test_util::{app, post, send};
    use crate::session::SESSION_HEADER;

    fn answer(question: &Value, user_answer: &str) -> Value {
        json!({
            "user_answer": user_answer,
            "previous_question": question["question"],
            "response_correct": true,
            "topic": "Rust"
        })
    }

    #[test(tokio::test)]
    async fn test_initial_question_sets_session() {
        let generator = ScriptedGenerator::new();
        let (app, state) = app(&generator);

        let (status, headers, body) = send(
            &app,
            post("/generate-initial-question", None, &json!({ "topic": "Rust" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"].as_array().unwrap().len(), 4);
        assert_eq!(body["answer"], "B. Right 1");
        let session = headers[SESSION_HEADER].to_str().unwrap();
        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("quiz_session={session}")));
        assert_eq!(state.sessions().len().await, 1);
    }

    #[test(tokio::test)]
    async fn test_initial_question_ignores_client_chosen_id() {
        let (app, state) = app(&ScriptedGenerator::new());
        let chosen = adaquiz_core::quiz::store::SessionId::new().to_string();

        let (status, headers, _) = send(
            &app,
            post("/generate-initial-question", Some(&chosen), &json!({ "topic": "Rust" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_ne!(headers[SESSION_HEADER].to_str().unwrap(), chosen);
        assert_eq!(state.sessions().len().await, 1);
    }

    #[test(tokio::test)]
    async fn test_blank_topic() {
        let (app, state) = app(&ScriptedGenerator::new());
        let (status, _, body) = send(
            &app,
            post("/generate-initial-question", None, &json!({ "topic": "  " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Topic must not be empty.");
        assert!(state.sessions().is_empty().await);
    }

    #[test(tokio::test)]
    async fn test_initial_without_questions() {
        let generator = ScriptedGenerator::with_script([Ok(Vec::new())]);
        let (app, state) = app(&generator);

        let (status, _, body) = send(
            &app,
            post("/generate-initial-question", None, &json!({ "topic": "Rust" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No questions generated.");
        assert!(state.sessions().is_empty().await);
    }

    #[test(tokio::test)]
    async fn test_full_quiz() {
        let generator = ScriptedGenerator::new();
        let (app, state) = app(&generator);

        let (_, headers, mut question) = send(
            &app,
            post("/generate-initial-question", None, &json!({ "topic": "Rust" })),
        )
        .await;
        let session = headers[SESSION_HEADER].to_str().unwrap().to_owned();

        for user_answer in ["B", "A", "B", "C", "B"] {
            let (status, _, next) = send(
                &app,
                post("/generate-next-question", Some(&session), &answer(&question, user_answer)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            question = next;
        }

        let (status, _, body) = send(
            &app,
            post("/generate-next-question", Some(&session), &answer(&question, "B")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Quiz completed. Please submit to view results.");

        let (status, _, results) = send(&app, post("/submit-quiz", Some(&session), &Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["total_questions"], 5);
        assert_eq!(results["correct_answers"], 3);
        assert_eq!(results["score"], "3/5");
        assert_eq!(results["details"].as_array().unwrap().len(), 5);
        assert!(state.sessions().is_empty().await);

        let (status, _, _) = send(&app, post("/submit-quiz", Some(&session), &Value::Null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test(tokio::test)]
    async fn test_session_from_cookie() {
        let generator = ScriptedGenerator::new();
        let (app, _) = app(&generator);

        let (_, headers, question) = send(
            &app,
            post("/generate-initial-question", None, &json!({ "topic": "Rust" })),
        )
        .await;
        let session = headers[SESSION_HEADER].to_str().unwrap();

        let req = Request::post("/generate-next-question")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("quiz_session={session}"))
            .body(answer(&question, "B").to_string().into())
            .unwrap();
        let (status, _, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "Sample question 2?");
    }

    #[test(tokio::test)]
    async fn test_next_question_requires_session() {
        let (app, _) = app(&ScriptedGenerator::new());
        let question = json!({ "question": "q" });

        let (status, _, _) = send(&app, post("/generate-next-question", None, &answer(&question, "A"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = adaquiz_core::quiz::store::SessionId::new().to_string();
        let (status, _, _) = send(
            &app,
            post("/generate-next-question", Some(&unknown), &answer(&question, "A")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test(tokio::test)]
    async fn test_failed_next_question_is_retryable() {
        let generator = ScriptedGenerator::new();
        let (app, _) = app(&generator);

        let (_, headers, question) = send(
            &app,
            post("/generate-initial-question", None, &json!({ "topic": "Rust" })),
        )
        .await;
        let session = headers[SESSION_HEADER].to_str().unwrap().to_owned();

        generator.push(Err(GenerationError::NoQuestions));
        let (status, _, body) = send(
            &app,
            post("/generate-next-question", Some(&session), &answer(&question, "B")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Error generating next question: No questions generated.");

        let (status, _, _) = send(
            &app,
            post("/generate-next-question", Some(&session), &answer(&question, "B")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test(tokio::test)]
    async fn test_generate_questions() {
        let generator = ScriptedGenerator::new();
        let (app, _) = app(&generator);

        let (status, _, body) = send(
            &app,
            post("/generate-questions", None, &json!({ "topic": "Rust", "num_questions": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        for num_questions in [0, 21] {
            let (status, _, body) = send(
                &app,
                post(
                    "/generate-questions",
                    None,
                    &json!({ "topic": "Rust", "num_questions": num_questions }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["detail"], "num_questions must be between 1 and 20.");
        }
    }
}
