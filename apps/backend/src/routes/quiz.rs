//! Quiz session endpoints

use axum::{extract::State, Json};
use quiz_core::{duplication_warning, Event, RoundReport, Session};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::coaching::{self, WrongAnswer};
use crate::AppState;

fn current_question(session: &Session) -> Result<QuestionView> {
    let active = session
        .active()
        .ok_or_else(|| ApiError::Internal("round is not active".to_string()))?;
    let item = active
        .current()
        .ok_or_else(|| ApiError::Internal("active round has no pending question".to_string()))?;
    Ok(QuestionView::new(item, active.position(), active.total()))
}

fn round_started(session: &Session, warning: Option<String>) -> Result<StartQuizResponse> {
    let question = current_question(session)?;
    Ok(StartQuizResponse {
        mode: session.mode(),
        round: session.round(),
        total: question.total,
        question,
        warning,
    })
}

fn finished_report(session: &Session) -> Result<RoundReport> {
    session
        .result()
        .map(RoundReport::new)
        .ok_or_else(|| ApiError::NotFound("no finished round".to_string()))
}

/// POST /api/quiz/start
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartQuizRequest>,
) -> Result<Json<StartQuizResponse>> {
    let question_count = payload
        .question_count
        .unwrap_or(state.config.default_question_count)
        .max(1);

    let mut workspace = state.workspace.lock().await;
    let term_count = workspace.store.term_count();
    let session = workspace.start(question_count)?;

    let warning = duplication_warning(term_count, question_count).map(|w| w.message().to_string());
    tracing::info!(term_count, question_count, "quiz started");

    Ok(Json(round_started(session, warning)?))
}

/// GET /api/quiz/current
pub async fn current(State(state): State<AppState>) -> Result<Json<QuizStatus>> {
    let workspace = state.workspace.lock().await;
    let session = workspace.session();

    let status = if let Some(active) = session.active() {
        QuizStatus::Active {
            mode: session.mode(),
            round: session.round(),
            question: current_question(session)?,
            answered: active.position(),
        }
    } else if let Some(result) = session.result() {
        QuizStatus::Finished {
            report: RoundReport::new(result),
        }
    } else {
        QuizStatus::Idle {
            term_count: workspace.store.term_count(),
        }
    };

    Ok(Json(status))
}

/// POST /api/quiz/answer
pub async fn answer(
    State(state): State<AppState>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let mut workspace = state.workspace.lock().await;
    let session = workspace.apply(Event::Submit {
        answer: payload.answer,
    })?;

    let record = session
        .last_record()
        .cloned()
        .ok_or_else(|| ApiError::Internal("answer was not recorded".to_string()))?;

    let response = if let Some(result) = session.result() {
        let report = RoundReport::new(result);
        tracing::info!(
            round = report.retest_round,
            correct = report.correct_count,
            wrong = report.wrong_count,
            "round finished"
        );
        AnswerResponse {
            record,
            finished: true,
            next: None,
            report: Some(report),
        }
    } else {
        AnswerResponse {
            record,
            finished: false,
            next: Some(current_question(session)?),
            report: None,
        }
    };

    Ok(Json(response))
}

/// GET /api/quiz/result
pub async fn result(State(state): State<AppState>) -> Result<Json<RoundReport>> {
    let workspace = state.workspace.lock().await;
    Ok(Json(finished_report(workspace.session())?))
}

/// POST /api/quiz/retest
pub async fn retest(State(state): State<AppState>) -> Result<Json<StartQuizResponse>> {
    let mut workspace = state.workspace.lock().await;
    let session = workspace.apply(Event::Retest)?;
    tracing::info!(round = session.round(), terms = session.pool().len(), "retest started");
    Ok(Json(round_started(session, None)?))
}

/// POST /api/quiz/restart
pub async fn restart(State(state): State<AppState>) -> Result<Json<QuizStatus>> {
    let mut workspace = state.workspace.lock().await;
    workspace.restart()?;
    tracing::info!("workspace reset");
    Ok(Json(QuizStatus::Idle { term_count: 0 }))
}

/// POST /api/quiz/feedback
pub async fn feedback(State(state): State<AppState>) -> Result<Json<FeedbackResponse>> {
    let wrong: Vec<WrongAnswer> = {
        let workspace = state.workspace.lock().await;
        let result = workspace
            .session()
            .result()
            .ok_or_else(|| ApiError::NotFound("no finished round".to_string()))?;
        result.wrong_records().map(WrongAnswer::from).collect()
    };

    let notebook = coaching::coach(&state.llm, &wrong).await?;
    Ok(Json(FeedbackResponse { notebook }))
}
