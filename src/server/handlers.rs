use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SharedState;
use crate::error::{AppError, AppResult};
use crate::storage::{Form, Storage};

/// Body of `POST /api/v1/form`.
#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    /// The free-text prompt for the new form.
    pub prompt: String,
}

/// Reply to a successful form creation.
#[derive(Debug, Serialize)]
pub struct CreatedForm {
    /// The new form's id.
    pub id: String,
    /// The stored prompt.
    pub prompt: String,
}

/// Body of `POST /api/v1/form/{id}/response`.
#[derive(Debug, Deserialize)]
pub struct PostResponseRequest {
    /// The free-text answer.
    pub text: String,
}

/// A form with its responses, as returned by the read endpoints.
#[derive(Debug, Serialize)]
pub struct FormView {
    /// The form's id.
    pub id: String,
    /// The form's prompt.
    pub prompt: String,
    /// Responses in insertion order.
    pub responses: Vec<ResponseView>,
}

/// One response entry inside a [`FormView`].
#[derive(Debug, Serialize)]
pub struct ResponseView {
    /// The response's id.
    pub id: String,
    /// The answer text.
    pub text: String,
}

impl From<Form> for FormView {
    fn from(form: Form) -> Self {
        Self {
            id: form.id,
            prompt: form.prompt,
            responses: form
                .responses
                .into_iter()
                .map(|r| ResponseView {
                    id: r.id,
                    text: r.text,
                })
                .collect(),
        }
    }
}

/// `POST /api/v1/form` — create a form from a prompt.
pub async fn create_form(
    State(state): State<SharedState>,
    body: Result<Json<CreateFormRequest>, JsonRejection>,
) -> AppResult<Json<CreatedForm>> {
    let Json(req) = body.map_err(|_| AppError::MalformedPayload)?;

    let form = state.storage.create_form(&req.prompt).await?;

    info!(form_id = %form.id, "Form created");

    Ok(Json(CreatedForm {
        id: form.id,
        prompt: form.prompt,
    }))
}

/// `GET /api/v1/form/{id}` — fetch a form with all its responses.
pub async fn get_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> AppResult<Json<FormView>> {
    let form = state
        .storage
        .get_form(&id)
        .await?
        .ok_or(AppError::FormNotFound { form_id: id })?;

    Ok(Json(form.into()))
}

/// `POST /api/v1/form/{id}/response` — append a response to a form.
///
/// The form is looked up first so a miss surfaces as not-found rather than a
/// constraint error; the reply is the full form view including the new entry.
pub async fn post_response(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<PostResponseRequest>, JsonRejection>,
) -> AppResult<Json<FormView>> {
    let Json(req) = body.map_err(|_| AppError::MalformedPayload)?;

    let mut form = state
        .storage
        .get_form(&id)
        .await?
        .ok_or_else(|| AppError::FormNotFound { form_id: id.clone() })?;

    let response = state.storage.create_response(&form.id, &req.text).await?;

    info!(form_id = %form.id, response_id = %response.id, "Response recorded");

    form.responses.push(response);

    Ok(Json(form.into()))
}
