use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{appointment, pet, prelude::*};
use crate::error::ApiError;
use crate::validation::{self, AppointmentStatus, TIME_FORMAT};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub status: String,
    pub pet_id: i32,
    pub pet_name: Option<String>,
    pub owner_name: Option<String>,
}

async fn appointment_response(
    db: &DatabaseConnection,
    model: appointment::Model,
    pet_model: Option<pet::Model>,
) -> Result<AppointmentResponse, ApiError> {
    let owner_name = match &pet_model {
        Some(p) => Owner::find_by_id(p.owner_id)
            .one(db)
            .await?
            .map(|o| o.full_name()),
        None => None,
    };

    Ok(AppointmentResponse {
        id: model.id,
        date: model.date,
        time: model.time.format(TIME_FORMAT).to_string(),
        reason: model.reason,
        status: model.status,
        pet_id: model.pet_id,
        pet_name: pet_model.map(|p| p.name),
        owner_name,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub pet_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub pet_id: Option<i32>,
}

// GET /api/appointments - soonest first
pub async fn list_appointments(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<impl IntoResponse, ApiError> {
    let appointments = Appointment::find()
        .find_also_related(Pet)
        .order_by_asc(appointment::Column::Date)
        .order_by_asc(appointment::Column::Time)
        .all(&db)
        .await?;

    let mut response = Vec::with_capacity(appointments.len());
    for (model, pet_model) in appointments {
        response.push(appointment_response(&db, model, pet_model).await?);
    }
    Ok(Json(response))
}

// GET /api/appointments/:id
pub async fn get_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = Appointment::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    let pet_model = model.find_related(Pet).one(&db).await?;
    Ok(Json(appointment_response(&db, model, pet_model).await?))
}

// POST /api/appointments - schedule a future visit for a pet
pub async fn create_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let date_raw = validation::required_text("date", payload.date.as_deref())?;
    let time_raw = validation::required_text("time", payload.time.as_deref())?;
    let reason = validation::required_text("reason", payload.reason.as_deref())?;
    let pet_id = payload
        .pet_id
        .ok_or_else(|| ApiError::Validation("The field 'petId' is required".to_string()))?;

    let pet_model = Pet::find_by_id(pet_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("The specified pet does not exist".to_string()))?;

    let date = validation::parse_date(&date_raw)?;
    let time = validation::parse_time(&time_raw)?;
    if !validation::is_future_slot(date, time) {
        return Err(ApiError::Validation(
            "Appointments cannot be scheduled in the past".to_string(),
        ));
    }

    let status = match payload.status.as_deref() {
        Some(value) => AppointmentStatus::parse(value)?,
        None => AppointmentStatus::default(),
    };

    let new_appointment = appointment::ActiveModel {
        date: Set(date),
        time: Set(time),
        reason: Set(reason),
        status: Set(status.as_str().to_string()),
        pet_id: Set(pet_id),
        ..Default::default()
    };
    let model = new_appointment.insert(&db).await?;
    info!("scheduled appointment {}", model.id);

    let response = appointment_response(&db, model, Some(pet_model)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment scheduled successfully",
            "appointment": response,
        })),
    ))
}

// PUT /api/appointments/:id - reschedule or change status
pub async fn update_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = Appointment::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    let mut active: appointment::ActiveModel = existing.clone().into();

    // A new date or time recombines with the stored half before the
    // strict-future rule is re-checked.
    if payload.date.is_some() || payload.time.is_some() {
        let new_date = match payload.date.as_deref() {
            Some(value) => validation::parse_date(value)?,
            None => existing.date,
        };
        let new_time = match payload.time.as_deref() {
            Some(value) => validation::parse_time(value)?,
            None => existing.time,
        };
        if !validation::is_future_slot(new_date, new_time) {
            return Err(ApiError::Validation(
                "Appointments cannot be rescheduled to the past".to_string(),
            ));
        }
        active.date = Set(new_date);
        active.time = Set(new_time);
    }

    if let Some(pet_id) = payload.pet_id {
        Pet::find_by_id(pet_id)
            .one(&db)
            .await?
            .ok_or_else(|| ApiError::NotFound("The specified pet does not exist".to_string()))?;
        active.pet_id = Set(pet_id);
    }
    if let Some(reason) = payload.reason.as_deref() {
        active.reason = Set(validation::non_blank("reason", reason)?);
    }
    if let Some(status) = payload.status.as_deref() {
        active.status = Set(AppointmentStatus::parse(status)?.as_str().to_string());
    }

    let model = if active.is_changed() {
        active.update(&db).await?
    } else {
        existing
    };

    let pet_model = model.find_related(Pet).one(&db).await?;
    let response = appointment_response(&db, model, pet_model).await?;
    Ok(Json(json!({
        "message": "Appointment updated successfully",
        "appointment": response,
    })))
}

// DELETE /api/appointments/:id
pub async fn delete_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = Appointment::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    model.delete(&db).await?;
    info!("deleted appointment {id}");

    Ok(Json(json!({ "message": "Appointment deleted successfully" })))
}
