use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{clinical_record, pet, prelude::*};
use crate::error::ApiError;
use crate::validation::{self, double_option};

use super::pets::pet_response;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalRecordResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub diagnosis: String,
    pub treatment: String,
    pub medications: Option<String>,
    pub veterinarian: String,
    pub observations: Option<String>,
    pub weight_at_visit: Option<f64>,
    pub pet_id: i32,
    pub pet_name: Option<String>,
    pub owner_name: Option<String>,
}

async fn record_response(
    db: &DatabaseConnection,
    model: clinical_record::Model,
    pet_model: Option<pet::Model>,
) -> Result<ClinicalRecordResponse, ApiError> {
    let owner_name = match &pet_model {
        Some(p) => Owner::find_by_id(p.owner_id)
            .one(db)
            .await?
            .map(|o| o.full_name()),
        None => None,
    };

    Ok(ClinicalRecordResponse {
        id: model.id,
        date: model.date,
        diagnosis: model.diagnosis,
        treatment: model.treatment,
        medications: model.medications,
        veterinarian: model.veterinarian,
        observations: model.observations,
        weight_at_visit: model.weight_at_visit,
        pet_id: model.pet_id,
        pet_name: pet_model.map(|p| p.name),
        owner_name,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicalRecordRequest {
    pub date: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub veterinarian: Option<String>,
    pub observations: Option<String>,
    pub weight_at_visit: Option<f64>,
    pub pet_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClinicalRecordRequest {
    pub date: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub medications: Option<Option<String>>,
    pub veterinarian: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub observations: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight_at_visit: Option<Option<f64>>,
}

// GET /api/clinical-records - most recent first
pub async fn list_records(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<impl IntoResponse, ApiError> {
    let records = ClinicalRecord::find()
        .find_also_related(Pet)
        .order_by_desc(clinical_record::Column::Date)
        .all(&db)
        .await?;

    let mut response = Vec::with_capacity(records.len());
    for (model, pet_model) in records {
        response.push(record_response(&db, model, pet_model).await?);
    }
    Ok(Json(response))
}

// GET /api/clinical-records/:id
pub async fn get_record(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = ClinicalRecord::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Clinical record not found".to_string()))?;

    let pet_model = model.find_related(Pet).one(&db).await?;
    Ok(Json(record_response(&db, model, pet_model).await?))
}

// GET /api/clinical-records/by-pet/:pet_id - a pet's full history
pub async fn records_by_pet(
    Extension(db): Extension<DatabaseConnection>,
    Path(pet_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let pet_model = Pet::find_by_id(pet_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pet not found".to_string()))?;

    let records = ClinicalRecord::find()
        .filter(clinical_record::Column::PetId.eq(pet_id))
        .order_by_desc(clinical_record::Column::Date)
        .all(&db)
        .await?;

    let mut history = Vec::with_capacity(records.len());
    for model in records {
        history.push(record_response(&db, model, Some(pet_model.clone())).await?);
    }

    let owner_model = Owner::find_by_id(pet_model.owner_id).one(&db).await?;
    let pet = pet_response(&db, pet_model, owner_model).await?;

    Ok(Json(json!({
        "pet": pet,
        "records": history,
        "totalRecords": history.len(),
    })))
}

// POST /api/clinical-records - record a visit that already happened
pub async fn create_record(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateClinicalRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let diagnosis = validation::required_text("diagnosis", payload.diagnosis.as_deref())?;
    let treatment = validation::required_text("treatment", payload.treatment.as_deref())?;
    let veterinarian = validation::required_text("veterinarian", payload.veterinarian.as_deref())?;
    let pet_id = payload
        .pet_id
        .ok_or_else(|| ApiError::Validation("The field 'petId' is required".to_string()))?;

    let pet_model = Pet::find_by_id(pet_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("The specified pet does not exist".to_string()))?;

    let date = match payload.date.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => validation::parse_date(value)?,
        _ => Local::now().date_naive(),
    };

    let new_record = clinical_record::ActiveModel {
        date: Set(date),
        diagnosis: Set(diagnosis),
        treatment: Set(treatment),
        medications: Set(validation::optional_text(payload.medications)),
        veterinarian: Set(veterinarian),
        observations: Set(validation::optional_text(payload.observations)),
        weight_at_visit: Set(payload.weight_at_visit),
        pet_id: Set(pet_id),
        ..Default::default()
    };
    let model = new_record.insert(&db).await?;
    info!("created clinical record {}", model.id);

    let response = record_response(&db, model, Some(pet_model)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Clinical record created successfully",
            "record": response,
        })),
    ))
}

// PUT /api/clinical-records/:id - partial update
pub async fn update_record(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClinicalRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = ClinicalRecord::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Clinical record not found".to_string()))?;

    let mut active: clinical_record::ActiveModel = existing.clone().into();

    if let Some(diagnosis) = payload.diagnosis.as_deref() {
        active.diagnosis = Set(validation::non_blank("diagnosis", diagnosis)?);
    }
    if let Some(treatment) = payload.treatment.as_deref() {
        active.treatment = Set(validation::non_blank("treatment", treatment)?);
    }
    if let Some(date) = payload.date.as_deref() {
        active.date = Set(validation::parse_date(date)?);
    }
    if let Some(veterinarian) = payload.veterinarian.as_deref() {
        active.veterinarian = Set(validation::non_blank("veterinarian", veterinarian)?);
    }
    if let Some(medications) = payload.medications {
        active.medications = Set(validation::optional_text(medications));
    }
    if let Some(observations) = payload.observations {
        active.observations = Set(validation::optional_text(observations));
    }
    if let Some(weight_at_visit) = payload.weight_at_visit {
        active.weight_at_visit = Set(weight_at_visit);
    }

    let model = if active.is_changed() {
        active.update(&db).await?
    } else {
        existing
    };

    let pet_model = model.find_related(Pet).one(&db).await?;
    let response = record_response(&db, model, pet_model).await?;
    Ok(Json(json!({
        "message": "Clinical record updated successfully",
        "record": response,
    })))
}

// DELETE /api/clinical-records/:id
pub async fn delete_record(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = ClinicalRecord::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Clinical record not found".to_string()))?;

    model.delete(&db).await?;
    info!("deleted clinical record {id}");

    Ok(Json(json!({ "message": "Clinical record deleted successfully" })))
}
