use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{owner, pet, prelude::*};
use crate::error::ApiError;
use crate::validation::{self, double_option};

use super::owners::SearchParams;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub age: String,
    pub age_years: f64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub owner_id: i32,
    pub owner_name: Option<String>,
    pub appointment_count: u64,
    pub record_count: u64,
}

pub(crate) async fn pet_response(
    db: &DatabaseConnection,
    model: pet::Model,
    owner_model: Option<owner::Model>,
) -> Result<PetResponse, ApiError> {
    let appointment_count = model.find_related(Appointment).count(db).await?;
    let record_count = model.find_related(ClinicalRecord).count(db).await?;
    let today = Local::now().date_naive();

    Ok(PetResponse {
        age: model.age_label(today),
        age_years: model.age_in_years(today),
        owner_name: owner_model.map(|o| o.full_name()),
        id: model.id,
        name: model.name,
        species: model.species,
        breed: model.breed,
        birth_date: model.birth_date,
        weight: model.weight,
        notes: model.notes,
        owner_id: model.owner_id,
        appointment_count,
        record_count,
    })
}

async fn pet_response_with_owner(
    db: &DatabaseConnection,
    model: pet::Model,
) -> Result<PetResponse, ApiError> {
    let owner_model = Owner::find_by_id(model.owner_id).one(db).await?;
    pet_response(db, model, owner_model).await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<String>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub owner_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub owner_id: Option<i32>,
}

// GET /api/pets - list all pets with owner data, ordered by name
pub async fn list_pets(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<impl IntoResponse, ApiError> {
    let pets = Pet::find()
        .find_also_related(Owner)
        .order_by_asc(pet::Column::Name)
        .all(&db)
        .await?;

    let mut response = Vec::with_capacity(pets.len());
    for (model, owner_model) in pets {
        response.push(pet_response(&db, model, owner_model).await?);
    }
    Ok(Json(response))
}

// GET /api/pets/:id
pub async fn get_pet(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = Pet::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pet not found".to_string()))?;

    Ok(Json(pet_response_with_owner(&db, model).await?))
}

// POST /api/pets - register a pet under an existing owner
pub async fn create_pet(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreatePetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = validation::required_text("name", payload.name.as_deref())?;
    let species = validation::required_text("species", payload.species.as_deref())?;
    let breed = validation::required_text("breed", payload.breed.as_deref())?;
    let birth_date_raw = validation::required_text("birthDate", payload.birth_date.as_deref())?;
    let owner_id = payload
        .owner_id
        .ok_or_else(|| ApiError::Validation("The field 'ownerId' is required".to_string()))?;

    let owner_model = Owner::find_by_id(owner_id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("The specified owner does not exist".to_string()))?;

    let birth_date = validation::parse_birth_date(&birth_date_raw)?;

    let new_pet = pet::ActiveModel {
        name: Set(name),
        species: Set(species),
        breed: Set(breed),
        birth_date: Set(birth_date),
        weight: Set(payload.weight),
        notes: Set(validation::optional_text(payload.notes)),
        owner_id: Set(owner_id),
        ..Default::default()
    };
    let model = new_pet.insert(&db).await?;
    info!("registered pet {}", model.id);

    let response = pet_response(&db, model, Some(owner_model)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Pet registered successfully",
            "pet": response,
        })),
    ))
}

// PUT /api/pets/:id - partial update
pub async fn update_pet(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = Pet::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pet not found".to_string()))?;

    let mut active: pet::ActiveModel = existing.clone().into();

    if let Some(name) = payload.name.as_deref() {
        active.name = Set(validation::non_blank("name", name)?);
    }
    if let Some(owner_id) = payload.owner_id {
        Owner::find_by_id(owner_id)
            .one(&db)
            .await?
            .ok_or_else(|| ApiError::NotFound("The specified owner does not exist".to_string()))?;
        active.owner_id = Set(owner_id);
    }
    if let Some(birth_date) = payload.birth_date.as_deref() {
        active.birth_date = Set(validation::parse_birth_date(birth_date)?);
    }
    if let Some(species) = payload.species.as_deref() {
        active.species = Set(species.trim().to_string());
    }
    if let Some(breed) = payload.breed.as_deref() {
        active.breed = Set(breed.trim().to_string());
    }
    if let Some(weight) = payload.weight {
        active.weight = Set(weight);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(validation::optional_text(notes));
    }

    let model = if active.is_changed() {
        active.update(&db).await?
    } else {
        existing
    };

    let response = pet_response_with_owner(&db, model).await?;
    Ok(Json(json!({
        "message": "Pet updated successfully",
        "pet": response,
    })))
}

// DELETE /api/pets/:id - removes the pet and its appointments and records
pub async fn delete_pet(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = Pet::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pet not found".to_string()))?;

    let name = model.name.clone();
    model.delete(&db).await?;
    info!("deleted pet {id}");

    Ok(Json(json!({
        "message": format!(
            "Pet '{name}' deleted along with its appointments and clinical records"
        ),
    })))
}

// GET /api/pets/search?q= - match on pet name or the owner's name or document
pub async fn search_pets(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let term = params.q.trim().to_lowercase();
    if term.is_empty() {
        return Err(ApiError::Validation(
            "A search term is required".to_string(),
        ));
    }
    let pattern = format!("%{term}%");

    let pets = Pet::find()
        .find_also_related(Owner)
        .filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((pet::Entity, pet::Column::Name))))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        owner::Entity,
                        owner::Column::Document,
                    ))))
                    .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((owner::Entity, owner::Column::Name))))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        owner::Entity,
                        owner::Column::Surname,
                    ))))
                    .like(pattern),
                ),
        )
        .order_by_asc(pet::Column::Name)
        .all(&db)
        .await?;

    let mut response = Vec::with_capacity(pets.len());
    for (model, owner_model) in pets {
        response.push(pet_response(&db, model, owner_model).await?);
    }
    Ok(Json(response))
}
