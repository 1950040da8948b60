use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::entities::{owner, prelude::*};
use crate::error::ApiError;
use crate::validation::{self, double_option};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub document: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub pet_count: u64,
}

async fn owner_response(
    db: &DatabaseConnection,
    model: owner::Model,
) -> Result<OwnerResponse, ApiError> {
    let pet_count = model.find_related(Pet).count(db).await?;
    Ok(OwnerResponse {
        id: model.id,
        name: model.name,
        surname: model.surname,
        document: model.document,
        phone: model.phone,
        email: model.email,
        address: model.address,
        pet_count,
    })
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOwnerRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOwnerRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
}

// GET /api/owners - list all registered owners, ordered by name
pub async fn list_owners(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<impl IntoResponse, ApiError> {
    let owners = Owner::find()
        .order_by_asc(owner::Column::Name)
        .all(&db)
        .await?;

    let mut response = Vec::with_capacity(owners.len());
    for model in owners {
        response.push(owner_response(&db, model).await?);
    }
    Ok(Json(response))
}

// GET /api/owners/:id
pub async fn get_owner(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = Owner::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Owner not found".to_string()))?;

    Ok(Json(owner_response(&db, model).await?))
}

// POST /api/owners
pub async fn create_owner(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateOwnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = validation::required_text("name", payload.name.as_deref())?;
    let surname = validation::required_text("surname", payload.surname.as_deref())?;
    let document = validation::required_text("document", payload.document.as_deref())?;
    let phone = validation::required_text("phone", payload.phone.as_deref())?;

    let duplicate = Owner::find()
        .filter(owner::Column::Document.eq(&document))
        .one(&db)
        .await?;
    if duplicate.is_some() {
        return Err(ApiError::Conflict(
            "An owner with that document already exists".to_string(),
        ));
    }

    let new_owner = owner::ActiveModel {
        name: Set(name),
        surname: Set(surname),
        document: Set(document),
        phone: Set(phone),
        email: Set(validation::optional_text(payload.email)),
        address: Set(validation::optional_text(payload.address)),
        ..Default::default()
    };
    let model = new_owner.insert(&db).await?;
    info!("registered owner {}", model.id);

    let response = owner_response(&db, model).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Owner registered successfully",
            "owner": response,
        })),
    ))
}

// PUT /api/owners/:id - partial update, only fields present in the body change
pub async fn update_owner(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOwnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = Owner::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Owner not found".to_string()))?;

    let mut active: owner::ActiveModel = existing.clone().into();

    if let Some(name) = payload.name.as_deref() {
        active.name = Set(validation::non_blank("name", name)?);
    }
    if let Some(surname) = payload.surname.as_deref() {
        active.surname = Set(validation::non_blank("surname", surname)?);
    }
    if let Some(document) = payload.document.as_deref() {
        let document = validation::non_blank("document", document)?;
        if document != existing.document {
            let duplicate = Owner::find()
                .filter(owner::Column::Document.eq(&document))
                .one(&db)
                .await?;
            if duplicate.is_some() {
                return Err(ApiError::Conflict(
                    "An owner with that document already exists".to_string(),
                ));
            }
        }
        active.document = Set(document);
    }
    if let Some(phone) = payload.phone.as_deref() {
        active.phone = Set(validation::non_blank("phone", phone)?);
    }
    if let Some(email) = payload.email {
        active.email = Set(validation::optional_text(email));
    }
    if let Some(address) = payload.address {
        active.address = Set(validation::optional_text(address));
    }

    let model = if active.is_changed() {
        active.update(&db).await?
    } else {
        existing
    };

    let response = owner_response(&db, model).await?;
    Ok(Json(json!({
        "message": "Owner updated successfully",
        "owner": response,
    })))
}

// DELETE /api/owners/:id - removes the owner and all dependent rows
pub async fn delete_owner(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let model = Owner::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Owner not found".to_string()))?;

    let full_name = model.full_name();
    model.delete(&db).await?;
    info!("deleted owner {id}");

    Ok(Json(json!({
        "message": format!(
            "Owner '{full_name}' deleted along with their pets and appointments"
        ),
    })))
}

// GET /api/owners/search?q= - substring match on name, surname or document
pub async fn search_owners(
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

    let owners = Owner::find()
        .filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((owner::Entity, owner::Column::Name))))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        owner::Entity,
                        owner::Column::Surname,
                    ))))
                    .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        owner::Entity,
                        owner::Column::Document,
                    ))))
                    .like(pattern),
                ),
        )
        .all(&db)
        .await?;

    let mut response = Vec::with_capacity(owners.len());
    for model in owners {
        response.push(owner_response(&db, model).await?);
    }
    Ok(Json(response))
}
