use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ConnectionInfo;
use crate::entities::prelude::*;
use crate::error::ApiError;

const OWNER_COLUMNS: &[&str] = &[
    "id", "name", "surname", "document", "phone", "email", "address",
];
const PET_COLUMNS: &[&str] = &[
    "id", "name", "species", "breed", "birth_date", "weight", "notes", "owner_id",
];
const APPOINTMENT_COLUMNS: &[&str] = &["id", "date", "time", "reason", "status", "pet_id"];
const CLINICAL_RECORD_COLUMNS: &[&str] = &[
    "id",
    "date",
    "diagnosis",
    "treatment",
    "medications",
    "veterinarian",
    "observations",
    "weight_at_visit",
    "pet_id",
];

// GET /api/status - health endpoint with the active connection description
pub async fn status(Extension(connection): Extension<ConnectionInfo>) -> impl IntoResponse {
    Json(json!({
        "status": "active",
        "application": "Veterinary Clinic API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": connection.description,
    }))
}

// GET /api/admin/info - row counts per table
pub async fn info(
    Extension(db): Extension<DatabaseConnection>,
    Extension(connection): Extension<ConnectionInfo>,
) -> Result<impl IntoResponse, ApiError> {
    let tables = json!([
        { "name": "owners", "rows": Owner::find().count(&db).await? },
        { "name": "pets", "rows": Pet::find().count(&db).await? },
        { "name": "appointments", "rows": Appointment::find().count(&db).await? },
        { "name": "clinical_records", "rows": ClinicalRecord::find().count(&db).await? },
    ]);

    Ok(Json(json!({
        "connection": connection.description,
        "tables": tables,
    })))
}

/// Serializes every row of a table with all values stringified, for
/// operational inspection.
async fn dump_rows<E>(db: &DatabaseConnection, columns: &[&str]) -> Result<Vec<Value>, ApiError>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let rows = E::find().all(db).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let value = serde_json::to_value(&row)?;
        let mut flat = serde_json::Map::new();
        for column in columns {
            let cell = match value.get(*column) {
                None | Some(Value::Null) => Value::Null,
                Some(Value::String(s)) => Value::String(s.clone()),
                Some(other) => Value::String(other.to_string()),
            };
            flat.insert((*column).to_string(), cell);
        }
        out.push(Value::Object(flat));
    }
    Ok(out)
}

// GET /api/admin/tables/:name - raw rows of one of the four tables
pub async fn table_dump(
    Extension(db): Extension<DatabaseConnection>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (columns, rows) = match name.as_str() {
        "owners" => (OWNER_COLUMNS, dump_rows::<Owner>(&db, OWNER_COLUMNS).await?),
        "pets" => (PET_COLUMNS, dump_rows::<Pet>(&db, PET_COLUMNS).await?),
        "appointments" => (
            APPOINTMENT_COLUMNS,
            dump_rows::<Appointment>(&db, APPOINTMENT_COLUMNS).await?,
        ),
        "clinical_records" => (
            CLINICAL_RECORD_COLUMNS,
            dump_rows::<ClinicalRecord>(&db, CLINICAL_RECORD_COLUMNS).await?,
        ),
        _ => return Err(ApiError::NotFound(format!("Table '{name}' not found"))),
    };

    Ok(Json(json!({
        "table": name,
        "columns": columns,
        "rows": rows,
        "total": rows.len(),
    })))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: &'static str,
    pub r#type: &'static str,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<&'static str>,
}

#[derive(Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: Vec<ColumnSchema>,
}

fn col(name: &'static str, r#type: &'static str) -> ColumnSchema {
    ColumnSchema {
        name,
        r#type,
        nullable: false,
        primary_key: false,
        unique: false,
        foreign_key: None,
    }
}

fn table_schemas() -> Vec<TableSchema> {
    vec![
        TableSchema {
            name: "owners",
            columns: vec![
                ColumnSchema {
                    primary_key: true,
                    ..col("id", "INTEGER")
                },
                col("name", "VARCHAR"),
                col("surname", "VARCHAR"),
                ColumnSchema {
                    unique: true,
                    ..col("document", "VARCHAR")
                },
                col("phone", "VARCHAR"),
                ColumnSchema {
                    nullable: true,
                    ..col("email", "VARCHAR")
                },
                ColumnSchema {
                    nullable: true,
                    ..col("address", "VARCHAR")
                },
            ],
        },
        TableSchema {
            name: "pets",
            columns: vec![
                ColumnSchema {
                    primary_key: true,
                    ..col("id", "INTEGER")
                },
                col("name", "VARCHAR"),
                col("species", "VARCHAR"),
                col("breed", "VARCHAR"),
                col("birth_date", "DATE"),
                ColumnSchema {
                    nullable: true,
                    ..col("weight", "DOUBLE")
                },
                ColumnSchema {
                    nullable: true,
                    ..col("notes", "TEXT")
                },
                ColumnSchema {
                    foreign_key: Some("owners.id"),
                    ..col("owner_id", "INTEGER")
                },
            ],
        },
        TableSchema {
            name: "appointments",
            columns: vec![
                ColumnSchema {
                    primary_key: true,
                    ..col("id", "INTEGER")
                },
                col("date", "DATE"),
                col("time", "TIME"),
                col("reason", "VARCHAR"),
                col("status", "VARCHAR"),
                ColumnSchema {
                    foreign_key: Some("pets.id"),
                    ..col("pet_id", "INTEGER")
                },
            ],
        },
        TableSchema {
            name: "clinical_records",
            columns: vec![
                ColumnSchema {
                    primary_key: true,
                    ..col("id", "INTEGER")
                },
                col("date", "DATE"),
                col("diagnosis", "VARCHAR"),
                col("treatment", "TEXT"),
                ColumnSchema {
                    nullable: true,
                    ..col("medications", "VARCHAR")
                },
                col("veterinarian", "VARCHAR"),
                ColumnSchema {
                    nullable: true,
                    ..col("observations", "TEXT")
                },
                ColumnSchema {
                    nullable: true,
                    ..col("weight_at_visit", "DOUBLE")
                },
                ColumnSchema {
                    foreign_key: Some("pets.id"),
                    ..col("pet_id", "INTEGER")
                },
            ],
        },
    ]
}

// GET /api/admin/schema - tables, columns, types, PKs and FKs
pub async fn schema(Extension(connection): Extension<ConnectionInfo>) -> impl IntoResponse {
    let tables = table_schemas();
    Json(json!({
        "totalTables": tables.len(),
        "tables": tables,
        "connection": connection.description,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_covers_the_four_tables() {
        let tables = table_schemas();
        let names: Vec<&str> = tables.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["owners", "pets", "appointments", "clinical_records"]
        );
    }

    #[test]
    fn each_table_has_exactly_one_primary_key() {
        for table in table_schemas() {
            let pks = table.columns.iter().filter(|c| c.primary_key).count();
            assert_eq!(pks, 1, "table {}", table.name);
        }
    }

    #[test]
    fn foreign_keys_point_at_parent_tables() {
        let tables = table_schemas();
        let fks: Vec<&str> = tables
            .iter()
            .flat_map(|t| t.columns.iter().filter_map(|c| c.foreign_key))
            .collect();
        assert_eq!(fks, vec!["owners.id", "pets.id", "pets.id"]);
    }

    #[test]
    fn schema_column_names_match_dump_columns() {
        let tables = table_schemas();
        let expected: Vec<&[&str]> = vec![
            OWNER_COLUMNS,
            PET_COLUMNS,
            APPOINTMENT_COLUMNS,
            CLINICAL_RECORD_COLUMNS,
        ];
        for (table, columns) in tables.iter().zip(expected) {
            let names: Vec<&str> = table.columns.iter().map(|c| c.name).collect();
            assert_eq!(names, columns, "table {}", table.name);
        }
    }
}
