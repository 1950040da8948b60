use chrono::{Datelike, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "pets")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: Date,
    pub weight: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub owner_id: i32,
}

impl Model {
    /// Calendar age relative to `today`, as a label such as
    /// "3 years and 2 months" or "5 months". Months borrow a year and days
    /// borrow a month, the same arithmetic as counting birthdays.
    pub fn age_label(&self, today: NaiveDate) -> String {
        let mut years = today.year() - self.birth_date.year();
        let mut months = today.month() as i32 - self.birth_date.month() as i32;

        if today.day() < self.birth_date.day() {
            months -= 1;
        }
        if months < 0 {
            years -= 1;
            months += 12;
        }

        let month_word = if months == 1 { "month" } else { "months" };
        if years > 0 {
            let year_word = if years == 1 { "year" } else { "years" };
            format!("{years} {year_word} and {months} {month_word}")
        } else {
            format!("{months} {month_word}")
        }
    }

    /// Age in decimal years (days since birth / 365.25), one decimal place.
    pub fn age_in_years(&self, today: NaiveDate) -> f64 {
        let days = (today - self.birth_date).num_days();
        (days as f64 / 365.25 * 10.0).round() / 10.0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointment,
    #[sea_orm(has_many = "super::clinical_record::Entity")]
    ClinicalRecord,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl Related<super::clinical_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClinicalRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
