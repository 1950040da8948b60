pub use super::appointment::Entity as Appointment;
pub use super::clinical_record::Entity as ClinicalRecord;
pub use super::owner::Entity as Owner;
pub use super::pet::Entity as Pet;
