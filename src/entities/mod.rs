pub mod appointment;
pub mod clinical_record;
pub mod owner;
pub mod pet;

pub use appointment::Entity as Appointment;
pub use clinical_record::Entity as ClinicalRecord;
pub use owner::Entity as Owner;
pub use pet::Entity as Pet;

pub mod prelude;
