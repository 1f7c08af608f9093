use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Slot already written: {0}")]
    SlotConflict(String),

    #[error("Empty slot name")]
    EmptySlotName,

    #[error("Unknown accommodation level: {0}")]
    UnknownAccommodationLevel(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
