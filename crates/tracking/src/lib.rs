use std::fmt;

pub mod broadcast;
pub mod client;
pub mod config;
pub mod database;
pub mod ingest;
pub mod memory;
pub mod registry;
pub mod reset;
pub mod state;
pub mod viewer;

pub use client::Tracker;
pub use config::TrackerConfig;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    Database(database::DatabaseError),
    Reset(reset::ResetError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Database(why) => write!(f, "database error: {}", why),
            Self::Reset(why) => write!(f, "reset failed: {}", why),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

impl From<reset::ResetError> for RequestError {
    fn from(value: reset::ResetError) -> Self {
        Self::Reset(value)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
