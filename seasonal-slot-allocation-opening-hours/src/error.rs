use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpeningHoursError {
    #[error("calendar service rejected resource {resource}: {message}")]
    Resource { resource: String, message: String },
    #[error("calendar service unavailable: {0}")]
    Unavailable(String),
    #[error("io {0}")]
    Io(#[from] std::io::Error),
}
