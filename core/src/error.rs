use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Unknown card")]
    UnknownCard,
    #[error("No game has been dealt yet")]
    NotStarted,
    #[error("A new deal is in progress")]
    DealInProgress,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Expected {expected} images, got {actual}")]
    WrongImageCount { expected: usize, actual: usize },
    #[error("Image identifiers must be distinct")]
    DuplicateImage,
    #[error("A deck needs at least one pair")]
    NoPairs,
    #[error("Too many pairs for a single deck")]
    TooManyPairs,
    #[error("Images could not be acquired")]
    ImagesUnavailable,
    #[error("Deal request was superseded or already settled")]
    StaleDeal,
    #[error("Resolution does not belong to the pending pair")]
    StaleResolution,
}

pub type Result<T> = core::result::Result<T, GameError>;
