use thiserror::Error;

/// Why a landmark frame from the tracker was rejected.
///
/// Rejection is never fatal: the host logs it and treats the frame as "no
/// face detected".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("flat landmark buffer length {0} is not a multiple of 3")]
    RaggedBuffer(usize),
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown treatment `{0}` (expected none, filler, laser or skin-improvement)")]
pub struct ParseTreatmentError(pub String);
