use thiserror::Error;

/// Failures reported through a [`crate::RenderBackend`], tagged with where
/// they happened. `E` is the backend's own error type.
#[derive(Error, Debug)]
pub enum RenderError<E> {
    #[error("failed to compile {program} shader program: {source}")]
    Compile { program: &'static str, source: E },

    #[error("failed to upload star vertices: {0}")]
    Upload(#[source] E),

    #[error("draw call failed: {0}")]
    Draw(#[source] E),
}

pub type Result<T, E> = std::result::Result<T, RenderError<E>>;
