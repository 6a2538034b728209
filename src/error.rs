use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read '{0}': {1}")]
    Io(String, #[source] std::io::Error),
    #[error(transparent)]
    Formula(#[from] ltl::Error),
    #[error(transparent)]
    TransitionSystem(#[from] ts::Error),
    #[error(transparent)]
    Verify(#[from] verify::Error),
}
