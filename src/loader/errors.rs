use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No usable data: none of the [{attempted}] supplied sources could be parsed")]
    NoUsableData {
        attempted: usize
    }
}
