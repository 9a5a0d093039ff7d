pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid map document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid map document: no map element")]
    MissingMapElement,

    #[error("invalid map document: no root node")]
    MissingRootNode,

    #[error("invalid map JSON: {0}")]
    Json(#[from] serde_json::Error),
}
