#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("layout tree has no nodes")]
    EmptyTree,

    #[error("child index {index} is out of bounds")]
    ChildOutOfBounds { index: usize },

    #[error("node {index} is claimed by more than one parent (or is the root)")]
    DuplicateChild { index: usize },

    #[error("node {index} is not reachable from the root")]
    UnreachableNode { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
