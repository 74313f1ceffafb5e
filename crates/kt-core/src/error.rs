//! Error taxonomy for tree construction and tree stages

/// Structural violation found while building a tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedTreeError {
    #[error("Empty tree: no links defined")]
    EmptyTree,
    #[error("Duplicate link name: {0}")]
    DuplicateLink(String),
    #[error("Duplicate joint name: {0}")]
    DuplicateJoint(String),
    #[error("Joint '{joint}' references non-existent link '{link}'")]
    MissingLink { joint: String, link: String },
    #[error("Link '{link}' is the child of both joint '{first}' and joint '{second}'")]
    MultipleParents {
        link: String,
        first: String,
        second: String,
    },
    #[error("Multiple root links: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),
    #[error("Cycle detected through link '{0}'")]
    Cycle(String),
}

/// A link or joint name that is absent from the tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("Link not found: {0}")]
    Link(String),
    #[error("Joint not found: {0}")]
    Joint(String),
}

/// Errors from operations addressing a single joint
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("Joint '{0}' is not fixed")]
    NotFixed(String),
}
