use crate::token::Token;

/// Failures of a top-level `get`/`get_all` call. All of them are fatal to
/// the call that produced them: nothing is retried and nothing activated
/// by a failed branch is cached.
#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No provider found for token `{token}`")]
    NoProviderForTokenFound { token: Token },
    #[error("Multiple instances found for token `{token}`: expected one, found {found}")]
    MultipleInstanceFound { token: Token, found: usize },
    #[error("Cycle detected: token `{token}` is already activating, required by `{dependant}`")]
    CycleDependencyDetected { token: Token, dependant: Token },
    #[error("Factory for token `{token}` failed: {source}")]
    Factory {
        token: Token,
        #[source]
        source: InstantiateErrorKind,
    },
}

/// Failures raised by factories or by the positional argument accessors
/// handed to them.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Missing argument at position {index}")]
    MissingArgument { index: usize },
    #[error("Argument at position {index} has a different multiplicity than requested")]
    MultiplicityMismatch { index: usize },
    #[error("Argument at position {index} is not a `{expected}`")]
    IncorrectType { index: usize, expected: &'static str },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
