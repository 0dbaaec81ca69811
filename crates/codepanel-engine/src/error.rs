use thiserror::Error;

/// Why a `code` element could not be turned into a panel-carrying block.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("code element is not inside a <pre> element")]
    MissingPre,
    #[error("code block has no enclosing .highlight container")]
    MissingHighlight,
    #[error("action panel could not be created")]
    MissingPanel,
}
