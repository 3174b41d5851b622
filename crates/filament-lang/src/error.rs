use thiserror::Error;

/// Errors from lowering a surface expression into a net.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("unbound variable `{0}`")]
    Unbound(String),

    #[error("binder `{0}` used more often than its occurrence count")]
    SupplyExhausted(String),

    #[error(transparent)]
    Net(#[from] filament_net::Error),
}
