//! Error types for the bridge token contract

use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Cw20(#[from] cw20_base::ContractError),

    #[error("Unauthorized: only the owning bridge can mint or burn")]
    Unauthorized,

    #[error("Native binding field must not be empty: {field}")]
    EmptyBindingField { field: String },
}
