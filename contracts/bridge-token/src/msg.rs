//! Message types for the bridge token contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint128};
use cw20::{
    AllAccountsResponse, AllowanceResponse, BalanceResponse, Expiration, MinterResponse,
    TokenInfoResponse,
};

use crate::state::NativeBinding;

/// Sent by the bridge; the instantiating address becomes the only minter.
#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub native_chain_id: String,
    pub native_bridge: String,
    pub native_asset: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    Transfer {
        recipient: String,
        amount: Uint128,
    },
    Send {
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    DecreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
    /// Minter only
    Mint {
        recipient: String,
        amount: Uint128,
    },
    /// Minter only; burns from the minter's own balance
    Burn {
        amount: Uint128,
    },
    /// Minter only; burns from `owner` using an allowance
    BurnFrom {
        owner: String,
        amount: Uint128,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BalanceResponse)]
    Balance { address: String },

    #[returns(TokenInfoResponse)]
    TokenInfo {},

    #[returns(AllowanceResponse)]
    Allowance { owner: String, spender: String },

    #[returns(Option<MinterResponse>)]
    Minter {},

    #[returns(AllAccountsResponse)]
    AllAccounts {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(NativeBinding)]
    NativeBinding {},
}

#[cw_serde]
pub struct MigrateMsg {}
