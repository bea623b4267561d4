//! CW20 allowance helpers shared by contracts that pull tokens with `TransferFrom`.

use cosmwasm_std::{Addr, BlockInfo, QuerierWrapper, StdResult, Uint128};
use cw20::{AllowanceResponse, Cw20QueryMsg};

/// Allowance `owner` granted `spender` on `token` that is usable in `block`.
/// An expired allowance counts as zero.
pub fn spendable_allowance(
    querier: &QuerierWrapper,
    token: &Addr,
    owner: &Addr,
    spender: &Addr,
    block: &BlockInfo,
) -> StdResult<Uint128> {
    let response: AllowanceResponse = querier.query_wasm_smart(
        token,
        &Cw20QueryMsg::Allowance {
            owner: owner.to_string(),
            spender: spender.to_string(),
        },
    )?;

    if response.expires.is_expired(block) {
        Ok(Uint128::zero())
    } else {
        Ok(response.allowance)
    }
}
