//! Integration tests for the bridge token contract using cw-multi-test.

use cosmwasm_std::{Addr, Empty, Uint128};
use cw20::{BalanceResponse, MinterResponse, TokenInfoResponse};
use cw_multi_test::{App, ContractWrapper, Executor};

use bridge_token::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use bridge_token::NativeBinding;

// ============================================================================
// Test Setup
// ============================================================================

fn contract_bridge_token() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge_token::contract::execute,
        bridge_token::contract::instantiate,
        bridge_token::contract::query,
    );
    Box::new(contract)
}

fn setup() -> (App, Addr, Addr, Addr) {
    let mut app = App::default();
    let bridge = Addr::unchecked("bridge");
    let user = Addr::unchecked("user");

    let code_id = app.store_code(contract_bridge_token());
    let token = app
        .instantiate_contract(
            code_id,
            bridge.clone(),
            &InstantiateMsg {
                name: "Mock Token".to_string(),
                symbol: "EXMP".to_string(),
                decimals: 18,
                native_chain_id: "c-chain".to_string(),
                native_bridge: "bridge-c".to_string(),
                native_asset: "token-x".to_string(),
            },
            &[],
            "bridge-token",
            None,
        )
        .unwrap();

    (app, token, bridge, user)
}

fn balance(app: &App, token: &Addr, address: &Addr) -> Uint128 {
    let res: BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            token,
            &QueryMsg::Balance {
                address: address.to_string(),
            },
        )
        .unwrap();
    res.balance
}

fn mint(app: &mut App, token: &Addr, bridge: &Addr, recipient: &Addr, amount: u128) {
    app.execute_contract(
        bridge.clone(),
        token.clone(),
        &ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        },
        &[],
    )
    .unwrap();
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn test_instantiate_records_binding_and_metadata() {
    let (app, token, bridge, _user) = setup();

    let binding: NativeBinding = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::NativeBinding {})
        .unwrap();
    assert_eq!(binding.native_chain_id, "c-chain");
    assert_eq!(binding.native_bridge, "bridge-c");
    assert_eq!(binding.native_asset, "token-x");

    let info: TokenInfoResponse = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::TokenInfo {})
        .unwrap();
    assert_eq!(info.name, "Mock Token");
    assert_eq!(info.symbol, "EXMP");
    assert_eq!(info.decimals, 18);
    assert_eq!(info.total_supply, Uint128::zero());

    let minter: Option<MinterResponse> = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::Minter {})
        .unwrap();
    assert_eq!(minter.unwrap().minter, bridge.to_string());
}

#[test]
fn test_instantiate_rejects_empty_binding() {
    let mut app = App::default();
    let code_id = app.store_code(contract_bridge_token());

    let res = app.instantiate_contract(
        code_id,
        Addr::unchecked("bridge"),
        &InstantiateMsg {
            name: "Mock Token".to_string(),
            symbol: "EXMP".to_string(),
            decimals: 18,
            native_chain_id: "c-chain".to_string(),
            native_bridge: String::new(),
            native_asset: "token-x".to_string(),
        },
        &[],
        "bridge-token",
        None,
    );

    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(
        err_str.contains("native_bridge"),
        "Expected empty binding error, got: {}",
        err_str
    );
}

// ============================================================================
// Mint / Burn
// ============================================================================

#[test]
fn test_only_bridge_can_mint() {
    let (mut app, token, bridge, user) = setup();

    mint(&mut app, &token, &bridge, &user, 1_000);
    assert_eq!(balance(&app, &token, &user), Uint128::new(1_000));

    let res = app.execute_contract(
        user.clone(),
        token.clone(),
        &ExecuteMsg::Mint {
            recipient: user.to_string(),
            amount: Uint128::new(1),
        },
        &[],
    );
    assert!(res.is_err());
}

#[test]
fn test_only_bridge_can_burn() {
    let (mut app, token, bridge, user) = setup();
    mint(&mut app, &token, &bridge, &user, 1_000);

    let res = app.execute_contract(
        user.clone(),
        token.clone(),
        &ExecuteMsg::Burn {
            amount: Uint128::new(10),
        },
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(
        err_str.contains("owning bridge"),
        "Expected unauthorized burn, got: {}",
        err_str
    );

    // The bridge burns what it holds
    mint(&mut app, &token, &bridge, &bridge, 500);
    app.execute_contract(
        bridge.clone(),
        token.clone(),
        &ExecuteMsg::Burn {
            amount: Uint128::new(200),
        },
        &[],
    )
    .unwrap();
    assert_eq!(balance(&app, &token, &bridge), Uint128::new(300));

    let info: TokenInfoResponse = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::TokenInfo {})
        .unwrap();
    assert_eq!(info.total_supply, Uint128::new(1_300));
}

#[test]
fn test_burn_from_uses_allowance() {
    let (mut app, token, bridge, user) = setup();
    mint(&mut app, &token, &bridge, &user, 1_000);

    app.execute_contract(
        user.clone(),
        token.clone(),
        &ExecuteMsg::IncreaseAllowance {
            spender: bridge.to_string(),
            amount: Uint128::new(400),
            expires: None,
        },
        &[],
    )
    .unwrap();

    app.execute_contract(
        bridge.clone(),
        token.clone(),
        &ExecuteMsg::BurnFrom {
            owner: user.to_string(),
            amount: Uint128::new(400),
        },
        &[],
    )
    .unwrap();
    assert_eq!(balance(&app, &token, &user), Uint128::new(600));

    // Allowance is spent
    let res = app.execute_contract(
        bridge.clone(),
        token.clone(),
        &ExecuteMsg::BurnFrom {
            owner: user.to_string(),
            amount: Uint128::new(1),
        },
        &[],
    );
    assert!(res.is_err());
}

// ============================================================================
// Standard Ledger
// ============================================================================

#[test]
fn test_transfer_and_transfer_from() {
    let (mut app, token, bridge, user) = setup();
    let other = Addr::unchecked("other");
    mint(&mut app, &token, &bridge, &user, 1_000);

    app.execute_contract(
        user.clone(),
        token.clone(),
        &ExecuteMsg::Transfer {
            recipient: other.to_string(),
            amount: Uint128::new(250),
        },
        &[],
    )
    .unwrap();
    assert_eq!(balance(&app, &token, &other), Uint128::new(250));

    app.execute_contract(
        other.clone(),
        token.clone(),
        &ExecuteMsg::IncreaseAllowance {
            spender: user.to_string(),
            amount: Uint128::new(100),
            expires: None,
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        user.clone(),
        token.clone(),
        &ExecuteMsg::TransferFrom {
            owner: other.to_string(),
            recipient: user.to_string(),
            amount: Uint128::new(100),
        },
        &[],
    )
    .unwrap();

    assert_eq!(balance(&app, &token, &other), Uint128::new(150));
    assert_eq!(balance(&app, &token, &user), Uint128::new(850));
}
