//! Integration tests for the bridge contract using cw-multi-test.
//!
//! The app plays chain C. Outbound transfers go through the real teleporter
//! (registry version 2). Inbound deliveries are made by an address registered
//! as version 1, standing in for the teleporter's execution call.

use cosmwasm_std::{Addr, Empty, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse, TokenInfoResponse};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};

use bridge::msg::{
    BridgedBalanceResponse, ConfigResponse, DenomTraceResponse, ExecuteMsg, InstantiateMsg,
    NativeToWrappedTokenResponse, QueryMsg, SubmittedBridgeTokenCreationResponse,
    WrappedTokenInfoResponse,
};
use bridge::state::BridgeVariant;
use common::{BridgeAction, BridgeTransfer, CreateBridgeToken, HopDestination, TeleporterMessage};
use teleporter_registry::msg::ProtocolRegistryEntry;

const CHAIN_A: &str = "chain-a";
const CHAIN_B: &str = "chain-b";
const CHAIN_C: &str = "chain-c";
const BRIDGE_A: &str = "bridge-on-a";
const BRIDGE_B: &str = "bridge-on-b";
const ASSET_A: &str = "asset-on-a";
const FAKE_TELEPORTER: &str = "fake-teleporter";

const E18: u128 = 1_000_000_000_000_000_000;

// ============================================================================
// Test Setup
// ============================================================================

fn contract_bridge() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge::contract::execute,
        bridge::contract::instantiate,
        bridge::contract::query,
    )
    .with_reply(bridge::contract::reply);
    Box::new(contract)
}

fn contract_bridge_token() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge_token::contract::execute,
        bridge_token::contract::instantiate,
        bridge_token::contract::query,
    );
    Box::new(contract)
}

fn contract_teleporter() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        teleporter::contract::execute,
        teleporter::contract::instantiate,
        teleporter::contract::query,
    )
    .with_reply(teleporter::contract::reply);
    Box::new(contract)
}

fn contract_registry() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        teleporter_registry::contract::execute,
        teleporter_registry::contract::instantiate,
        teleporter_registry::contract::query,
    );
    Box::new(contract)
}

fn contract_cw20() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

struct Suite {
    app: App,
    bridge: Addr,
    teleporter: Addr,
    registry: Addr,
    token: Addr,
    bridge_token_code_id: u64,
    admin: Addr,
    user: Addr,
}

fn setup() -> Suite {
    setup_with_variant(BridgeVariant::Native)
}

fn setup_with_variant(variant: BridgeVariant) -> Suite {
    let mut app = App::default();
    app.update_block(|block| block.chain_id = CHAIN_C.to_string());

    let admin = Addr::unchecked("admin");
    let user = Addr::unchecked("user");

    let cw20_code = app.store_code(contract_cw20());
    let token = app
        .instantiate_contract(
            cw20_code,
            admin.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Mock Token".to_string(),
                symbol: "EXMP".to_string(),
                decimals: 18,
                initial_balances: vec![Cw20Coin {
                    address: user.to_string(),
                    amount: Uint128::new(1_000 * E18),
                }],
                mint: None,
                marketing: None,
            },
            &[],
            "mock-token",
            None,
        )
        .unwrap();

    let teleporter_code = app.store_code(contract_teleporter());
    let teleporter = app
        .instantiate_contract(
            teleporter_code,
            admin.clone(),
            &teleporter::msg::InstantiateMsg {},
            &[],
            "teleporter",
            None,
        )
        .unwrap();

    let registry_code = app.store_code(contract_registry());
    let registry = app
        .instantiate_contract(
            registry_code,
            admin.clone(),
            &teleporter_registry::msg::InstantiateMsg {
                admin: admin.to_string(),
                initial_entries: vec![
                    ProtocolRegistryEntry {
                        version: 1,
                        protocol_address: FAKE_TELEPORTER.to_string(),
                    },
                    ProtocolRegistryEntry {
                        version: 2,
                        protocol_address: teleporter.to_string(),
                    },
                ],
            },
            &[],
            "registry",
            None,
        )
        .unwrap();

    let bridge_token_code_id = app.store_code(contract_bridge_token());
    let bridge_code = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            bridge_code,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                registry: registry.to_string(),
                min_teleporter_version: Some(1),
                bridge_token_code_id,
                variant,
            },
            &[],
            "bridge",
            None,
        )
        .unwrap();

    Suite {
        app,
        bridge,
        teleporter,
        registry,
        token,
        bridge_token_code_id,
        admin,
        user,
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn approve(suite: &mut Suite, token: &Addr, amount: u128) {
    suite
        .app
        .execute_contract(
            suite.user.clone(),
            token.clone(),
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: suite.bridge.to_string(),
                amount: Uint128::new(amount),
                expires: None,
            },
            &[],
        )
        .unwrap();
}

fn export(suite: &mut Suite, destination_chain_id: &str, destination_bridge: &str) {
    suite
        .app
        .execute_contract(
            suite.user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::SubmitCreateBridgeToken {
                destination_chain_id: destination_chain_id.to_string(),
                destination_bridge_address: destination_bridge.to_string(),
                native_token: suite.token.to_string(),
                fee_token: suite.token.to_string(),
                fee_amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap();
}

#[allow(clippy::too_many_arguments)]
fn bridge_tokens(
    suite: &mut Suite,
    token: &Addr,
    destination_chain_id: &str,
    destination_bridge: &str,
    total: u128,
    primary_fee: u128,
    secondary_fee: u128,
    secondary_destination: Option<HopDestination>,
) -> Result<AppResponse, String> {
    suite
        .app
        .execute_contract(
            suite.user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::BridgeTokens {
                destination_chain_id: destination_chain_id.to_string(),
                destination_bridge_address: destination_bridge.to_string(),
                token: token.to_string(),
                recipient: "recipient-elsewhere".to_string(),
                total_amount: Uint128::new(total),
                primary_fee_amount: Uint128::new(primary_fee),
                secondary_fee_amount: Uint128::new(secondary_fee),
                secondary_destination,
            },
            &[],
        )
        .map_err(|e| e.root_cause().to_string())
}

/// Deliver a payload as the registered fake teleporter.
fn deliver(
    suite: &mut Suite,
    source_chain_id: &str,
    origin_sender: &str,
    action: &BridgeAction,
) -> Result<AppResponse, String> {
    deliver_as(suite, FAKE_TELEPORTER, source_chain_id, origin_sender, action)
}

fn deliver_as(
    suite: &mut Suite,
    caller: &str,
    source_chain_id: &str,
    origin_sender: &str,
    action: &BridgeAction,
) -> Result<AppResponse, String> {
    suite
        .app
        .execute_contract(
            Addr::unchecked(caller),
            suite.bridge.clone(),
            &ExecuteMsg::ReceiveTeleporterMessage {
                source_chain_id: source_chain_id.to_string(),
                origin_sender: origin_sender.to_string(),
                message: action.to_binary(),
            },
            &[],
        )
        .map_err(|e| e.root_cause().to_string())
}

fn create_from_a(suite: &Suite) -> BridgeAction {
    BridgeAction::CreateBridgeToken(CreateBridgeToken {
        native_chain_id: CHAIN_A.to_string(),
        native_bridge: BRIDGE_A.to_string(),
        native_asset: ASSET_A.to_string(),
        destination_bridge: suite.bridge.to_string(),
        name: "Mock Token".to_string(),
        symbol: "EXMP".to_string(),
        decimals: 18,
    })
}

fn transfer_from_a(recipient: &str, amount: u128) -> BridgeTransfer {
    BridgeTransfer {
        native_chain_id: CHAIN_A.to_string(),
        native_bridge: BRIDGE_A.to_string(),
        native_asset: ASSET_A.to_string(),
        recipient: recipient.to_string(),
        amount: Uint128::new(amount),
        secondary_fee: Uint128::zero(),
        secondary_destination: None,
    }
}

fn transfer_of_native(suite: &Suite, recipient: &str, amount: u128) -> BridgeTransfer {
    BridgeTransfer {
        native_chain_id: CHAIN_C.to_string(),
        native_bridge: suite.bridge.to_string(),
        native_asset: suite.token.to_string(),
        recipient: recipient.to_string(),
        amount: Uint128::new(amount),
        secondary_fee: Uint128::zero(),
        secondary_destination: None,
    }
}

fn wrapped_token(suite: &Suite) -> Option<Addr> {
    let res: NativeToWrappedTokenResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::NativeToWrappedToken {
                native_chain_id: CHAIN_A.to_string(),
                native_bridge: BRIDGE_A.to_string(),
                native_asset: ASSET_A.to_string(),
            },
        )
        .unwrap();
    res.token
}

fn balance(suite: &Suite, token: &Addr, address: &str) -> Uint128 {
    let res: BalanceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: address.to_string(),
            },
        )
        .unwrap();
    res.balance
}

fn bridged_balance(suite: &Suite, chain_id: &str, bridge: &str) -> Uint128 {
    let res: BridgedBalanceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::BridgedBalance {
                destination_chain_id: chain_id.to_string(),
                destination_bridge_address: bridge.to_string(),
                token: suite.token.to_string(),
            },
        )
        .unwrap();
    res.amount
}

/// Latest message sent by the teleporter and its decoded payload.
fn last_sent(suite: &Suite) -> (TeleporterMessage, BridgeAction) {
    let latest: teleporter::msg::LatestMessageIdResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&suite.teleporter, &teleporter::msg::QueryMsg::LatestMessageId {})
        .unwrap();
    let sent: teleporter::msg::SentMessageResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.teleporter,
            &teleporter::msg::QueryMsg::SentMessage {
                message_id: latest.message_id,
            },
        )
        .unwrap();
    let action = BridgeAction::decode(sent.message.message.as_slice()).unwrap();
    (sent.message, action)
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn test_instantiate() {
    let mut suite = setup();

    let config: ConfigResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&suite.bridge, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.admin, suite.admin);
    assert_eq!(config.registry, suite.registry);
    assert_eq!(config.min_teleporter_version, 1);
    assert_eq!(config.blockchain_id, CHAIN_C);
    assert!(!config.paused);

    // Without a minimum the registry's latest version is used
    let code_id = suite.app.store_code(contract_bridge());
    let other = suite
        .app
        .instantiate_contract(
            code_id,
            suite.admin.clone(),
            &InstantiateMsg {
                admin: suite.admin.to_string(),
                registry: suite.registry.to_string(),
                min_teleporter_version: None,
                bridge_token_code_id: suite.bridge_token_code_id,
                variant: BridgeVariant::Native,
            },
            &[],
            "bridge-2",
            None,
        )
        .unwrap();
    let config: ConfigResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&other, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.min_teleporter_version, 2);

    let err_str = suite
        .app
        .instantiate_contract(
            code_id,
            suite.admin.clone(),
            &InstantiateMsg {
                admin: suite.admin.to_string(),
                registry: suite.registry.to_string(),
                min_teleporter_version: Some(3),
                bridge_token_code_id: suite.bridge_token_code_id,
                variant: BridgeVariant::Native,
            },
            &[],
            "bridge-3",
            None,
        )
        .unwrap_err()
        .root_cause()
        .to_string();
    assert_eq!(
        err_str,
        "Minimum teleporter version 3 is above the latest registered version 2"
    );
}

// ============================================================================
// Token Registration
// ============================================================================

#[test]
fn test_submit_create_bridge_token() {
    let mut suite = setup();
    export(&mut suite, CHAIN_B, BRIDGE_B);

    let submitted: SubmittedBridgeTokenCreationResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::SubmittedBridgeTokenCreation {
                destination_chain_id: CHAIN_B.to_string(),
                destination_bridge_address: BRIDGE_B.to_string(),
                token: suite.token.to_string(),
            },
        )
        .unwrap();
    assert!(submitted.submitted);

    let (message, action) = last_sent(&suite);
    assert_eq!(message.origin_sender, suite.bridge.to_string());
    assert_eq!(message.destination_chain_id, CHAIN_B);
    assert_eq!(message.destination_address, BRIDGE_B);
    assert!(message.fee_info.is_zero());
    assert_eq!(
        action,
        BridgeAction::CreateBridgeToken(CreateBridgeToken {
            native_chain_id: CHAIN_C.to_string(),
            native_bridge: suite.bridge.to_string(),
            native_asset: suite.token.to_string(),
            destination_bridge: BRIDGE_B.to_string(),
            name: "Mock Token".to_string(),
            symbol: "EXMP".to_string(),
            decimals: 18,
        })
    );
}

#[test]
fn test_submit_create_bridge_token_with_fee() {
    let mut suite = setup();
    let token = suite.token.clone();
    approve(&mut suite, &token, 5);

    suite
        .app
        .execute_contract(
            suite.user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::SubmitCreateBridgeToken {
                destination_chain_id: CHAIN_B.to_string(),
                destination_bridge_address: BRIDGE_B.to_string(),
                native_token: token.to_string(),
                fee_token: token.to_string(),
                fee_amount: Uint128::new(5),
            },
            &[],
        )
        .unwrap();

    let (message, _) = last_sent(&suite);
    assert_eq!(message.fee_info.amount, Uint128::new(5));
    assert_eq!(
        balance(&suite, &token, suite.teleporter.as_str()),
        Uint128::new(5)
    );
    assert_eq!(balance(&suite, &token, suite.bridge.as_str()), Uint128::zero());
}

// ============================================================================
// Outbound Transfers
// ============================================================================

#[test]
fn test_bridge_native_locks_tokens() {
    let mut suite = setup();
    let token = suite.token.clone();
    export(&mut suite, CHAIN_B, BRIDGE_B);
    approve(&mut suite, &token, 13 * E18);

    bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 13 * E18, E18, 0, None).unwrap();

    assert_eq!(
        balance(&suite, &token, suite.bridge.as_str()),
        Uint128::new(12 * E18)
    );
    assert_eq!(
        balance(&suite, &token, suite.teleporter.as_str()),
        Uint128::new(E18)
    );
    assert_eq!(
        bridged_balance(&suite, CHAIN_B, BRIDGE_B),
        Uint128::new(12 * E18)
    );

    let (message, action) = last_sent(&suite);
    assert_eq!(message.fee_info.amount, Uint128::new(E18));
    assert_eq!(message.fee_info.fee_token_address, token.to_string());
    match action {
        BridgeAction::BridgeTransfer(transfer) => {
            assert_eq!(transfer.amount, Uint128::new(12 * E18));
            assert_eq!(transfer.native_chain_id, CHAIN_C);
            assert_eq!(transfer.native_asset, token.to_string());
            assert_eq!(transfer.recipient, "recipient-elsewhere");
        }
        other => panic!("expected a transfer, got {:?}", other),
    }
}

#[test]
fn test_bridge_native_requires_export() {
    let mut suite = setup();
    let token = suite.token.clone();
    approve(&mut suite, &token, 10);

    let err_str = bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 10, 1, 0, None).unwrap_err();
    assert!(err_str.contains("has not been exported"), "got: {}", err_str);
}

#[test]
fn test_bridge_amount_validation() {
    let mut suite = setup();
    let token = suite.token.clone();
    export(&mut suite, CHAIN_B, BRIDGE_B);
    approve(&mut suite, &token, 100);

    let err_str = bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 1, 1, 0, None).unwrap_err();
    assert!(err_str.contains("Insufficient total amount"), "got: {}", err_str);

    let err_str = bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 10, 1, 1, None).unwrap_err();
    assert!(
        err_str.contains("Secondary fee given without"),
        "got: {}",
        err_str
    );

    let hop = HopDestination {
        chain_id: CHAIN_A.to_string(),
        bridge_address: BRIDGE_A.to_string(),
    };
    let err_str =
        bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 10, 1, 1, Some(hop)).unwrap_err();
    assert!(
        err_str.contains("Native tokens cannot carry a secondary destination"),
        "got: {}",
        err_str
    );

    let err_str = bridge_tokens(&mut suite, &token, CHAIN_C, BRIDGE_B, 10, 1, 0, None).unwrap_err();
    assert!(err_str.contains("same chain"), "got: {}", err_str);

    let err_str =
        bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 1_000, 1, 0, None).unwrap_err();
    assert!(err_str.contains("Insufficient allowance"), "got: {}", err_str);
}

#[test]
fn test_pause_blocks_outbound() {
    let mut suite = setup();
    let token = suite.token.clone();
    export(&mut suite, CHAIN_B, BRIDGE_B);
    approve(&mut suite, &token, 10);

    let err_str = suite
        .app
        .execute_contract(
            suite.user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::Pause {},
            &[],
        )
        .unwrap_err()
        .root_cause()
        .to_string();
    assert!(err_str.contains("Unauthorized"), "got: {}", err_str);

    suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::Pause {},
            &[],
        )
        .unwrap();
    let err_str = bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 10, 1, 0, None).unwrap_err();
    assert!(err_str.contains("Bridge is paused"), "got: {}", err_str);

    suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::Unpause {},
            &[],
        )
        .unwrap();
    bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 10, 1, 0, None).unwrap();
}

// ============================================================================
// Wrapped Tokens
// ============================================================================

#[test]
fn test_create_wrapped_token() {
    let mut suite = setup();
    let create = create_from_a(&suite);

    let res = deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap();
    assert!(res.events.iter().any(|e| e.ty == "wasm-create_bridge_token"));

    let wrapped = wrapped_token(&suite).expect("wrapped token created");

    let binding: bridge_token::state::NativeBinding = suite
        .app
        .wrap()
        .query_wasm_smart(&wrapped, &bridge_token::msg::QueryMsg::NativeBinding {})
        .unwrap();
    assert_eq!(binding.native_chain_id, CHAIN_A);
    assert_eq!(binding.native_bridge, BRIDGE_A);
    assert_eq!(binding.native_asset, ASSET_A);

    let info: TokenInfoResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&wrapped, &Cw20QueryMsg::TokenInfo {})
        .unwrap();
    assert_eq!(info.symbol, "EXMP");
    assert_eq!(info.decimals, 18);
    assert_eq!(info.total_supply, Uint128::zero());

    let minter: Option<MinterResponse> = suite
        .app
        .wrap()
        .query_wasm_smart(&wrapped, &Cw20QueryMsg::Minter {})
        .unwrap();
    assert_eq!(minter.unwrap().minter, suite.bridge.to_string());

    let token_info: WrappedTokenInfoResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::WrappedTokenInfo {
                token: wrapped.to_string(),
            },
        )
        .unwrap();
    assert_eq!(token_info.info.unwrap().native_asset, ASSET_A);

    // Second registration is a no-op
    let res = deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap();
    assert!(!res.events.iter().any(|e| e.ty == "instantiate"));
    assert_eq!(wrapped_token(&suite), Some(wrapped));
}

#[test]
fn test_create_rejects_forged_origin() {
    let mut suite = setup();
    let create = create_from_a(&suite);

    let err_str = deliver(&mut suite, CHAIN_A, "impostor", &create).unwrap_err();
    assert!(err_str.contains("Invalid transfer origin"), "got: {}", err_str);

    let err_str = deliver(&mut suite, CHAIN_B, BRIDGE_A, &create).unwrap_err();
    assert!(err_str.contains("Invalid transfer origin"), "got: {}", err_str);

    let misdirected = BridgeAction::CreateBridgeToken(CreateBridgeToken {
        destination_bridge: "another-bridge".to_string(),
        ..match create {
            BridgeAction::CreateBridgeToken(create) => create,
            _ => unreachable!(),
        }
    });
    let err_str = deliver(&mut suite, CHAIN_A, BRIDGE_A, &misdirected).unwrap_err();
    assert!(
        err_str.contains("Invalid destination bridge"),
        "got: {}",
        err_str
    );

    assert_eq!(wrapped_token(&suite), None);
}

#[test]
fn test_wrapped_transfer_mints() {
    let mut suite = setup();
    let create = create_from_a(&suite);
    deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap();
    let wrapped = wrapped_token(&suite).unwrap();

    let transfer = BridgeAction::BridgeTransfer(transfer_from_a("alice", 12 * E18));
    let res = deliver(&mut suite, CHAIN_A, BRIDGE_A, &transfer).unwrap();
    assert!(res.events.iter().any(|e| e.ty == "wasm-mint_bridge_tokens"));
    assert_eq!(balance(&suite, &wrapped, "alice"), Uint128::new(12 * E18));

    // Only the native bridge may mint
    let err_str = deliver(&mut suite, CHAIN_B, BRIDGE_B, &transfer).unwrap_err();
    assert!(err_str.contains("Invalid transfer origin"), "got: {}", err_str);

    let mut unknown = transfer_from_a("alice", E18);
    unknown.native_asset = "unknown-asset".to_string();
    let err_str =
        deliver(&mut suite, CHAIN_A, BRIDGE_A, &BridgeAction::BridgeTransfer(unknown)).unwrap_err();
    assert!(err_str.contains("Unregistered asset"), "got: {}", err_str);
}

#[test]
fn test_wrapped_outbound_burns() {
    let mut suite = setup();
    let create = create_from_a(&suite);
    deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap();
    let wrapped = wrapped_token(&suite).unwrap();

    let user = suite.user.to_string();
    deliver(
        &mut suite,
        CHAIN_A,
        BRIDGE_A,
        &BridgeAction::BridgeTransfer(transfer_from_a(&user, 12 * E18)),
    )
    .unwrap();
    approve(&mut suite, &wrapped, 12 * E18);

    let err_str =
        bridge_tokens(&mut suite, &wrapped, CHAIN_B, BRIDGE_B, 12 * E18, E18, 0, None).unwrap_err();
    assert!(
        err_str.contains("can only be bridged to its native bridge"),
        "got: {}",
        err_str
    );

    bridge_tokens(&mut suite, &wrapped, CHAIN_A, BRIDGE_A, 12 * E18, E18, 0, None).unwrap();

    assert_eq!(balance(&suite, &wrapped, &user), Uint128::zero());
    assert_eq!(
        balance(&suite, &wrapped, suite.teleporter.as_str()),
        Uint128::new(E18)
    );
    let info: TokenInfoResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&wrapped, &Cw20QueryMsg::TokenInfo {})
        .unwrap();
    assert_eq!(info.total_supply, Uint128::new(E18));

    let (message, action) = last_sent(&suite);
    assert_eq!(message.destination_chain_id, CHAIN_A);
    assert_eq!(
        action,
        BridgeAction::BridgeTransfer(BridgeTransfer {
            native_chain_id: CHAIN_A.to_string(),
            native_bridge: BRIDGE_A.to_string(),
            native_asset: ASSET_A.to_string(),
            recipient: "recipient-elsewhere".to_string(),
            amount: Uint128::new(11 * E18),
            secondary_fee: Uint128::zero(),
            secondary_destination: None,
        })
    );

    // Wrapped tokens are never exported
    let err_str = suite
        .app
        .execute_contract(
            suite.user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::SubmitCreateBridgeToken {
                destination_chain_id: CHAIN_B.to_string(),
                destination_bridge_address: BRIDGE_B.to_string(),
                native_token: wrapped.to_string(),
                fee_token: wrapped.to_string(),
                fee_amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap_err()
        .root_cause()
        .to_string();
    assert!(
        err_str.contains("Cannot export wrapped token"),
        "got: {}",
        err_str
    );
}

#[test]
fn test_wrapped_forward_from_custody() {
    let mut suite = setup();
    let create = create_from_a(&suite);
    deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap();
    let wrapped = wrapped_token(&suite).unwrap();

    let mut transfer = transfer_from_a("alice-on-a", 10 * E18);
    transfer.secondary_fee = Uint128::new(E18);
    transfer.secondary_destination = Some(HopDestination {
        chain_id: CHAIN_A.to_string(),
        bridge_address: BRIDGE_A.to_string(),
    });
    deliver(&mut suite, CHAIN_A, BRIDGE_A, &BridgeAction::BridgeTransfer(transfer)).unwrap();

    // Minted 10, burned 9, 1 escrowed as the next hop's fee
    let info: TokenInfoResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&wrapped, &Cw20QueryMsg::TokenInfo {})
        .unwrap();
    assert_eq!(info.total_supply, Uint128::new(E18));
    assert_eq!(balance(&suite, &wrapped, suite.bridge.as_str()), Uint128::zero());

    let (message, action) = last_sent(&suite);
    assert_eq!(message.fee_info.amount, Uint128::new(E18));
    match action {
        BridgeAction::BridgeTransfer(forward) => {
            assert_eq!(forward.amount, Uint128::new(9 * E18));
            assert_eq!(forward.recipient, "alice-on-a");
            assert_eq!(forward.secondary_destination, None);
        }
        other => panic!("expected a transfer, got {:?}", other),
    }
}

// ============================================================================
// Native Releases
// ============================================================================

#[test]
fn test_native_release() {
    let mut suite = setup();
    let token = suite.token.clone();
    export(&mut suite, CHAIN_B, BRIDGE_B);
    approve(&mut suite, &token, 13 * E18);
    bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 13 * E18, E18, 0, None).unwrap();

    let release = BridgeAction::BridgeTransfer(transfer_of_native(&suite, "alice", 5 * E18));
    let res = deliver(&mut suite, CHAIN_B, BRIDGE_B, &release).unwrap();
    assert!(res.events.iter().any(|e| e.ty == "wasm-withdraw_tokens"));
    assert_eq!(balance(&suite, &token, "alice"), Uint128::new(5 * E18));
    assert_eq!(
        bridged_balance(&suite, CHAIN_B, BRIDGE_B),
        Uint128::new(7 * E18)
    );

    let too_much = BridgeAction::BridgeTransfer(transfer_of_native(&suite, "alice", 8 * E18));
    let err_str = deliver(&mut suite, CHAIN_B, BRIDGE_B, &too_much).unwrap_err();
    assert!(
        err_str.contains("Insufficient bridged balance"),
        "got: {}",
        err_str
    );

    // Nothing was bridged over the chain A route
    let err_str = deliver(&mut suite, CHAIN_A, BRIDGE_A, &release).unwrap_err();
    assert!(
        err_str.contains("Insufficient bridged balance"),
        "got: {}",
        err_str
    );
}

#[test]
fn test_native_forward_to_second_hop() {
    let mut suite = setup();
    let token = suite.token.clone();
    export(&mut suite, CHAIN_B, BRIDGE_B);
    export(&mut suite, CHAIN_A, BRIDGE_A);
    approve(&mut suite, &token, 13 * E18);
    bridge_tokens(&mut suite, &token, CHAIN_B, BRIDGE_B, 13 * E18, E18, 0, None).unwrap();

    let mut transfer = transfer_of_native(&suite, "alice-on-a", 10 * E18);
    transfer.secondary_fee = Uint128::new(E18);
    transfer.secondary_destination = Some(HopDestination {
        chain_id: CHAIN_A.to_string(),
        bridge_address: BRIDGE_A.to_string(),
    });
    deliver(&mut suite, CHAIN_B, BRIDGE_B, &BridgeAction::BridgeTransfer(transfer)).unwrap();

    assert_eq!(
        bridged_balance(&suite, CHAIN_B, BRIDGE_B),
        Uint128::new(2 * E18)
    );
    assert_eq!(
        bridged_balance(&suite, CHAIN_A, BRIDGE_A),
        Uint128::new(9 * E18)
    );
    // Primary fee of both hops sits with the teleporter
    assert_eq!(
        balance(&suite, &token, suite.teleporter.as_str()),
        Uint128::new(2 * E18)
    );

    let (message, action) = last_sent(&suite);
    assert_eq!(message.destination_chain_id, CHAIN_A);
    assert_eq!(message.destination_address, BRIDGE_A);
    assert_eq!(message.fee_info.amount, Uint128::new(E18));
    match action {
        BridgeAction::BridgeTransfer(forward) => {
            assert_eq!(forward.amount, Uint128::new(9 * E18));
            assert_eq!(forward.native_chain_id, CHAIN_C);
            assert_eq!(forward.recipient, "alice-on-a");
        }
        other => panic!("expected a transfer, got {:?}", other),
    }
}

// ============================================================================
// Teleporter Authorization
// ============================================================================

#[test]
fn test_unauthorized_teleporter() {
    let mut suite = setup();
    let create = create_from_a(&suite);

    let err_str = deliver_as(&mut suite, "random", CHAIN_A, BRIDGE_A, &create).unwrap_err();
    assert!(err_str.contains("Unauthorized teleporter"), "got: {}", err_str);

    for version in [1u64, 3] {
        let err_str = suite
            .app
            .execute_contract(
                suite.admin.clone(),
                suite.bridge.clone(),
                &ExecuteMsg::UpdateMinTeleporterVersion { version },
                &[],
            )
            .unwrap_err()
            .root_cause()
            .to_string();
        assert!(
            err_str.contains("Invalid minimum teleporter version"),
            "got: {}",
            err_str
        );
    }

    suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::UpdateMinTeleporterVersion { version: 2 },
            &[],
        )
        .unwrap();

    let err_str = deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap_err();
    assert!(err_str.contains("Unauthorized teleporter"), "got: {}", err_str);
}

#[test]
fn test_malformed_payload_rejected() {
    let mut suite = setup();
    let err_str = suite
        .app
        .execute_contract(
            Addr::unchecked(FAKE_TELEPORTER),
            suite.bridge.clone(),
            &ExecuteMsg::ReceiveTeleporterMessage {
                source_chain_id: CHAIN_A.to_string(),
                origin_sender: BRIDGE_A.to_string(),
                message: cosmwasm_std::Binary::from(vec![1, 9]),
            },
            &[],
        )
        .unwrap_err()
        .root_cause()
        .to_string();
    assert!(err_str.contains("Unknown bridge action"), "got: {}", err_str);
}

// ============================================================================
// ICS-20 Variant
// ============================================================================

#[test]
fn test_ics20_denom_trace() {
    let mut suite = setup_with_variant(BridgeVariant::Ics20 {
        channel: "channel-7".to_string(),
    });
    let create = create_from_a(&suite);
    deliver(&mut suite, CHAIN_A, BRIDGE_A, &create).unwrap();
    let wrapped = wrapped_token(&suite).unwrap();

    let trace: DenomTraceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::DenomTrace {
                token: wrapped.to_string(),
            },
        )
        .unwrap();
    assert_eq!(
        trace.denom_trace,
        Some(format!("transfer/channel-7/{}", ASSET_A))
    );

    let res = deliver(
        &mut suite,
        CHAIN_A,
        BRIDGE_A,
        &BridgeAction::BridgeTransfer(transfer_from_a("alice", 3)),
    )
    .unwrap();
    let packet = res
        .events
        .iter()
        .find(|e| e.ty == "wasm-fungible_token_packet")
        .expect("fungible_token_packet event");
    assert!(packet
        .attributes
        .iter()
        .any(|a| a.key == "denom" && a.value == format!("transfer/channel-7/{}", ASSET_A)));
}

#[test]
fn test_ics20_requires_channel() {
    let mut suite = setup();
    let code_id = suite.app.store_code(contract_bridge());
    let err_str = suite
        .app
        .instantiate_contract(
            code_id,
            suite.admin.clone(),
            &InstantiateMsg {
                admin: suite.admin.to_string(),
                registry: suite.registry.to_string(),
                min_teleporter_version: None,
                bridge_token_code_id: suite.bridge_token_code_id,
                variant: BridgeVariant::Ics20 {
                    channel: String::new(),
                },
            },
            &[],
            "bridge-ics20",
            None,
        )
        .unwrap_err()
        .root_cause()
        .to_string();
    assert!(err_str.contains("Invalid ICS-20 channel"), "got: {}", err_str);
}
