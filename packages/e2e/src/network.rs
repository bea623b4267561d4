//! Local network deployment
//!
//! Deploys the full contract set on each in-process chain through the same
//! submit-and-confirm path the relayer uses:
//!
//! 1. Mock CW20 token, funded for [`USER`]; it doubles as fee asset and as the
//!    chain's native bridgeable asset
//! 2. Teleporter
//! 3. Teleporter registry with the teleporter as version 1
//! 4. Bridge (native variant) and the bridge-token code it instantiates
//! 5. Message log receiver application

use std::time::Duration;

use cosmwasm_std::{Empty, Uint128};
use cw20::{Cw20Coin, Cw20ExecuteMsg};
use cw_multi_test::{Contract, ContractWrapper};
use eyre::{ensure, eyre, Result, WrapErr};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use bridge::state::BridgeVariant;
use common::TeleporterFeeInfo;
use teleporter::msg::{
    ExecuteMsg as TeleporterExecuteMsg, QueryMsg as TeleporterQueryMsg,
    RelayerRewardAmountResponse,
};
use teleporter_registry::msg::ProtocolRegistryEntry;
use teleporter_relayer::confirmation::wait_with_config;
use teleporter_relayer::{
    balance_of, query, ChainClient, ChainEndpoint, ConfirmationConfig, Receipt, RelayerConfig,
    RetryConfig, SignedTx, TxStatus,
};

use crate::local_chain::LocalChain;
use crate::receiver;

pub const CHAIN_A: &str = "chain-a";
pub const CHAIN_B: &str = "chain-b";
pub const CHAIN_C: &str = "chain-c";

pub const DEPLOYER: &str = "deployer";
pub const USER: &str = "user";

pub const E18: u128 = 1_000_000_000_000_000_000;
pub const INITIAL_BALANCE: u128 = 1_000 * E18;

pub const TOKEN_NAME: &str = "Mock Token";
pub const TOKEN_SYMBOL: &str = "EXMP";
pub const TOKEN_DECIMALS: u8 = 18;

// ============================================================================
// Contract Code
// ============================================================================

fn contract_cw20() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

fn contract_teleporter() -> Box<dyn Contract<Empty>> {
    Box::new(
        ContractWrapper::new(
            teleporter::contract::execute,
            teleporter::contract::instantiate,
            teleporter::contract::query,
        )
        .with_reply(teleporter::contract::reply),
    )
}

fn contract_registry() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        teleporter_registry::contract::execute,
        teleporter_registry::contract::instantiate,
        teleporter_registry::contract::query,
    ))
}

fn contract_bridge() -> Box<dyn Contract<Empty>> {
    Box::new(
        ContractWrapper::new(
            bridge::contract::execute,
            bridge::contract::instantiate,
            bridge::contract::query,
        )
        .with_reply(bridge::contract::reply),
    )
}

fn contract_bridge_token() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        bridge_token::contract::execute,
        bridge_token::contract::instantiate,
        bridge_token::contract::query,
    ))
}

/// Confirmation timing for the in-process chains.
pub fn local_confirmation() -> ConfirmationConfig {
    ConfirmationConfig {
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(5),
    }
}

/// Relayer settings for the in-process chains: fast polling and short backoff.
pub fn local_relayer_config(relayer_address: &str) -> RelayerConfig {
    RelayerConfig {
        confirmation: local_confirmation(),
        retry: RetryConfig {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(8),
            ..RetryConfig::default()
        },
        ..RelayerConfig::new(relayer_address)
    }
}

// ============================================================================
// Chain Deployment
// ============================================================================

/// One chain with every contract deployed.
pub struct ChainDeployment {
    pub chain: LocalChain,
    pub teleporter: String,
    pub registry: String,
    pub bridge: String,
    pub token: String,
    pub receiver: String,
    pub bridge_token_code_id: u64,
    confirmation: ConfirmationConfig,
}

impl ChainDeployment {
    pub async fn deploy(chain_id: &str) -> Result<Self> {
        let chain = LocalChain::new(chain_id);
        let confirmation = local_confirmation();

        let cw20_code = chain.store_code(contract_cw20());
        let teleporter_code = chain.store_code(contract_teleporter());
        let registry_code = chain.store_code(contract_registry());
        let bridge_code = chain.store_code(contract_bridge());
        let bridge_token_code_id = chain.store_code(contract_bridge_token());
        let receiver_code = chain.store_code(receiver::contract());

        let token = instantiate(
            &chain,
            &confirmation,
            cw20_code,
            &cw20_base::msg::InstantiateMsg {
                name: TOKEN_NAME.to_string(),
                symbol: TOKEN_SYMBOL.to_string(),
                decimals: TOKEN_DECIMALS,
                initial_balances: vec![Cw20Coin {
                    address: USER.to_string(),
                    amount: Uint128::new(INITIAL_BALANCE),
                }],
                mint: None,
                marketing: None,
            },
            "mock-token",
        )
        .await?;

        let teleporter = instantiate(
            &chain,
            &confirmation,
            teleporter_code,
            &teleporter::msg::InstantiateMsg {},
            "teleporter",
        )
        .await?;

        let registry = instantiate(
            &chain,
            &confirmation,
            registry_code,
            &teleporter_registry::msg::InstantiateMsg {
                admin: DEPLOYER.to_string(),
                initial_entries: vec![ProtocolRegistryEntry {
                    version: 1,
                    protocol_address: teleporter.clone(),
                }],
            },
            "teleporter-registry",
        )
        .await?;

        let bridge = instantiate(
            &chain,
            &confirmation,
            bridge_code,
            &bridge::msg::InstantiateMsg {
                admin: DEPLOYER.to_string(),
                registry: registry.clone(),
                min_teleporter_version: None,
                bridge_token_code_id,
                variant: BridgeVariant::Native,
            },
            "bridge",
        )
        .await?;

        let receiver = instantiate(
            &chain,
            &confirmation,
            receiver_code,
            &receiver::InstantiateMsg {
                teleporter: teleporter.clone(),
            },
            "message-log",
        )
        .await?;

        for (name, address) in [("teleporter", &teleporter), ("bridge", &bridge)] {
            ensure!(
                chain.code_at(address).await?.is_some(),
                "{} has no code at {} on {}",
                name,
                address,
                chain_id
            );
        }

        info!(
            chain_id,
            teleporter = %teleporter,
            registry = %registry,
            bridge = %bridge,
            token = %token,
            "Chain deployed"
        );

        Ok(Self {
            chain,
            teleporter,
            registry,
            bridge,
            token,
            receiver,
            bridge_token_code_id,
            confirmation,
        })
    }

    pub fn chain_id(&self) -> &str {
        self.chain.chain_id()
    }

    pub fn endpoint(&self) -> ChainEndpoint<'_> {
        ChainEndpoint::new(&self.chain, &self.teleporter)
    }

    /// Submit and confirm; a reverted transaction is returned as a receipt.
    pub async fn try_execute<M: Serialize>(
        &self,
        signer: &str,
        contract: &str,
        msg: &M,
    ) -> Result<Receipt> {
        let tx = SignedTx::execute(signer, contract, msg)?;
        let pending = self.chain.submit(tx).await?;
        Ok(wait_with_config(&self.chain, &pending, &self.confirmation).await?)
    }

    /// Submit and confirm; a reverted transaction is an error.
    pub async fn execute<M: Serialize>(
        &self,
        signer: &str,
        contract: &str,
        msg: &M,
    ) -> Result<Receipt> {
        let receipt = self.try_execute(signer, contract, msg).await?;
        match &receipt.status {
            TxStatus::Success => Ok(receipt),
            TxStatus::Failed { reason } => Err(eyre!(
                "Transaction {} on {} failed: {}",
                receipt.tx_hash,
                self.chain_id(),
                reason
            )),
        }
    }

    pub async fn query<Q: Serialize, R: DeserializeOwned>(
        &self,
        contract: &str,
        msg: &Q,
    ) -> Result<R> {
        query(&self.chain, contract, msg)
            .await
            .wrap_err_with(|| format!("Query to {} on {} failed", contract, self.chain_id()))
    }

    pub async fn balance(&self, token: &str, address: &str) -> Result<u128> {
        Ok(balance_of(&self.chain, token, address).await?.u128())
    }

    pub async fn approve(&self, owner: &str, token: &str, spender: &str, amount: u128) -> Result<()> {
        self.execute(
            owner,
            token,
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: spender.to_string(),
                amount: Uint128::new(amount),
                expires: None,
            },
        )
        .await?;
        Ok(())
    }

    /// Unredeemed reward of `relayer` in `fee_asset`.
    pub async fn reward(&self, relayer: &str, fee_asset: &str) -> Result<u128> {
        let res: RelayerRewardAmountResponse = self
            .query(
                &self.teleporter,
                &TeleporterQueryMsg::RelayerRewardAmount {
                    relayer: relayer.to_string(),
                    fee_asset: fee_asset.to_string(),
                },
            )
            .await?;
        Ok(res.amount.u128())
    }

    /// Send the receipts of `message_ids`, delivered from `source_chain_id`, back to it.
    pub async fn send_receipts(
        &self,
        signer: &str,
        source_chain_id: &str,
        message_ids: Vec<u64>,
    ) -> Result<Receipt> {
        self.execute(
            signer,
            &self.teleporter,
            &TeleporterExecuteMsg::SendSpecifiedReceipts {
                source_chain_id: source_chain_id.to_string(),
                message_ids,
                fee_info: TeleporterFeeInfo::none(),
                allowed_relayer_addresses: vec![],
            },
        )
        .await
    }

    pub async fn redeem(&self, relayer: &str, fee_asset: &str) -> Result<Receipt> {
        self.execute(
            relayer,
            &self.teleporter,
            &TeleporterExecuteMsg::RedeemRelayerRewards {
                fee_asset: fee_asset.to_string(),
            },
        )
        .await
    }
}

async fn instantiate<M: Serialize>(
    chain: &LocalChain,
    confirmation: &ConfirmationConfig,
    code_id: u64,
    msg: &M,
    label: &str,
) -> Result<String> {
    let tx = SignedTx::instantiate(DEPLOYER, code_id, msg, label)?;
    let pending = chain.submit(tx).await?;
    let receipt = wait_with_config(chain, &pending, confirmation).await?;
    if let TxStatus::Failed { reason } = &receipt.status {
        return Err(eyre!(
            "Instantiating {} on {} failed: {}",
            label,
            chain.chain_id(),
            reason
        ));
    }
    receipt
        .instantiated_contract()
        .map(str::to_string)
        .ok_or_else(|| eyre!("No contract address in {} instantiation", label))
}

// ============================================================================
// Network
// ============================================================================

/// Three independent chains with the same contract set.
pub struct LocalNetwork {
    pub a: ChainDeployment,
    pub b: ChainDeployment,
    pub c: ChainDeployment,
}

impl LocalNetwork {
    pub async fn deploy() -> Result<Self> {
        Ok(Self {
            a: ChainDeployment::deploy(CHAIN_A).await?,
            b: ChainDeployment::deploy(CHAIN_B).await?,
            c: ChainDeployment::deploy(CHAIN_C).await?,
        })
    }
}
