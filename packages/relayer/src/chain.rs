//! Chain client contract
//!
//! Everything the relayer and the deployment code need from a chain: submit a
//! signed transaction, look up its receipt, and run smart queries. Signing and
//! transport are the implementation's concern.

use async_trait::async_trait;
use cosmwasm_std::{to_json_binary, Binary, Coin, Uint128};
use cw20::{BalanceResponse, Cw20QueryMsg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use common::events::ATTR_CONTRACT_ADDRESS;

/// A transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq)]
pub enum SignedTx {
    Execute {
        signer: String,
        contract: String,
        msg: Binary,
        funds: Vec<Coin>,
    },
    Instantiate {
        signer: String,
        code_id: u64,
        msg: Binary,
        label: String,
        admin: Option<String>,
    },
}

impl SignedTx {
    pub fn execute<M: Serialize>(
        signer: impl Into<String>,
        contract: impl Into<String>,
        msg: &M,
    ) -> Result<Self, ChainError> {
        Ok(SignedTx::Execute {
            signer: signer.into(),
            contract: contract.into(),
            msg: encode(msg)?,
            funds: vec![],
        })
    }

    pub fn instantiate<M: Serialize>(
        signer: impl Into<String>,
        code_id: u64,
        msg: &M,
        label: impl Into<String>,
    ) -> Result<Self, ChainError> {
        let signer = signer.into();
        Ok(SignedTx::Instantiate {
            admin: Some(signer.clone()),
            signer,
            code_id,
            msg: encode(msg)?,
            label: label.into(),
        })
    }

    pub fn signer(&self) -> &str {
        match self {
            SignedTx::Execute { signer, .. } | SignedTx::Instantiate { signer, .. } => signer,
        }
    }
}

/// Handle of a broadcast transaction awaiting inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingTx {
    pub chain_id: String,
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Failed { reason: String },
}

/// An event as the chain reports it, type prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEvent {
    pub ty: String,
    pub attributes: Vec<(String, String)>,
}

impl TxEvent {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            attributes: vec![],
        }
    }

    pub fn add_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// First value of `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Contract that emitted the event, for `wasm-*` and `instantiate` events.
    pub fn contract_address(&self) -> Option<&str> {
        self.attribute(ATTR_CONTRACT_ADDRESS)
    }
}

/// Outcome of an included transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub tx_hash: String,
    pub height: u64,
    pub status: TxStatus,
    pub events: Vec<TxEvent>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }

    /// Address of the first contract instantiated by the transaction.
    pub fn instantiated_contract(&self) -> Option<&str> {
        self.events
            .iter()
            .filter(|event| event.ty == "instantiate")
            .find_map(|event| event.contract_address())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Chain {chain_id} unavailable: {reason}")]
    Unavailable { chain_id: String, reason: String },

    #[error("Request to {chain_id} timed out")]
    Timeout { chain_id: String },

    #[error("Transaction rejected: {reason}")]
    Rejected { reason: String },

    #[error("Query failed: {reason}")]
    Query { reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl ChainError {
    /// Whether the same request may succeed when repeated.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChainError::Unavailable { .. } | ChainError::Timeout { .. }
        )
    }
}

/// Access to one chain.
#[async_trait(?Send)]
pub trait ChainClient {
    fn chain_id(&self) -> &str;

    async fn submit(&self, tx: SignedTx) -> Result<PendingTx, ChainError>;

    /// `None` while the transaction is not yet included.
    async fn receipt(&self, pending: &PendingTx) -> Result<Option<Receipt>, ChainError>;

    /// Raw smart query; `msg` and the result are JSON.
    async fn query_smart(&self, contract: &str, msg: Binary) -> Result<Binary, ChainError>;

    /// Code ID of the contract at `address`, if there is one.
    async fn code_at(&self, address: &str) -> Result<Option<u64>, ChainError>;
}

/// Typed smart query.
pub async fn query<C, Q, R>(client: &C, contract: &str, msg: &Q) -> Result<R, ChainError>
where
    C: ChainClient + ?Sized,
    Q: Serialize,
    R: DeserializeOwned,
{
    let raw = client.query_smart(contract, encode(msg)?).await?;
    serde_json::from_slice(raw.as_slice()).map_err(|e| ChainError::Serialization(e.to_string()))
}

/// CW20 balance of `address`.
pub async fn balance_of<C: ChainClient + ?Sized>(
    client: &C,
    token: &str,
    address: &str,
) -> Result<Uint128, ChainError> {
    let res: BalanceResponse = query(
        client,
        token,
        &Cw20QueryMsg::Balance {
            address: address.to_string(),
        },
    )
    .await?;
    Ok(res.balance)
}

fn encode<M: Serialize>(msg: &M) -> Result<Binary, ChainError> {
    to_json_binary(msg).map_err(|e| ChainError::Serialization(e.to_string()))
}
