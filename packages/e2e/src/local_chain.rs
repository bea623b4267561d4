//! In-process chain
//!
//! A `cw-multi-test` app behind the relayer's [`ChainClient`] contract. Every
//! chain of a local network is one `LocalChain` with its own chain ID, block
//! height and contract addresses.
//!
//! Transactions are included as they are submitted while auto-mining is on.
//! With auto-mining off they wait in the mempool until [`LocalChain::mine`].

use std::cell::{Cell, Ref, RefCell};
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use cosmwasm_std::{
    to_json_vec, Addr, Binary, ContractResult, CosmosMsg, Empty, Querier, QueryRequest,
    SystemResult, WasmMsg, WasmQuery,
};
use cw_multi_test::{next_block, App, Contract, Executor};
use tracing::debug;

use common::keccak256;
use teleporter_relayer::{ChainClient, ChainError, PendingTx, Receipt, SignedTx, TxEvent, TxStatus};

pub struct LocalChain {
    chain_id: String,
    app: RefCell<App>,
    auto_mine: Cell<bool>,
    mempool: RefCell<VecDeque<(String, SignedTx)>>,
    receipts: RefCell<HashMap<String, Receipt>>,
    nonce: Cell<u64>,
    failing_submits: Cell<u32>,
}

impl LocalChain {
    pub fn new(chain_id: &str) -> Self {
        let mut app = App::default();
        app.update_block(|block| block.chain_id = chain_id.to_string());

        Self {
            chain_id: chain_id.to_string(),
            app: RefCell::new(app),
            auto_mine: Cell::new(true),
            mempool: RefCell::new(VecDeque::new()),
            receipts: RefCell::new(HashMap::new()),
            nonce: Cell::new(0),
            failing_submits: Cell::new(0),
        }
    }

    pub fn store_code(&self, code: Box<dyn Contract<Empty>>) -> u64 {
        self.app.borrow_mut().store_code(code)
    }

    pub fn set_auto_mine(&self, enabled: bool) {
        self.auto_mine.set(enabled);
    }

    /// Include every queued transaction, oldest first. Returns how many were included.
    pub fn mine(&self) -> usize {
        let mut included = 0;
        loop {
            let next = self.mempool.borrow_mut().pop_front();
            let Some((tx_hash, tx)) = next else {
                break;
            };
            self.include(tx_hash, tx);
            included += 1;
        }
        included
    }

    /// Reject the next `count` submissions as if the node were unreachable.
    pub fn fail_next_submits(&self, count: u32) {
        self.failing_submits.set(count);
    }

    pub fn height(&self) -> u64 {
        self.app.borrow().block_info().height
    }

    /// Direct access to the app for assertions.
    pub fn app(&self) -> Ref<'_, App> {
        self.app.borrow()
    }

    fn next_tx_hash(&self) -> String {
        let nonce = self.nonce.get() + 1;
        self.nonce.set(nonce);
        let seed = format!("{}:{}", self.chain_id, nonce);
        hex::encode_upper(keccak256(seed.as_bytes()))
    }

    fn include(&self, tx_hash: String, tx: SignedTx) {
        let sender = Addr::unchecked(tx.signer());
        let msg: CosmosMsg = match tx {
            SignedTx::Execute {
                contract,
                msg,
                funds,
                ..
            } => WasmMsg::Execute {
                contract_addr: contract,
                msg,
                funds,
            }
            .into(),
            SignedTx::Instantiate {
                code_id,
                msg,
                label,
                admin,
                ..
            } => WasmMsg::Instantiate {
                admin,
                code_id,
                msg,
                funds: vec![],
                label,
            }
            .into(),
        };

        let mut app = self.app.borrow_mut();
        let height = app.block_info().height;
        let (status, events) = match app.execute(sender, msg) {
            Ok(res) => (
                TxStatus::Success,
                res.events
                    .iter()
                    .map(|event| TxEvent {
                        ty: event.ty.clone(),
                        attributes: event
                            .attributes
                            .iter()
                            .map(|attr| (attr.key.clone(), attr.value.clone()))
                            .collect(),
                    })
                    .collect(),
            ),
            Err(err) => (
                TxStatus::Failed {
                    reason: err.root_cause().to_string(),
                },
                vec![],
            ),
        };
        app.update_block(next_block);

        debug!(
            chain_id = %self.chain_id,
            tx_hash = %tx_hash,
            height,
            success = status == TxStatus::Success,
            "Transaction included"
        );
        self.receipts.borrow_mut().insert(
            tx_hash.clone(),
            Receipt {
                tx_hash,
                height,
                status,
                events,
            },
        );
    }
}

#[async_trait(?Send)]
impl ChainClient for LocalChain {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn submit(&self, tx: SignedTx) -> Result<PendingTx, ChainError> {
        let failing = self.failing_submits.get();
        if failing > 0 {
            self.failing_submits.set(failing - 1);
            return Err(ChainError::Unavailable {
                chain_id: self.chain_id.clone(),
                reason: "connection refused".to_string(),
            });
        }

        let tx_hash = self.next_tx_hash();
        if self.auto_mine.get() {
            self.include(tx_hash.clone(), tx);
        } else {
            self.mempool.borrow_mut().push_back((tx_hash.clone(), tx));
        }

        Ok(PendingTx {
            chain_id: self.chain_id.clone(),
            tx_hash,
        })
    }

    async fn receipt(&self, pending: &PendingTx) -> Result<Option<Receipt>, ChainError> {
        if let Some(receipt) = self.receipts.borrow().get(&pending.tx_hash) {
            return Ok(Some(receipt.clone()));
        }
        let queued = self
            .mempool
            .borrow()
            .iter()
            .any(|(hash, _)| hash == &pending.tx_hash);
        if queued {
            Ok(None)
        } else {
            Err(ChainError::Query {
                reason: format!("unknown transaction {}", pending.tx_hash),
            })
        }
    }

    async fn query_smart(&self, contract: &str, msg: Binary) -> Result<Binary, ChainError> {
        let request: QueryRequest<Empty> = WasmQuery::Smart {
            contract_addr: contract.to_string(),
            msg,
        }
        .into();
        let raw = to_json_vec(&request).map_err(|e| ChainError::Serialization(e.to_string()))?;

        match self.app.borrow().raw_query(&raw) {
            SystemResult::Ok(ContractResult::Ok(bin)) => Ok(bin),
            SystemResult::Ok(ContractResult::Err(reason)) => Err(ChainError::Query { reason }),
            SystemResult::Err(err) => Err(ChainError::Query {
                reason: err.to_string(),
            }),
        }
    }

    async fn code_at(&self, address: &str) -> Result<Option<u64>, ChainError> {
        Ok(self
            .app
            .borrow()
            .wrap()
            .query_wasm_contract_info(address)
            .ok()
            .map(|info| info.code_id))
    }
}
