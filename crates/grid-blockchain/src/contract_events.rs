use std::collections::HashMap;

use alloy::{primitives::B256, sol_types::SolEvent};

use crate::{
    ContractLog, ContractName,
    chains::evm::{Market, Registry},
};

/// Events the validator ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Register,
    AddNode,
    CreateOrder,
    Withdraw,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Register,
        EventKind::AddNode,
        EventKind::CreateOrder,
        EventKind::Withdraw,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Register => "Register",
            EventKind::AddNode => "AddNode",
            EventKind::CreateOrder => "CreateOrder",
            EventKind::Withdraw => "Withdraw",
        }
    }

    pub fn contract(&self) -> ContractName {
        match self {
            EventKind::Register | EventKind::AddNode => ContractName::Registry,
            EventKind::CreateOrder | EventKind::Withdraw => ContractName::Market,
        }
    }

    pub fn signature_hash(&self) -> B256 {
        match self {
            EventKind::Register => Registry::Register::SIGNATURE_HASH,
            EventKind::AddNode => Registry::AddNode::SIGNATURE_HASH,
            EventKind::CreateOrder => Market::CreateOrder::SIGNATURE_HASH,
            EventKind::Withdraw => Market::Withdraw::SIGNATURE_HASH,
        }
    }
}

/// A decoded registry or market event.
#[derive(Debug, Clone)]
pub enum ContractEvent {
    Register(Registry::Register),
    AddNode(Registry::AddNode),
    CreateOrder(Market::CreateOrder),
    Withdraw(Market::Withdraw),
}

impl ContractEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ContractEvent::Register(_) => EventKind::Register,
            ContractEvent::AddNode(_) => EventKind::AddNode,
            ContractEvent::CreateOrder(_) => EventKind::CreateOrder,
            ContractEvent::Withdraw(_) => EventKind::Withdraw,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to decode {event} log: {source}")]
pub struct EventDecodeError {
    pub event: &'static str,
    #[source]
    pub source: alloy::sol_types::Error,
}

/// Primary-topic lookup table built once from the known event ABIs.
#[derive(Debug, Clone)]
pub struct EventSignatureTable {
    by_topic: HashMap<B256, EventKind>,
}

impl Default for EventSignatureTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSignatureTable {
    pub fn new() -> Self {
        let by_topic = EventKind::ALL
            .into_iter()
            .map(|kind| (kind.signature_hash(), kind))
            .collect();
        Self { by_topic }
    }

    pub fn kind_of(&self, topic: &B256) -> Option<EventKind> {
        self.by_topic.get(topic).copied()
    }

    /// Decodes `log` against the table.
    ///
    /// Returns `Ok(None)` for unknown topics and for known events emitted by the
    /// other contract.
    pub fn decode(&self, log: &ContractLog) -> Result<Option<ContractEvent>, EventDecodeError> {
        let Some(kind) = log.log().topic0().and_then(|topic| self.kind_of(topic)) else {
            return Ok(None);
        };
        if kind.contract() != log.contract_name() {
            return Ok(None);
        }

        let data = log.log().data();
        let wrap = |source| EventDecodeError {
            event: kind.name(),
            source,
        };

        let event = match kind {
            EventKind::Register => {
                ContractEvent::Register(Registry::Register::decode_log_data(data).map_err(wrap)?)
            }
            EventKind::AddNode => {
                ContractEvent::AddNode(Registry::AddNode::decode_log_data(data).map_err(wrap)?)
            }
            EventKind::CreateOrder => ContractEvent::CreateOrder(
                Market::CreateOrder::decode_log_data(data).map_err(wrap)?,
            ),
            EventKind::Withdraw => {
                ContractEvent::Withdraw(Market::Withdraw::decode_log_data(data).map_err(wrap)?)
            }
        };
        Ok(Some(event))
    }
}
