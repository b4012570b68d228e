//! Persistence seam shared by the event ingestor, the validator engine and the
//! HTTP handlers.

#[cfg(test)]
mod memory;
mod profit_ledger;
mod store;

#[cfg(test)]
pub(crate) use memory::MemoryLedgerStore;
pub(crate) use profit_ledger::ProfitLedger;
pub(crate) use store::LedgerStore;
