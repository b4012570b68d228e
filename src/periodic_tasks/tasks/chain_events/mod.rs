mod handlers;
mod source;
mod task;

pub(crate) use source::ContractLogSource;
pub(crate) use task::{ChainEventIngestorTask, ChainEventsConfig};
