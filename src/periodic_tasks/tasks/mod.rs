pub(crate) mod chain_events;
