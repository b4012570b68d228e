pub(crate) mod ingestion_checkpoint;
pub(crate) mod orders;
pub(crate) mod profits;
pub(crate) mod provider_nodes;
pub(crate) mod providers;
