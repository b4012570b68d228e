use grid_domain::NodeIdentity;

/// Decides how many leading zero bits a node's proof hash must have.
pub(crate) trait DifficultyPolicy: Send + Sync {
    fn difficulty_bits(&self, identity: NodeIdentity) -> u32;
}

/// Same difficulty for every node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedDifficulty(pub(crate) u32);

impl DifficultyPolicy for FixedDifficulty {
    fn difficulty_bits(&self, _identity: NodeIdentity) -> u32 {
        self.0
    }
}
