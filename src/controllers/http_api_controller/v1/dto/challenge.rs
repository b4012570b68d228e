use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ChallengeResponse {
    pub rnd: String,
}

impl ChallengeResponse {
    pub(crate) fn new(rnd: String) -> Self {
        Self { rnd }
    }
}
