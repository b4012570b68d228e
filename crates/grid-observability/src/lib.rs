mod blockchain;
mod task;
mod validator;

pub use blockchain::*;
pub use task::*;
pub use validator::*;
