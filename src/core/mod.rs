// Domain-layer modules and shared errors/models
pub mod adapter {
    pub use crate::adapter::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
