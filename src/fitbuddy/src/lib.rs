#[macro_use]
extern crate log;

mod store;
pub use store::SessionStore;

pub mod algo {
    pub use fitbuddy_algos::*;
}

pub mod types {
    pub use fitbuddy_types::*;
}
