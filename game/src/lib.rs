pub mod channels;
pub mod engine;
pub mod errors;
pub mod frame;
pub mod runner;
pub mod session;

pub mod cli {
    pub mod config;
    pub mod output;
}
