mod configuration;
mod event;
mod message;
mod network;
mod state;
mod worker;

#[allow(unused_imports)]
pub use {configuration::*, event::*, message::*, network::*, state::*, worker::*};
