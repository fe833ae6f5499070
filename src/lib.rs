pub mod cli;
mod http_err;
mod identities;
mod ledger;
mod server;
mod store;
