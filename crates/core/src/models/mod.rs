pub mod analytics;
pub mod bill;
pub mod budget;
pub mod category;
pub mod goal;
pub mod insight;
pub mod ledger;
pub mod outcome;
pub mod persona;
pub mod settings;
pub mod snapshot;
pub mod task;
pub mod transaction;
