pub mod advice_service;
pub mod allocation;
pub mod analytics_service;
pub mod ledger_service;
pub mod refresh_scheduler;
