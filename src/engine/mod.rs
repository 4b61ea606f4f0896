pub mod catalog;
pub mod dispatcher;
pub mod kitchen;
pub mod recipe_graph;
pub mod selector;
pub mod worker_pool;

pub use catalog::ProcessorCatalog;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use kitchen::Kitchen;
pub use recipe_graph::{CookReport, RecipeGraph, TaskOutcome};
pub use selector::AgentSelector;
pub use worker_pool::WorkerPool;
