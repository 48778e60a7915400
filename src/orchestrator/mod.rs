pub mod cancel;
pub mod event;
pub mod run;

pub use cancel::CancelToken;
pub use event::{Run, RunEvent};
pub use run::Orchestrator;
