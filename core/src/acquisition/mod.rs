pub mod orchestrator;
pub mod publisher;
pub mod session;
pub mod stop;

pub use orchestrator::Orchestrator;
pub use publisher::{FramePublisher, FrameSubscriber};
pub use session::Session;
pub use stop::StopSignal;
