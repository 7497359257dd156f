/// Composer input row for the demo panel.
pub mod composer;
/// Event contracts for demo module wiring.
pub mod events;
/// Follow-bottom scroll state shared by both demo lists.
pub mod follow_scroll;
/// Identifier injection seam.
pub mod identity;
/// Domain entities and the demo-session state machine.
pub mod model;
pub mod network_log;
pub mod panel;
pub mod transcript;

pub use composer::Composer;
pub use events::Submit;
pub use follow_scroll::FollowScroll;
pub use identity::{IdentifierSource, RandomIdentifiers, SequentialIdentifiers};
pub use model::{
    AttemptTicket, ChatEntry, DeliveryStatus, DemoSession, EntryId, LogEntry, LogKind, Sender,
    SubmitRejection, reply_text,
};
pub use network_log::NetworkLogList;
pub use panel::DemoPanel;
pub use transcript::TranscriptList;
