pub mod answer_sheet;
pub mod attempt;
pub mod audit_log;
pub mod competition;
pub mod document;
pub mod entry_token;
pub mod institution;
pub mod participant;
pub mod participant_event;
pub mod registration;
pub mod room;
pub mod scan;
pub mod seat_assignment;
pub mod user;

pub use answer_sheet::AnswerSheet;
pub use attempt::Attempt;
pub use audit_log::AuditLog;
pub use competition::Competition;
pub use document::Document;
pub use entry_token::EntryToken;
pub use institution::Institution;
pub use participant::Participant;
pub use participant_event::ParticipantEvent;
pub use registration::Registration;
pub use room::Room;
pub use scan::Scan;
pub use seat_assignment::SeatAssignment;
pub use user::User;
