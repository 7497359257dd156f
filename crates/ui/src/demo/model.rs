use std::fmt;

use chrono::{DateTime, Local};
use serde_json::{Value, json};
use uuid::Uuid;

use parlor_gateway::WIDGET_ID;

use crate::demo::identity::IdentifierSource;

pub const WELCOME_TEXT: &str = "Hello! Type a message to test the REST API integration.";
pub const NO_REPLY_FALLBACK_TEXT: &str = "Message sent (No reply content received).";
pub const CONNECTION_FAILED_TEXT: &str =
    "Connection Failed. Check if your local server is running on port 8080.";
pub const NETWORK_HINT: &str =
    "Network Error usually means the server is not running on localhost:8080 or CORS is blocked.";
pub const MISSING_CAPABILITY_ERROR: &str =
    "send_message is not defined; the panel was constructed without a message gateway";
pub const NO_OUTCOME_ERROR: &str = "gateway worker ended before reporting an outcome";

/// Stable identifier for one transcript or log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Creates a typed entry identifier.
    pub const fn new(raw: Uuid) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Transcript speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Agent,
}

/// Delivery lifecycle for one transcript entry.
///
/// The only legal mutation is Pending to one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
}

/// One line of the visible conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: EntryId,
    pub text: String,
    pub sender: Sender,
    pub status: DeliveryStatus,
}

impl ChatEntry {
    pub fn new(
        id: EntryId,
        sender: Sender,
        text: impl Into<String>,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            status,
        }
    }

    /// Creates a user entry awaiting its attempt outcome.
    pub fn user_pending(id: EntryId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::User, text, DeliveryStatus::Pending)
    }

    pub fn agent_delivered(id: EntryId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::Agent, text, DeliveryStatus::Delivered)
    }

    pub fn agent_failed(id: EntryId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::Agent, text, DeliveryStatus::Failed)
    }
}

/// Simulated network event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Request,
    Response,
    Error,
}

impl LogKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Response => "RESPONSE",
            Self::Error => "ERROR",
        }
    }
}

/// One recorded simulated network event. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Local>,
    pub kind: LogKind,
    pub method: Option<&'static str>,
    pub address: Option<String>,
    pub payload: Value,
}

impl LogEntry {
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Identifies the single in-flight attempt by its originating user entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptTicket {
    pub entry_id: EntryId,
}

/// Rejection reason for a submit that must not start an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyInput,
    AttemptInFlight,
}

/// Aggregate state of one demo panel lifetime: the transcript, the simulated
/// network log, the per-panel customer id, and the in-flight attempt holder.
///
/// Both sequences are append-only; transcript entries are never deleted and
/// only ever transition from pending to a terminal delivery status.
pub struct DemoSession {
    customer_id: String,
    entries: Vec<ChatEntry>,
    logs: Vec<LogEntry>,
    in_flight: Option<EntryId>,
}

impl DemoSession {
    /// Creates a session with a fresh customer id and the welcome entry.
    pub fn new(identifiers: &mut dyn IdentifierSource) -> Self {
        let customer_id = identifiers.customer_id();
        let welcome = ChatEntry::agent_delivered(identifiers.next_entry_id(), WELCOME_TEXT);

        Self {
            customer_id,
            entries: vec![welcome],
            logs: Vec::new(),
            in_flight: None,
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Starts one send attempt: appends the pending user entry, occupies the
    /// in-flight holder, and records the request log line describing the
    /// intended call.
    ///
    /// The raw text is recorded and sent as entered; trimming is used only
    /// for the emptiness check.
    pub fn begin_attempt(
        &mut self,
        text: &str,
        address: &str,
        now: DateTime<Local>,
        identifiers: &mut dyn IdentifierSource,
    ) -> Result<AttemptTicket, SubmitRejection> {
        if text.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.in_flight.is_some() {
            return Err(SubmitRejection::AttemptInFlight);
        }

        let entry_id = identifiers.next_entry_id();
        self.entries.push(ChatEntry::user_pending(entry_id, text));
        self.in_flight = Some(entry_id);

        self.logs.push(LogEntry {
            id: identifiers.next_entry_id(),
            timestamp: now,
            kind: LogKind::Request,
            method: Some("POST"),
            address: Some(address.to_string()),
            payload: json!({
                "message": text,
                "customerId": self.customer_id,
                "widgetId": WIDGET_ID,
                "note": "Calling the injected send_message capability",
            }),
        });

        Ok(AttemptTicket { entry_id })
    }

    /// Applies a fulfilled attempt: response log line, Delivered transition on
    /// the originating entry, and the agent reply (or the fixed placeholder
    /// when the payload carries no reply text).
    pub fn settle_delivered(
        &mut self,
        ticket: AttemptTicket,
        address: &str,
        payload: Value,
        now: DateTime<Local>,
        identifiers: &mut dyn IdentifierSource,
    ) -> bool {
        if !self.release_in_flight(ticket) {
            return false;
        }

        self.logs.push(LogEntry {
            id: identifiers.next_entry_id(),
            timestamp: now,
            kind: LogKind::Response,
            method: Some("POST"),
            address: Some(address.to_string()),
            payload: payload.clone(),
        });

        self.transition_entry(ticket.entry_id, DeliveryStatus::Delivered);

        let reply =
            reply_text(&payload).unwrap_or_else(|| NO_REPLY_FALLBACK_TEXT.to_string());
        self.entries
            .push(ChatEntry::agent_delivered(identifiers.next_entry_id(), reply));

        true
    }

    /// Applies a failed attempt: error log line with the fixed diagnostic
    /// hint, Failed transition on the originating entry, and the fixed
    /// connection-failure agent entry.
    pub fn settle_failed(
        &mut self,
        ticket: AttemptTicket,
        error_text: &str,
        now: DateTime<Local>,
        identifiers: &mut dyn IdentifierSource,
    ) -> bool {
        if !self.release_in_flight(ticket) {
            return false;
        }

        self.logs.push(LogEntry {
            id: identifiers.next_entry_id(),
            timestamp: now,
            kind: LogKind::Error,
            method: None,
            address: None,
            payload: json!({
                "message": error_text,
                "hint": NETWORK_HINT,
            }),
        });

        self.transition_entry(ticket.entry_id, DeliveryStatus::Failed);
        self.entries.push(ChatEntry::agent_failed(
            identifiers.next_entry_id(),
            CONNECTION_FAILED_TEXT,
        ));

        true
    }

    fn release_in_flight(&mut self, ticket: AttemptTicket) -> bool {
        if self.in_flight != Some(ticket.entry_id) {
            // Stale settlements must not touch a newer attempt's entries.
            return false;
        }

        self.in_flight = None;
        true
    }

    fn transition_entry(&mut self, entry_id: EntryId, status: DeliveryStatus) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == entry_id)
            && entry.status == DeliveryStatus::Pending
        {
            entry.status = status;
        }
    }
}

/// Extracts the agent reply from a response payload.
///
/// Mirrors the widget contract: a non-empty string `reply` field wins,
/// otherwise a non-empty string `message` field.
pub fn reply_text(payload: &Value) -> Option<String> {
    ["reply", "message"].iter().find_map(|key| {
        payload
            .get(*key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::identity::SequentialIdentifiers;

    const ADDRESS: &str = "http://localhost:8080/api/v1/messages";

    fn session() -> (DemoSession, SequentialIdentifiers) {
        let mut identifiers = SequentialIdentifiers::new();
        let session = DemoSession::new(&mut identifiers);
        (session, identifiers)
    }

    #[test]
    fn new_session_starts_with_welcome_entry_and_no_logs() {
        let (session, _) = session();

        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.entries()[0].sender, Sender::Agent);
        assert_eq!(session.entries()[0].text, WELCOME_TEXT);
        assert_eq!(session.entries()[0].status, DeliveryStatus::Delivered);
        assert!(session.logs().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn submit_appends_one_user_entry_and_one_request_log() {
        let (mut session, mut identifiers) = session();

        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        assert_eq!(session.entries().len(), 2);
        let user_entry = &session.entries()[1];
        assert_eq!(user_entry.id, ticket.entry_id);
        assert_eq!(user_entry.sender, Sender::User);
        assert_eq!(user_entry.status, DeliveryStatus::Pending);

        assert_eq!(session.logs().len(), 1);
        let request = &session.logs()[0];
        assert_eq!(request.kind, LogKind::Request);
        assert_eq!(request.method, Some("POST"));
        assert_eq!(request.address.as_deref(), Some(ADDRESS));
        assert_eq!(request.payload["message"], "Hi");
        assert_eq!(request.payload["customerId"], session.customer_id());
        assert_eq!(request.payload["widgetId"], "default");
        assert!(session.is_busy());
    }

    #[test]
    fn whitespace_only_submit_is_a_no_op() {
        let (mut session, mut identifiers) = session();

        let rejection = session
            .begin_attempt("   \n", ADDRESS, Local::now(), &mut identifiers)
            .unwrap_err();

        assert_eq!(rejection, SubmitRejection::EmptyInput);
        assert_eq!(session.entries().len(), 1);
        assert!(session.logs().is_empty());
    }

    #[test]
    fn second_submit_while_busy_is_rejected() {
        let (mut session, mut identifiers) = session();

        session
            .begin_attempt("first", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();
        let rejection = session
            .begin_attempt("second", ADDRESS, Local::now(), &mut identifiers)
            .unwrap_err();

        assert_eq!(rejection, SubmitRejection::AttemptInFlight);
        assert_eq!(session.entries().len(), 2);
        assert_eq!(session.logs().len(), 1);
    }

    #[test]
    fn delivered_with_reply_field_appends_agent_reply() {
        let (mut session, mut identifiers) = session();
        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        let settled = session.settle_delivered(
            ticket,
            ADDRESS,
            serde_json::json!({"reply": "X"}),
            Local::now(),
            &mut identifiers,
        );

        assert!(settled);
        assert!(!session.is_busy());
        assert_eq!(session.entries()[1].status, DeliveryStatus::Delivered);

        let agent_entry = session.entries().last().unwrap();
        assert_eq!(agent_entry.sender, Sender::Agent);
        assert_eq!(agent_entry.text, "X");
        assert_eq!(agent_entry.status, DeliveryStatus::Delivered);

        assert_eq!(session.logs().len(), 2);
        assert_eq!(session.logs()[1].kind, LogKind::Response);
    }

    #[test]
    fn delivered_without_reply_content_uses_fixed_placeholder() {
        let (mut session, mut identifiers) = session();
        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        session.settle_delivered(
            ticket,
            ADDRESS,
            serde_json::json!({"status": "queued"}),
            Local::now(),
            &mut identifiers,
        );

        assert_eq!(session.entries().last().unwrap().text, NO_REPLY_FALLBACK_TEXT);
    }

    #[test]
    fn failure_appends_error_log_and_failed_agent_entry() {
        let (mut session, mut identifiers) = session();
        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        session.settle_failed(ticket, "connection refused", Local::now(), &mut identifiers);

        assert!(!session.is_busy());
        assert_eq!(session.entries()[1].status, DeliveryStatus::Failed);

        let agent_entry = session.entries().last().unwrap();
        assert_eq!(agent_entry.text, CONNECTION_FAILED_TEXT);
        assert_eq!(agent_entry.status, DeliveryStatus::Failed);

        assert_eq!(session.logs().len(), 2);
        let error = &session.logs()[1];
        assert_eq!(error.kind, LogKind::Error);
        assert_eq!(error.method, None);
        assert_eq!(error.payload["message"], "connection refused");
        assert_eq!(error.payload["hint"], NETWORK_HINT);
    }

    #[test]
    fn missing_capability_failure_names_the_undefined_send_capability() {
        let (mut session, mut identifiers) = session();
        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        session.settle_failed(ticket, MISSING_CAPABILITY_ERROR, Local::now(), &mut identifiers);

        assert_eq!(session.logs().len(), 2);
        let error_message = session.logs()[1].payload["message"].as_str().unwrap();
        assert!(error_message.contains("send_message is not defined"));
        assert_eq!(session.entries()[1].status, DeliveryStatus::Failed);
    }

    #[test]
    fn round_trip_scenario_matches_expected_transcript_and_logs() {
        let (mut session, mut identifiers) = session();
        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        session.settle_delivered(
            ticket,
            ADDRESS,
            serde_json::json!({"message": "Hello back"}),
            Local::now(),
            &mut identifiers,
        );

        let transcript: Vec<(&str, Sender, DeliveryStatus)> = session
            .entries()
            .iter()
            .map(|entry| (entry.text.as_str(), entry.sender, entry.status))
            .collect();
        assert_eq!(
            transcript,
            vec![
                (WELCOME_TEXT, Sender::Agent, DeliveryStatus::Delivered),
                ("Hi", Sender::User, DeliveryStatus::Delivered),
                ("Hello back", Sender::Agent, DeliveryStatus::Delivered),
            ]
        );

        let kinds: Vec<LogKind> = session.logs().iter().map(|log| log.kind).collect();
        assert_eq!(kinds, vec![LogKind::Request, LogKind::Response]);
    }

    #[test]
    fn stale_settlement_is_ignored() {
        let (mut session, mut identifiers) = session();
        let ticket = session
            .begin_attempt("Hi", ADDRESS, Local::now(), &mut identifiers)
            .unwrap();

        session.settle_failed(ticket, "boom", Local::now(), &mut identifiers);
        let entries_before = session.entries().len();
        let logs_before = session.logs().len();

        let settled = session.settle_delivered(
            ticket,
            ADDRESS,
            serde_json::json!({"reply": "late"}),
            Local::now(),
            &mut identifiers,
        );

        assert!(!settled);
        assert_eq!(session.entries().len(), entries_before);
        assert_eq!(session.logs().len(), logs_before);
    }

    #[test]
    fn reply_extraction_prefers_reply_then_message_and_skips_empty() {
        assert_eq!(
            reply_text(&serde_json::json!({"reply": "a", "message": "b"})),
            Some("a".to_string())
        );
        assert_eq!(
            reply_text(&serde_json::json!({"reply": "", "message": "b"})),
            Some("b".to_string())
        );
        assert_eq!(reply_text(&serde_json::json!({"ok": true})), None);
        assert_eq!(reply_text(&serde_json::json!({"reply": 7})), None);
    }
}
