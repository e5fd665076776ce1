//! ghostfund-ingest: chat export ingestion (WhatsApp text) into message records.

pub mod parsers;
pub mod types;

pub use parsers::whatsapp::parse_chat_export;
pub use types::ChatMessage;
