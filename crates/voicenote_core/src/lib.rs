//! Core domain logic for VoiceNote.
//! Notes captured from text or live transcription, mirrored to a key-value
//! slot and filtered on render.

pub mod capture;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod storage;

pub use capture::notice::{Notice, NoticeLog, NoticeSink};
pub use capture::speech::{
    joined_transcript, NoSpeechCapability, RecognitionAlternative, RecognitionError,
    RecognitionResult, RecognizerConfig, SpeechCapability, SpeechRecognizer,
};
pub use capture::surface::{CapturePhase, CaptureSurface};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use repo::note_persistence::{
    NotePersistence, PersistenceError, PersistenceResult, NOTES_STORAGE_KEY,
};
pub use search::filter::filter_notes;
pub use service::note_store::{NoteStore, StoreError};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
