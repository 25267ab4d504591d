//! Capture surface state machine.
//!
//! # Responsibility
//! - Track onboarding, text editing and recording phases.
//! - Own the recognizer handle for the lifetime of a recording.
//! - Hand finalized content to the note store on save.
//!
//! # Invariants
//! - `CaptureState::Recording` is the only place a recognizer lives; leaving
//!   it always calls `stop` and drops the handle.
//! - Each transcription update replaces the content with the full joined
//!   transcript.
//! - Engine errors never end a recording on their own.

use crate::capture::notice::{Notice, NoticeSink};
use crate::capture::speech::{
    joined_transcript, RecognitionError, RecognitionResult, RecognizerConfig, SpeechCapability,
    SpeechRecognizer,
};
use crate::model::note::Note;
use crate::service::note_store::{NoteStore, StoreError};
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};

/// Observable phase of the capture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Onboarding prompt; no input mode chosen.
    Idle,
    TextEditing,
    Recording,
}

enum CaptureState {
    Idle,
    TextEditing,
    Recording(Box<dyn SpeechRecognizer>),
}

impl CaptureState {
    fn phase(&self) -> CapturePhase {
        match self {
            Self::Idle => CapturePhase::Idle,
            Self::TextEditing => CapturePhase::TextEditing,
            Self::Recording(_) => CapturePhase::Recording,
        }
    }
}

/// Modal editor producing new note bodies.
pub struct CaptureSurface<C: SpeechCapability, N: NoticeSink> {
    capability: C,
    notices: N,
    config: RecognizerConfig,
    state: CaptureState,
    content: String,
    open: bool,
}

impl<C: SpeechCapability, N: NoticeSink> CaptureSurface<C, N> {
    /// Creates a closed surface in the onboarding phase.
    pub fn new(capability: C, notices: N) -> Self {
        Self::with_config(capability, notices, RecognizerConfig::default())
    }

    pub fn with_config(capability: C, notices: N, config: RecognizerConfig) -> Self {
        Self {
            capability,
            notices,
            config,
            state: CaptureState::Idle,
            content: String::new(),
            open: false,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.state.phase()
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, CaptureState::Recording(_))
    }

    /// Current draft body.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn notice_sink(&self) -> &N {
        &self.notices
    }

    /// Shows the surface. The draft from a previous dismissal is kept.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Switches from onboarding to free-form text entry.
    pub fn start_text(&mut self) {
        if matches!(self.state, CaptureState::Idle) {
            self.state = CaptureState::TextEditing;
            debug!("event=capture_transition module=capture status=ok to=text_editing");
        }
    }

    /// Starts live transcription from onboarding.
    ///
    /// Without a speech capability this raises `Notice::SpeechUnavailable`
    /// and stays idle. Returns whether recording is now active.
    pub fn start_recording(&mut self) -> bool {
        if !matches!(self.state, CaptureState::Idle) {
            return self.is_recording();
        }

        let Some(mut recognizer) = self.capability.create_recognizer(self.config) else {
            warn!("event=capture_record module=capture status=unavailable");
            self.notices.notify(Notice::SpeechUnavailable);
            return false;
        };

        if let Err(err) = recognizer.start() {
            error!(
                "event=capture_record module=capture status=error error_code={} error={}",
                err.code(),
                err
            );
            self.notices.notify(Notice::RecordingFailed(err.to_string()));
            return false;
        }

        self.state = CaptureState::Recording(recognizer);
        info!(
            "event=capture_record module=capture status=start continuous={} interim={}",
            self.config.continuous, self.config.interim_results
        );
        true
    }

    /// Stops an active recording and keeps the transcript for editing.
    pub fn stop_recording(&mut self) {
        if self.release_recognizer() {
            self.state = CaptureState::TextEditing;
        }
    }

    /// Applies a user edit to the draft.
    ///
    /// Clearing the text while editing returns to onboarding. Edits during
    /// onboarding are ignored since no editor is shown.
    pub fn edit(&mut self, text: impl Into<String>) {
        match self.phase() {
            CapturePhase::Idle => {}
            CapturePhase::TextEditing => {
                self.content = text.into();
                if self.content.is_empty() {
                    self.state = CaptureState::Idle;
                    debug!(
                        "event=capture_transition module=capture status=ok to=idle reason=empty_edit"
                    );
                }
            }
            CapturePhase::Recording => {
                self.content = text.into();
            }
        }
    }

    /// Handles a cumulative result set from the recognizer.
    ///
    /// Ignored unless recording.
    pub fn on_result(&mut self, results: &[RecognitionResult]) {
        if !self.is_recording() {
            debug!("event=capture_result module=capture status=ignored reason=not_recording");
            return;
        }
        self.content = joined_transcript(results);
        debug!(
            "event=capture_result module=capture status=ok results={} chars={}",
            results.len(),
            self.content.chars().count()
        );
    }

    /// Logs a recognizer error. Recording stays active until stopped.
    pub fn on_error(&mut self, err: &RecognitionError) {
        error!(
            "event=capture_error module=capture status=error recording={} error_code={} error={}",
            self.is_recording(),
            err.code(),
            err
        );
    }

    /// Saves the draft as a new note and closes the surface.
    ///
    /// Returns `Ok(None)` without side effects when the draft is empty. A
    /// running recording is stopped first.
    ///
    /// # Errors
    /// - Store persistence failure; the draft is kept for another attempt.
    pub fn save<K: KeyValueStore>(
        &mut self,
        store: &mut NoteStore<K>,
    ) -> Result<Option<Note>, StoreError> {
        if self.content.is_empty() {
            debug!("event=capture_save module=capture status=rejected reason=empty");
            return Ok(None);
        }

        self.stop_recording();
        let note = store.create(self.content.clone())?;

        self.content.clear();
        self.state = CaptureState::Idle;
        self.open = false;
        self.notices.notify(Notice::NoteCreated);
        info!("event=capture_save module=capture status=ok");
        Ok(Some(note))
    }

    /// Closes the surface, ending any recording. The draft is kept.
    pub fn dismiss(&mut self) {
        self.release_recognizer();
        self.state = CaptureState::Idle;
        self.open = false;
    }

    fn release_recognizer(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        if let CaptureState::Recording(mut recognizer) =
            std::mem::replace(&mut self.state, CaptureState::Idle)
        {
            recognizer.stop();
        }
        info!("event=capture_record module=capture status=stop");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{CapturePhase, CaptureSurface};
    use crate::capture::notice::{Notice, NoticeLog};
    use crate::capture::speech::{
        NoSpeechCapability, RecognitionError, RecognitionResult, RecognizerConfig,
        SpeechCapability, SpeechRecognizer,
    };
    use crate::service::note_store::NoteStore;
    use crate::storage::MemoryKeyValueStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        created: usize,
        started: usize,
        stopped: usize,
        config: Option<RecognizerConfig>,
    }

    struct FakeRecognizer {
        calls: Rc<RefCell<Calls>>,
        start_error: Option<RecognitionError>,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&mut self) -> Result<(), RecognitionError> {
            self.calls.borrow_mut().started += 1;
            match self.start_error.clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn stop(&mut self) {
            self.calls.borrow_mut().stopped += 1;
        }
    }

    #[derive(Default)]
    struct FakeCapability {
        calls: Rc<RefCell<Calls>>,
        start_error: Option<RecognitionError>,
    }

    impl SpeechCapability for FakeCapability {
        fn create_recognizer(
            &self,
            config: RecognizerConfig,
        ) -> Option<Box<dyn SpeechRecognizer>> {
            let mut calls = self.calls.borrow_mut();
            calls.created += 1;
            calls.config = Some(config);
            Some(Box::new(FakeRecognizer {
                calls: Rc::clone(&self.calls),
                start_error: self.start_error.clone(),
            }))
        }
    }

    fn speech_surface() -> (CaptureSurface<FakeCapability, NoticeLog>, Rc<RefCell<Calls>>) {
        let capability = FakeCapability::default();
        let calls = Rc::clone(&capability.calls);
        (CaptureSurface::new(capability, NoticeLog::new()), calls)
    }

    #[test]
    fn starts_closed_and_idle() {
        let surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        assert_eq!(surface.phase(), CapturePhase::Idle);
        assert!(!surface.is_open());
        assert_eq!(surface.content(), "");
    }

    #[test]
    fn missing_capability_raises_notice_and_stays_idle() {
        let mut surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        surface.open();
        assert!(!surface.start_recording());
        assert_eq!(surface.phase(), CapturePhase::Idle);
        assert_eq!(surface.notice_sink().notices(), &[Notice::SpeechUnavailable]);
    }

    #[test]
    fn recording_configures_and_starts_recognizer() {
        let (mut surface, calls) = speech_surface();
        assert!(surface.start_recording());
        assert_eq!(surface.phase(), CapturePhase::Recording);

        let calls = calls.borrow();
        assert_eq!(calls.created, 1);
        assert_eq!(calls.started, 1);
        assert_eq!(calls.config, Some(RecognizerConfig::default()));
    }

    #[test]
    fn start_failure_reports_notice_and_stays_idle() {
        let capability = FakeCapability {
            start_error: Some(RecognitionError::NotAllowed),
            ..FakeCapability::default()
        };
        let mut surface = CaptureSurface::new(capability, NoticeLog::new());
        assert!(!surface.start_recording());
        assert_eq!(surface.phase(), CapturePhase::Idle);
        assert!(matches!(
            surface.notice_sink().notices(),
            [Notice::RecordingFailed(_)]
        ));
    }

    #[test]
    fn transcripts_replace_content() {
        let (mut surface, _) = speech_surface();
        surface.start_recording();
        surface.on_result(&[RecognitionResult::interim("hel")]);
        assert_eq!(surface.content(), "hel");
        surface.on_result(&[RecognitionResult::interim("hello world")]);
        assert_eq!(surface.content(), "hello world");
    }

    #[test]
    fn results_outside_recording_are_ignored() {
        let (mut surface, _) = speech_surface();
        surface.start_text();
        surface.edit("typed");
        surface.on_result(&[RecognitionResult::finalized("spoken")]);
        assert_eq!(surface.content(), "typed");
    }

    #[test]
    fn engine_error_keeps_recording() {
        let (mut surface, calls) = speech_surface();
        surface.start_recording();
        surface.on_error(&RecognitionError::NoSpeech);
        assert_eq!(surface.phase(), CapturePhase::Recording);
        assert_eq!(calls.borrow().stopped, 0);
    }

    #[test]
    fn stop_recording_releases_handle_and_enters_editing() {
        let (mut surface, calls) = speech_surface();
        surface.start_recording();
        surface.on_result(&[RecognitionResult::finalized("draft")]);
        surface.stop_recording();

        assert_eq!(surface.phase(), CapturePhase::TextEditing);
        assert_eq!(surface.content(), "draft");
        assert_eq!(calls.borrow().stopped, 1);

        surface.stop_recording();
        assert_eq!(calls.borrow().stopped, 1);
    }

    #[test]
    fn clearing_text_reverts_to_onboarding() {
        let mut surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        surface.start_text();
        surface.edit("x");
        assert_eq!(surface.phase(), CapturePhase::TextEditing);
        surface.edit("");
        assert_eq!(surface.phase(), CapturePhase::Idle);
    }

    #[test]
    fn edits_during_onboarding_are_ignored() {
        let mut surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        surface.edit("ghost");
        assert_eq!(surface.content(), "");
    }

    #[test]
    fn empty_save_is_silent_noop() {
        let mut store = NoteStore::initialize(MemoryKeyValueStore::new());
        let mut surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        surface.open();
        surface.start_text();

        assert!(surface.save(&mut store).unwrap().is_none());
        assert!(store.is_empty());
        assert!(surface.is_open());
        assert!(surface.notice_sink().notices().is_empty());
    }

    #[test]
    fn save_creates_note_resets_and_closes() {
        let mut store = NoteStore::initialize(MemoryKeyValueStore::new());
        let mut surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        surface.open();
        surface.start_text();
        surface.edit("buy milk");

        let note = surface.save(&mut store).unwrap().expect("note should be saved");
        assert_eq!(note.content, "buy milk");
        assert_eq!(store.list()[0].id, note.id);
        assert_eq!(surface.phase(), CapturePhase::Idle);
        assert_eq!(surface.content(), "");
        assert!(!surface.is_open());
        assert_eq!(surface.notice_sink().notices(), &[Notice::NoteCreated]);
    }

    #[test]
    fn save_while_recording_stops_recognizer() {
        let mut store = NoteStore::initialize(MemoryKeyValueStore::new());
        let (mut surface, calls) = speech_surface();
        surface.start_recording();
        surface.on_result(&[RecognitionResult::finalized("spoken note")]);

        let note = surface.save(&mut store).unwrap().expect("note should be saved");
        assert_eq!(note.content, "spoken note");
        assert_eq!(calls.borrow().stopped, 1);
        assert_eq!(surface.phase(), CapturePhase::Idle);
    }

    #[test]
    fn failed_save_keeps_draft() {
        let mut store = NoteStore::initialize(MemoryKeyValueStore::with_quota(8));
        let mut surface = CaptureSurface::new(NoSpeechCapability, NoticeLog::new());
        surface.open();
        surface.start_text();
        surface.edit("too long for storage");

        assert!(surface.save(&mut store).is_err());
        assert_eq!(surface.content(), "too long for storage");
        assert_eq!(surface.phase(), CapturePhase::TextEditing);
        assert!(surface.is_open());
        assert!(surface.notice_sink().notices().is_empty());
    }

    #[test]
    fn dismiss_stops_recording_and_keeps_draft() {
        let (mut surface, calls) = speech_surface();
        surface.open();
        surface.start_recording();
        surface.on_result(&[RecognitionResult::interim("half")]);
        surface.dismiss();

        assert_eq!(surface.phase(), CapturePhase::Idle);
        assert!(!surface.is_open());
        assert_eq!(surface.content(), "half");
        assert_eq!(calls.borrow().stopped, 1);
    }
}
