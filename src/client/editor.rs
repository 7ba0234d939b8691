//! # Editor Surface
//!
//! The diagram editing surface is an external collaborator: it owns the live
//! document model, can serialize it to text, can load text into a fresh model
//! and emits interaction events. The sync engine only sees it through the
//! [`EditorSurface`] trait.
//!
//! Interaction events are delivered over a `tokio::sync::broadcast` channel.
//! Holding a receiver is a subscription; dropping it unsubscribes.
//!
//! [`InMemoryEditor`] keeps the model as plain text. Headless participants and
//! tests use it in place of a rendering surface.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::client::error::EditorError;

/// Document created when the store has no diagram yet
pub const EMPTY_DIAGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Definitions_1" targetNamespace="http://bpmn.io/schema/bpmn">
  <bpmn:process id="Process_1" isExecutable="false" />
</bpmn:definitions>"#;

const INTERACTION_CHANNEL_CAPACITY: usize = 256;

/// Pointer interaction emitted by the editing surface
///
/// The six spatial events are a proxy for "the document may have changed";
/// anything else the surface emits arrives as `Other` and is ignored by the
/// debouncer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    Hover,
    Out,
    Click,
    DoubleClick,
    MouseDown,
    MouseUp,
    Other(String),
}

impl InteractionEvent {
    /// Events that arm the change debouncer
    pub const ACTIVITY: [InteractionEvent; 6] = [
        InteractionEvent::Hover,
        InteractionEvent::Out,
        InteractionEvent::Click,
        InteractionEvent::DoubleClick,
        InteractionEvent::MouseDown,
        InteractionEvent::MouseUp,
    ];

    /// Event-bus name of this event
    pub fn name(&self) -> &str {
        match self {
            Self::Hover => "element.hover",
            Self::Out => "element.out",
            Self::Click => "element.click",
            Self::DoubleClick => "element.dblclick",
            Self::MouseDown => "element.mousedown",
            Self::MouseUp => "element.mouseup",
            Self::Other(name) => name,
        }
    }

    /// Map an event-bus name back to an event
    pub fn from_name(name: &str) -> Self {
        match name {
            "element.hover" => Self::Hover,
            "element.out" => Self::Out,
            "element.click" => Self::Click,
            "element.dblclick" => Self::DoubleClick,
            "element.mousedown" => Self::MouseDown,
            "element.mouseup" => Self::MouseUp,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this event counts as edit activity
    pub fn is_activity(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for InteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The live editing surface
///
/// Implementations must be internally synchronized: the document poller and
/// local interaction both touch the model, and the engine imposes no lock of
/// its own.
pub trait EditorSurface: Send + Sync + 'static {
    /// Initialize an empty document
    fn load_empty(&self) -> Result<(), EditorError>;

    /// Replace the in-memory model with `text`
    fn load_from_text(&self, text: &str) -> Result<(), EditorError>;

    /// Serialize the current model
    fn serialize_to_text(&self) -> Result<String, EditorError>;

    /// Whether a model is currently loaded
    fn has_document(&self) -> bool;

    /// Subscribe to interaction events; drop the receiver to unsubscribe
    fn subscribe(&self) -> broadcast::Receiver<InteractionEvent>;

    /// Tear the model down at the end of a session
    fn destroy(&self);
}

/// Text-backed editor surface
pub struct InMemoryEditor {
    document: Mutex<Option<String>>,
    interactions: broadcast::Sender<InteractionEvent>,
    loads: AtomicUsize,
}

impl Default for InMemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEditor {
    pub fn new() -> Self {
        let (interactions, _) = broadcast::channel(INTERACTION_CHANNEL_CAPACITY);
        Self {
            document: Mutex::new(None),
            interactions,
            loads: AtomicUsize::new(0),
        }
    }

    fn document(&self) -> MutexGuard<'_, Option<String>> {
        self.document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Emit an interaction event to every subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn emit(&self, event: InteractionEvent) -> usize {
        self.interactions.send(event).unwrap_or(0)
    }

    /// Apply a local edit to the model
    ///
    /// Local edits do not emit events; a real surface reports the pointer
    /// activity around an edit separately.
    pub fn apply_local_edit(&self, text: impl Into<String>) {
        *self.document() = Some(text.into());
    }

    /// Current model text, if any
    pub fn snapshot(&self) -> Option<String> {
        self.document().clone()
    }

    /// Number of live interaction subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.interactions.receiver_count()
    }

    /// Number of times the model was replaced by a load
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EditorSurface for InMemoryEditor {
    fn load_empty(&self) -> Result<(), EditorError> {
        *self.document() = Some(EMPTY_DIAGRAM.to_string());
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_from_text(&self, text: &str) -> Result<(), EditorError> {
        if text.trim().is_empty() {
            return Err(EditorError::Load("diagram text is empty".to_string()));
        }
        *self.document() = Some(text.to_string());
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn serialize_to_text(&self) -> Result<String, EditorError> {
        self.document().clone().ok_or(EditorError::Destroyed)
    }

    fn has_document(&self) -> bool {
        self.document().is_some()
    }

    fn subscribe(&self) -> broadcast::Receiver<InteractionEvent> {
        self.interactions.subscribe()
    }

    fn destroy(&self) {
        *self.document() = None;
    }
}
