#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chatline::core::ToolCallRecord;
use chatline::{ChatUi, MessageId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Sent(MessageId, String),
    Updated(MessageId, String),
    Step(String, String),
}

/// Records everything a session renders.
#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Current content of every message, in the order they were sent.
    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<(MessageId, String)> = Vec::new();
        for event in self.events() {
            match event {
                UiEvent::Sent(id, content) => messages.push((id, content)),
                UiEvent::Updated(id, content) => {
                    let slot = messages.iter_mut().find(|(m, _)| *m == id).unwrap();
                    slot.1 = content;
                }
                UiEvent::Step(..) => {}
            }
        }
        messages.into_iter().map(|(_, content)| content).collect()
    }
}

#[async_trait]
impl ChatUi for RecordingUi {
    async fn send(&self, content: &str) -> MessageId {
        let mut events = self.events.lock().unwrap();
        let id = MessageId(events.len() as u64);
        events.push(UiEvent::Sent(id, content.to_owned()));
        id
    }

    async fn update(&self, id: MessageId, content: &str) {
        let mut events = self.events.lock().unwrap();
        events.push(UiEvent::Updated(id, content.to_owned()));
    }

    async fn step(&self, record: &ToolCallRecord) {
        let mut events = self.events.lock().unwrap();
        events.push(UiEvent::Step(record.name.clone(), record.output.clone()));
    }
}
