use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::host::types::*;
use crate::host::Host;

/// A host that records every request and answers prompts from a script.
///
/// Unscripted prompts and pick-lists are answered as cancelled.
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
    inputs: Mutex<VecDeque<Option<String>>>,
    picks: Mutex<VecDeque<Option<usize>>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next text prompt.
    pub fn answer_input(&self, answer: Option<&str>) -> &Self {
        self.inputs
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(answer.map(str::to_string));
        self
    }

    /// Queue the answer to the next pick-list.
    pub fn answer_pick(&self, answer: Option<usize>) -> &Self {
        self.picks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(answer);
        self
    }

    fn record(&self, event: HostEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Error(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Text written to output buffers, oldest first.
    pub fn outputs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Output { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Every pick-list shown, oldest first.
    pub fn pick_lists(&self) -> Vec<Vec<PickItem>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Pick(items) => Some(items),
                _ => None,
            })
            .collect()
    }

    pub fn scratches(&self) -> Vec<ScratchBuffer> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Scratch(buffer) => Some(buffer),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn status_message(&self, message: &str) {
        self.record(HostEvent::Status(message.to_string()));
    }

    async fn error_message(&self, message: &str) {
        self.record(HostEvent::Error(message.to_string()));
    }

    async fn input(&self, request: InputRequest) -> Option<String> {
        self.record(HostEvent::Input(request));
        self.inputs
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .flatten()
    }

    /// Answers are returned as scripted, even past the end of `items`.
    async fn pick(&self, items: Vec<PickItem>) -> Option<usize> {
        self.record(HostEvent::Pick(items));
        self.picks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .flatten()
    }

    async fn open_scratch(&self, buffer: ScratchBuffer) {
        self.record(HostEvent::Scratch(buffer));
    }

    async fn open_file(&self, path: &Path) {
        self.record(HostEvent::OpenFile(path.to_path_buf()));
    }

    async fn close_file(&self, path: &Path) {
        self.record(HostEvent::CloseFile(path.to_path_buf()));
    }

    async fn refresh_file(&self, path: &Path) {
        self.record(HostEvent::RefreshFile(path.to_path_buf()));
    }

    async fn show_output(&self, panel: &str, text: &str) {
        self.record(HostEvent::Output {
            panel: panel.to_string(),
            text: text.to_string(),
        });
    }
}
