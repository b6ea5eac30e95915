//! Test and helper doubles for biofilm_core

use crate::error::{MonitorError, Result};
use crate::settings::{Settings, SettingsStore};
use biofilm_traits::{Notifier, TelemetrySource};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A notifier that is never available; the default when none is configured.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn is_available(&self) -> bool {
        false
    }
    fn notify(&mut self, _title: &str, _body: &str) -> std::result::Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("no notification channel")))
    }
}

/// Notifier that records every delivered message. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
    pub fn count(&self) -> usize {
        self.sent.lock().map(|v| v.len()).unwrap_or(0)
    }
}

impl Notifier for RecordingNotifier {
    fn is_available(&self) -> bool {
        true
    }
    fn notify(&mut self, _title: &str, body: &str) -> std::result::Result<(), BoxError> {
        if let Ok(mut v) = self.sent.lock() {
            v.push(body.to_string());
        }
        Ok(())
    }
}

/// Feed that replays scripted responses, repeating the last one when exhausted.
/// `Err(msg)` entries simulate network failures.
#[derive(Clone, Default)]
pub struct ScriptedFeed {
    script: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    last: Arc<Mutex<Option<std::result::Result<String, String>>>>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn push_body(&self, body: impl Into<String>) -> &Self {
        if let Ok(mut s) = self.script.lock() {
            s.push_back(Ok(body.into()));
        }
        self
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, msg: impl Into<String>) -> &Self {
        if let Ok(mut s) = self.script.lock() {
            s.push_back(Err(msg.into()));
        }
        self
    }
}

impl TelemetrySource for ScriptedFeed {
    fn fetch(&mut self, _results: usize) -> std::result::Result<String, BoxError> {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let resp = match next {
            Some(r) => {
                if let Ok(mut last) = self.last.lock() {
                    *last = Some(r.clone());
                }
                r
            }
            None => self
                .last
                .lock()
                .ok()
                .and_then(|l| l.clone())
                .unwrap_or_else(|| Err("feed script empty".to_string())),
        };
        resp.map_err(|m| Box::new(std::io::Error::other(m)) as BoxError)
    }
}

/// In-memory settings store. Clones share state so tests can mutate settings
/// "from the UI" while the monitor holds its own handle.
#[derive(Clone, Default)]
pub struct MemorySettingsStore {
    inner: Arc<Mutex<Settings>>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(settings)),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.inner.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        if let Ok(mut s) = self.inner.lock() {
            f(&mut s);
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        self.inner
            .lock()
            .map(|s| s.clone())
            .map_err(|_| MonitorError::Settings("settings lock poisoned".to_string()).into())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let mut s = self
            .inner
            .lock()
            .map_err(|_| MonitorError::Settings("settings lock poisoned".to_string()))?;
        *s = settings.clone();
        Ok(())
    }
}
