//! Scriptable certificate verifier with call recording.

use badged_verifier::CertificateVerifier;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What `deserialize` yields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentMode {
    /// The blob itself, if it is UTF-8.
    Echo,
    /// This content for every blob.
    Fixed(String),
    /// Nothing: every blob is unreadable.
    Unreadable,
}

#[derive(Debug)]
struct Script {
    content: ContentMode,
    domain: Option<String>,
}

#[derive(Debug)]
struct Shared {
    script: Mutex<Script>,
    accept: AtomicBool,
    panic_on_verify: AtomicBool,
    loaded: AtomicBool,
    deserialize_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    destroy_calls: AtomicUsize,
    overlapping_loads: AtomicUsize,
}

/// A [`CertificateVerifier`] whose behaviour is set by the test.
///
/// Clones share state: hand one clone to the verifier slot and keep another
/// to steer results and read the counters. Defaults to echoing the blob as
/// content and accepting every certificate.
#[derive(Clone, Debug)]
pub struct NullVerifier {
    shared: Arc<Shared>,
}

impl NullVerifier {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                script: Mutex::new(Script {
                    content: ContentMode::Echo,
                    domain: None,
                }),
                accept: AtomicBool::new(true),
                panic_on_verify: AtomicBool::new(false),
                loaded: AtomicBool::new(false),
                deserialize_calls: AtomicUsize::new(0),
                verify_calls: AtomicUsize::new(0),
                destroy_calls: AtomicUsize::new(0),
                overlapping_loads: AtomicUsize::new(0),
            }),
        }
    }

    pub fn set_content(&self, content: ContentMode) {
        self.shared.script.lock().unwrap().content = content;
    }

    pub fn set_echo(&self) {
        self.set_content(ContentMode::Echo);
    }

    pub fn set_unreadable(&self) {
        self.set_content(ContentMode::Unreadable);
    }

    pub fn set_domain(&self, domain: Option<&str>) {
        self.shared.script.lock().unwrap().domain = domain.map(str::to_string);
    }

    pub fn set_accept(&self, accept: bool) {
        self.shared.accept.store(accept, Ordering::SeqCst);
    }

    pub fn set_panic_on_verify(&self, panic: bool) {
        self.shared.panic_on_verify.store(panic, Ordering::SeqCst);
    }

    pub fn deserialize_calls(&self) -> usize {
        self.shared.deserialize_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.shared.verify_calls.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.shared.destroy_calls.load(Ordering::SeqCst)
    }

    /// Whether a certificate is loaded and not yet destroyed.
    pub fn is_loaded(&self) -> bool {
        self.shared.loaded.load(Ordering::SeqCst)
    }

    /// Number of `deserialize` calls made while a certificate was loaded.
    pub fn overlapping_loads(&self) -> usize {
        self.shared.overlapping_loads.load(Ordering::SeqCst)
    }
}

impl Default for NullVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateVerifier for NullVerifier {
    fn deserialize(&mut self, bytes: &[u8]) -> Option<String> {
        self.shared.deserialize_calls.fetch_add(1, Ordering::SeqCst);
        if self.shared.loaded.load(Ordering::SeqCst) {
            self.shared.overlapping_loads.fetch_add(1, Ordering::SeqCst);
        }
        let content = match &self.shared.script.lock().unwrap().content {
            ContentMode::Echo => String::from_utf8(bytes.to_vec()).ok(),
            ContentMode::Fixed(content) => Some(content.clone()),
            ContentMode::Unreadable => None,
        };
        self.shared.loaded.store(content.is_some(), Ordering::SeqCst);
        content
    }

    fn verify(&mut self) -> bool {
        self.shared.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.shared.panic_on_verify.load(Ordering::SeqCst) {
            panic!("injected verifier panic");
        }
        self.shared.loaded.load(Ordering::SeqCst) && self.shared.accept.load(Ordering::SeqCst)
    }

    fn destroy(&mut self) {
        self.shared.loaded.store(false, Ordering::SeqCst);
        self.shared.destroy_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn domain(&self) -> Option<String> {
        if self.shared.loaded.load(Ordering::SeqCst) {
            self.shared.script.lock().unwrap().domain.clone()
        } else {
            None
        }
    }
}
