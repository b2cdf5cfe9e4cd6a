#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use {
    async_trait::async_trait,
    cqbridge_backend::{Contact, ContactKind, memory::MemoryBackend},
    cqbridge_config::BridgeConfig,
    cqbridge_media::{DataDirs, Fetcher},
    cqbridge_store::MemoryStore,
    tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        subscriber::DefaultGuard,
    },
    tracing_subscriber::{
        layer::{Context, Layer, SubscriberExt},
        registry,
    },
};

use crate::Translator;

pub const GROUP: Contact = Contact::Group(1);
pub const FRIEND: Contact = Contact::Friend(20);

/// Serves a fixed body, or fails every request when it has none.
pub struct FakeFetcher {
    body: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn serving(body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body.to_vec()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(
        &self,
        url: &str,
        _timeout: Option<Duration>,
        _use_proxy: bool,
    ) -> cqbridge_media::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body.clone().ok_or_else(|| cqbridge_media::Error::Status {
            url: url.to_owned(),
            status: 503,
        })
    }
}

pub struct Fixture {
    pub backend: Arc<MemoryBackend>,
    pub store: Arc<MemoryStore>,
    pub fetcher: Arc<FakeFetcher>,
    pub translator: Translator,
}

/// A translator over an in-memory backend that knows group 1 with member
/// 10, user 20 and group 1 profiles, and an empty in-memory store.
pub fn fixture(fetcher: Arc<FakeFetcher>) -> Fixture {
    fixture_with_config(fetcher, BridgeConfig::default())
}

pub fn fixture_with_config(fetcher: Arc<FakeFetcher>, config: BridgeConfig) -> Fixture {
    let backend = Arc::new(MemoryBackend::new());
    backend.add_member(1, 10, "Bob");
    backend.add_profile(ContactKind::User, 20, "Alice");
    backend.add_profile(ContactKind::Group, 1, "Team");
    let store = Arc::new(MemoryStore::new());

    let translator = Translator::builder(backend.clone())
        .store(store.clone())
        .fetcher(fetcher.clone())
        .data_dirs(DataDirs::new(Vec::new()))
        .config(config)
        .build()
        .unwrap();
    Fixture {
        backend,
        store,
        fetcher,
        translator,
    }
}

/// Log events recorded while a [`capture`] guard is alive.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

impl Captured {
    pub fn count(&self, level: Level) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageVisitor::default();
        event.record(&mut message);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Capture events on the current thread until the guard drops.
pub fn capture() -> (Captured, DefaultGuard) {
    let captured = Captured::default();
    let guard = tracing::subscriber::set_default(registry().with(captured.clone()));
    (captured, guard)
}
