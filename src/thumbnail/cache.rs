use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

use super::ThumbnailLoader;

pub const DEFAULT_MAX_CONCURRENT: usize = 3;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Shared, time-expiring cache of dataset thumbnail URLs.
///
/// At most `max_concurrent` loads run at once; further requests queue on a
/// FIFO-fair slot semaphore. Concurrent requests for the same key share a
/// single load and are each notified once when it settles. Entries expire
/// `max_age` after a successful load, lazily on lookup and periodically via
/// [`spawn_sweeper`](Self::spawn_sweeper).
///
/// One instance is created at startup and handed to every caller needing a
/// display URL; clones share the same state.
pub struct ThumbnailCache<L> {
  loader: Arc<L>,
  base_url: Url,
  max_age: Duration,
  max_concurrent: usize,
  state: Arc<Mutex<State>>,
}

struct State {
  entries: HashMap<String, Entry>,
  in_flight: HashMap<String, broadcast::Sender<LoadResult>>,
  slots: Arc<Semaphore>,
  generation: u64,
}

struct Entry {
  url: String,
  loaded_at: Instant,
}

type LoadResult = Result<String, Error>;

enum Plan {
  Hit(String),
  Wait(broadcast::Receiver<LoadResult>),
  Start {
    generation: u64,
    slots: Arc<Semaphore>,
    tx: broadcast::Sender<LoadResult>,
  },
}

impl<L: ThumbnailLoader> ThumbnailCache<L> {
  pub fn new(loader: L, base_url: Url) -> Self {
    Self::with_limits(loader, base_url, DEFAULT_MAX_CONCURRENT, DEFAULT_MAX_AGE)
  }

  pub fn with_limits(loader: L, base_url: Url, max_concurrent: usize, max_age: Duration) -> Self {
    Self {
      loader: Arc::new(loader),
      base_url,
      max_age,
      max_concurrent,
      state: Arc::new(Mutex::new(State {
        entries: HashMap::new(),
        in_flight: HashMap::new(),
        slots: Arc::new(Semaphore::new(max_concurrent)),
        generation: 0,
      })),
    }
  }

  /// Deterministic mapping from a dataset key to its thumbnail URL. No I/O.
  pub fn resolve_url(&self, key: &str) -> String {
    format!(
      "{}/datasets/{}/thumbnail",
      self.base_url.as_str().trim_end_matches('/'),
      key
    )
  }

  /// True iff a load for `key` succeeded no longer than `max_age` ago.
  /// Expired entries are dropped by this check.
  pub fn is_cached(&self, key: &str) -> bool {
    self.fresh_url(key).is_some()
  }

  pub fn cached_url(&self, key: &str) -> Option<String> {
    self.fresh_url(key)
  }

  fn fresh_url(&self, key: &str) -> Option<String> {
    let mut state = self.state.lock();

    match state.entries.get(key) {
      Some(entry) if entry.loaded_at.elapsed() <= self.max_age => Some(entry.url.clone()),
      Some(_) => {
        state.entries.remove(key);
        None
      }
      None => None,
    }
  }

  /// Resolves with the thumbnail URL once the resource is confirmed loadable.
  ///
  /// A cached key resolves immediately. A key already in flight joins that
  /// load instead of issuing a second one. Otherwise the load starts as soon
  /// as a slot is free, queued FIFO behind earlier requests. A failed load
  /// leaves no entry behind, so the next call starts fresh.
  pub async fn preload(&self, key: &str) -> Result<String, Error> {
    let plan = {
      let mut state = self.state.lock();

      let hit = match state.entries.get(key) {
        Some(entry) if entry.loaded_at.elapsed() <= self.max_age => Some(entry.url.clone()),
        _ => None,
      };

      if let Some(url) = hit {
        Plan::Hit(url)
      } else {
        // Drops an expired entry if one was there.
        state.entries.remove(key);

        if let Some(tx) = state.in_flight.get(key) {
          Plan::Wait(tx.subscribe())
        } else {
          let (tx, _rx) = broadcast::channel(1);
          state.in_flight.insert(key.to_string(), tx.clone());

          Plan::Start {
            generation: state.generation,
            slots: Arc::clone(&state.slots),
            tx,
          }
        }
      }
    };

    match plan {
      Plan::Hit(url) => Ok(url),
      Plan::Wait(mut rx) => match rx.recv().await {
        Ok(result) => result,
        Err(_) => Err(Error::cancelled(key)),
      },
      Plan::Start {
        generation,
        slots,
        tx,
      } => self.start_load(key, generation, slots, tx).await,
    }
  }

  async fn start_load(
    &self,
    key: &str,
    generation: u64,
    slots: Arc<Semaphore>,
    tx: broadcast::Sender<LoadResult>,
  ) -> Result<String, Error> {
    let permit = match slots.acquire_owned().await {
      Ok(permit) => permit,
      Err(_) => {
        // The cache was cleared while this key sat in the wait queue.
        let error = Error::cancelled(key);
        let _ = tx.send(Err(error.clone()));

        return Err(error);
      }
    };

    let url = self.resolve_url(key);
    log::debug!(key; "loading thumbnail");

    let result = match self.loader.load(url.clone()).await {
      Ok(()) => Ok(url),
      Err(error) => Err(error.with_key(key)),
    };

    {
      let mut state = self.state.lock();

      // A clear() since this load started invalidates its result.
      if state.generation == generation {
        if let Ok(url) = &result {
          state.entries.insert(
            key.to_string(),
            Entry {
              url: url.clone(),
              loaded_at: Instant::now(),
            },
          );
        }

        state.in_flight.remove(key);
      }
    }

    // Frees the slot, which starts the next queued load.
    drop(permit);

    if let Err(error) = &result {
      log::warn!("thumbnail load failed: {error}");
    }

    let _ = tx.send(result.clone());

    result
  }

  /// Preloads every key through the same cap and queue. Individual failures
  /// are logged and do not abort the batch; returns once all have settled.
  pub async fn preload_batch(&self, keys: &[String]) {
    let mut loads = JoinSet::new();

    for key in keys {
      let cache = self.clone();
      let key = key.clone();

      loads.spawn(async move {
        let _ = cache.preload(&key).await;
      });
    }

    while loads.join_next().await.is_some() {}
  }

  /// Drops all entries and in-flight registrations and resets the slot
  /// count. Requests still queued for a slot resolve with a cancellation
  /// error; loads already running settle their callers but record nothing.
  pub fn clear(&self) {
    let mut state = self.state.lock();

    state.entries.clear();
    state.in_flight.clear();
    state.generation += 1;
    state.slots.close();
    state.slots = Arc::new(Semaphore::new(self.max_concurrent));
  }

  /// Drops every entry older than `max_age`. Returns the eviction count.
  pub fn evict_expired(&self) -> usize {
    let mut state = self.state.lock();
    let before = state.entries.len();
    let max_age = self.max_age;

    state.entries.retain(|_, entry| entry.loaded_at.elapsed() <= max_age);

    before - state.entries.len()
  }

  /// Background sweep on a `max_age` interval.
  pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
    let cache = self.clone();

    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(cache.max_age);
      ticker.tick().await;

      loop {
        ticker.tick().await;

        let evicted = cache.evict_expired();
        if evicted > 0 {
          log::debug!("evicted {evicted} expired thumbnail entries");
        }
      }
    })
  }
}

impl<L> Clone for ThumbnailCache<L> {
  fn clone(&self) -> Self {
    Self {
      loader: Arc::clone(&self.loader),
      base_url: self.base_url.clone(),
      max_age: self.max_age,
      max_concurrent: self.max_concurrent,
      state: Arc::clone(&self.state),
    }
  }
}

/// Errors that may occur while preloading thumbnails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
  pub kind: ErrorKind,
  pub key: Option<String>,
  pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Load,
  Cancelled,
}

impl Error {
  pub fn load(message: impl Into<String>) -> Self {
    Self {
      kind: ErrorKind::Load,
      key: None,
      message: message.into(),
    }
  }

  pub fn cancelled(key: &str) -> Self {
    Self {
      kind: ErrorKind::Cancelled,
      key: Some(key.to_string()),
      message: "preload cancelled by cache clear".to_string(),
    }
  }

  fn with_key(mut self, key: &str) -> Self {
    self.key = Some(key.to_string());
    self
  }
}

impl core::fmt::Display for Error {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match &self.key {
      Some(key) => write!(f, "[{key}] {}", self.message),
      None => f.write_str(&self.message),
    }
  }
}

impl std::error::Error for Error {}
