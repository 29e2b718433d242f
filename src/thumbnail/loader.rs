use std::future::Future;

use ureq::Agent;

use super::Error;

/// Confirms that a thumbnail resource is actually loadable.
///
/// This is the cache's only external capability: start a load for a URL and
/// signal success or failure, the way the original client leaned on image
/// element load/error callbacks. Implementations must not cache; the cache
/// sits in front of them.
pub trait ThumbnailLoader: Send + Sync + 'static {
  fn load(&self, url: String) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Probes the resource with a HEAD request.
#[derive(Debug, Clone)]
pub struct HttpLoader {
  agent: Agent,
}

impl HttpLoader {
  pub fn new() -> Self {
    Self {
      agent: Agent::new(),
    }
  }
}

impl Default for HttpLoader {
  fn default() -> Self {
    Self::new()
  }
}

impl ThumbnailLoader for HttpLoader {
  async fn load(&self, url: String) -> Result<(), Error> {
    let agent = self.agent.clone();

    // ureq blocks, so the probe runs on the blocking pool.
    match tokio::task::spawn_blocking(move || agent.head(&url).call()).await {
      Ok(Ok(_response)) => Ok(()),
      Ok(Err(error)) => Err(Error::load(format!("{error}"))),
      Err(error) => Err(Error::load(format!("load task failed: {error}"))),
    }
  }
}
