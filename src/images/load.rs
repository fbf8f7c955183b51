//! Image load detection.
//!
//! [`await_image_load`] starts loading an image through an [`ImageSource`]
//! and returns a future that settles exactly once: `Ok(())` when the source
//! reports the image loaded, or [`ImageLoadError`] when it reports failure.
//!
//! The source is handed a [`LoadSettler`] whose `loaded`/`failed` methods
//! consume it, so a second settlement cannot be expressed. There is no
//! timeout; a source that never settles (or drops the settler) leaves the
//! future pending until the caller drops it.

use std::future::Future;

use thiserror::Error;
use tokio::sync::oneshot;

/// The image at `url` failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load image: {url}")]
pub struct ImageLoadError {
    url: String,
}

impl ImageLoadError {
    /// The URL that failed.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// One-shot handle a source uses to report the outcome of a load.
#[derive(Debug)]
pub struct LoadSettler {
    url: String,
    tx: oneshot::Sender<Result<(), ImageLoadError>>,
}

impl LoadSettler {
    /// The URL being loaded.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Report a successful load.
    pub fn loaded(self) {
        // The waiting future may already be gone.
        let _ = self.tx.send(Ok(()));
    }

    /// Report a failed load.
    pub fn failed(self) {
        let Self { url, tx } = self;
        let _ = tx.send(Err(ImageLoadError { url }));
    }
}

/// The platform primitive that actually loads images.
pub trait ImageSource {
    /// Begin loading `settler.url()` and settle once the outcome is known.
    ///
    /// Must not block; the outcome may be reported from any thread.
    fn load(&self, settler: LoadSettler);
}

/// Start loading `url` and wait for exactly one outcome.
///
/// Loading begins immediately, before the returned future is first polled.
pub fn await_image_load<S>(
    source: &S,
    url: impl Into<String>,
) -> impl Future<Output = Result<(), ImageLoadError>> + Send + 'static
where
    S: ImageSource + ?Sized,
{
    let (tx, rx) = oneshot::channel();
    source.load(LoadSettler {
        url: url.into(),
        tx,
    });

    async move {
        match rx.await {
            Ok(outcome) => outcome,
            // Settler dropped without an outcome: nothing will ever arrive.
            Err(_) => std::future::pending().await,
        }
    }
}

/// Loads images over HTTP with `reqwest`.
///
/// A 2xx response with an `image/*` (or absent) content type counts as
/// loaded; any other response or a transport error counts as failed.
/// Requires a running Tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ImageSource for HttpImageSource {
    fn load(&self, settler: LoadSettler) {
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.get(settler.url()).send().await {
                Ok(response) if response.status().is_success() && is_image(&response) => {
                    settler.loaded();
                }
                Ok(response) => {
                    tracing::debug!(
                        url = %settler.url(),
                        status = %response.status(),
                        "Image response rejected"
                    );
                    settler.failed();
                }
                Err(e) => {
                    tracing::debug!(url = %settler.url(), error = %e, "Image request failed");
                    settler.failed();
                }
            }
        });
    }
}

fn is_image(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.starts_with("image/"))
}
