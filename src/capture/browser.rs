use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch;
use chromiumoxide::cdp::browser_protocol::network::{
    self, EventLoadingFailed, EventLoadingFinished, EventResponseReceived, GetResponseBodyParams,
    RequestId,
};
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::model::CaptureResult;

use super::filter::{ResponseFilter, ResponseKind};
use super::session::CaptureSession;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Matched response bodies can still be in flight when the load event fires;
/// give their fetches a moment to drain before freezing the session.
const DRAIN_DELAY_MS: u64 = 1000;

/// Flags carried over from running under CI containers: no sandbox helpers,
/// small /dev/shm, no GPU.
const LAUNCH_ARGS: [&str; 4] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
];

/// Owns the headless browser process and its CDP event pump.
pub struct BrowserDriver {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserDriver {
    pub async fn launch() -> Result<Self> {
        log_info!("launching headless browser");

        let config = BrowserConfig::builder()
            .args(LAUNCH_ARGS)
            .build()
            .map_err(|err| anyhow!(err))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch browser")?;

        // The handler future must be polled for the CDP connection to make
        // progress; it ends when the connection closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("failed to open page")
    }

    /// Shut the browser down and join the event pump. Must run on every exit
    /// path; the caller brackets its fallible work between launch and close.
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("failed to close browser")?;
        let _ = self.browser.wait().await;
        let _ = self.handler_task.await;
        Ok(())
    }
}

/// Load the profile page once and return whatever the session captured.
///
/// The browser is a scoped resource: it is closed whether or not the capture
/// succeeded, and the capture's error (if any) wins over a close error.
pub async fn capture(config: &Config) -> Result<CaptureResult> {
    let driver = BrowserDriver::launch().await?;
    let outcome = capture_on(&driver, config).await;
    let closed = driver.close().await;

    let result = outcome?;
    closed?;
    Ok(result)
}

async fn capture_on(driver: &BrowserDriver, config: &Config) -> Result<CaptureResult> {
    let page = driver.new_page().await?;

    page.execute(network::EnableParams::default())
        .await
        .context("failed to enable network events")?;
    page.execute(fetch::EnableParams::default())
        .await
        .context("failed to enable request interception")?;

    let cancel = CancellationToken::new();

    // Pass-through interception: every paused request is continued
    // unmodified. Nothing is ever blocked or rewritten.
    let paused = page
        .event_listener::<fetch::EventRequestPaused>()
        .await
        .context("failed to subscribe to paused requests")?;
    let continue_task = tokio::spawn(continue_requests(page.clone(), paused, cancel.clone()));

    let responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .context("failed to subscribe to responses")?;
    let finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .context("failed to subscribe to loading-finished events")?;
    let failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .context("failed to subscribe to loading-failed events")?;

    let session = Arc::new(Mutex::new(CaptureSession::new(ResponseFilter::for_config(
        config,
    ))));
    session.lock().await.begin();

    let worker = tokio::spawn(capture_worker(
        page.clone(),
        Arc::clone(&session),
        responses,
        finished,
        failed,
        cancel.clone(),
    ));

    let url = config.profile_url();
    log_info!("navigating to {url}");

    let navigation = tokio::time::timeout(config.nav_timeout, navigate(&page, &url)).await;
    match &navigation {
        Ok(Ok(())) => {
            log_info!("page load settled");
            tokio::time::sleep(Duration::from_millis(DRAIN_DELAY_MS)).await;
        }
        Ok(Err(_)) => {}
        Err(_) => {
            // The deadline is not a failure; keep whatever arrived so far.
            log_warn!(
                "navigation did not settle within {}s, keeping partial capture",
                config.nav_timeout.as_secs()
            );
        }
    }

    cancel.cancel();
    worker.await.context("capture worker failed to join")?;
    continue_task
        .await
        .context("interception worker failed to join")?;

    if let Ok(Err(err)) = navigation {
        return Err(err);
    }

    let outcome = session.lock().await.finish();
    Ok(outcome)
}

async fn navigate(page: &Page, url: &str) -> Result<()> {
    page.goto(url)
        .await
        .with_context(|| format!("navigation to {url} failed"))?;
    page.wait_for_navigation()
        .await
        .context("waiting for page load failed")?;
    Ok(())
}

/// Single consumer for all response events: matched responses are remembered
/// by request id, and their bodies fetched once loading finishes. Body
/// failures are logged and tolerated; losing one response never aborts the
/// capture.
async fn capture_worker<R, F, L>(
    page: Page,
    session: Arc<Mutex<CaptureSession>>,
    mut responses: R,
    mut finished: F,
    mut failed: L,
    cancel: CancellationToken,
) where
    R: Stream<Item = Arc<EventResponseReceived>> + Unpin,
    F: Stream<Item = Arc<EventLoadingFinished>> + Unpin,
    L: Stream<Item = Arc<EventLoadingFailed>> + Unpin,
{
    let mut pending: HashMap<RequestId, ResponseKind> = HashMap::new();

    loop {
        tokio::select! {
            maybe = responses.next() => {
                let Some(event) = maybe else { break };
                let response = &event.response;
                let kind = session
                    .lock()
                    .await
                    .classify(&response.url, response.status, &response.mime_type);
                if let Some(kind) = kind {
                    log_info!("matched {kind:?} response: {}", response.url);
                    pending.insert(event.request_id.clone(), kind);
                }
            }
            maybe = finished.next() => {
                let Some(event) = maybe else { break };
                if let Some(kind) = pending.remove(&event.request_id) {
                    record_body(&page, &session, kind, &event.request_id).await;
                }
            }
            maybe = failed.next() => {
                let Some(event) = maybe else { break };
                if pending.remove(&event.request_id).is_some() {
                    log_warn!("matched response failed to load: {}", event.error_text);
                }
            }
            _ = cancel.cancelled() => break,
        }
    }
}

async fn record_body(
    page: &Page,
    session: &Arc<Mutex<CaptureSession>>,
    kind: ResponseKind,
    request_id: &RequestId,
) {
    match page.execute(GetResponseBodyParams::new(request_id.clone())).await {
        Ok(body) => {
            if body.base64_encoded {
                log_warn!("skipping base64-encoded body for {kind:?} response");
            } else {
                session.lock().await.record(kind, &body.body);
            }
        }
        Err(err) => log_warn!("response body unavailable for {kind:?}: {err}"),
    }
}

async fn continue_requests<S>(page: Page, mut paused: S, cancel: CancellationToken)
where
    S: Stream<Item = Arc<fetch::EventRequestPaused>> + Unpin,
{
    loop {
        tokio::select! {
            maybe = paused.next() => {
                let Some(event) = maybe else { break };
                let params = fetch::ContinueRequestParams::new(event.request_id.clone());
                if let Err(err) = page.execute(params).await {
                    log_warn!("failed to continue request: {err}");
                }
            }
            _ = cancel.cancelled() => break,
        }
    }
}
