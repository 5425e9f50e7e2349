#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::routes::hello::RespGreeting;

// ***************************************************************************
//                                GreetingView
// ***************************************************************************
/** Native rendition of the page's greeting component.  The view owns its
 * display state and exposes it through a watch channel, so subscribers act
 * as the re-render mechanism: the state starts out as the empty string and
 * is written at most once, when the mount-time fetch resolves.
 *
 * A failed fetch is deliberately left unobserved, matching the page script:
 * the display state then remains empty indefinitely.  The failure is traced
 * at debug level for hygiene only.
 */
#[allow(dead_code)]
pub struct GreetingView {
    endpoint: String,
    state: Arc<watch::Sender<String>>,
    mounted: AtomicBool,
}

impl GreetingView {
    // -----------------------------------------------------------------------
    // new:
    // -----------------------------------------------------------------------
    /** Create an unmounted view that will fetch its message from the given
     * endpoint url.
     */
    #[allow(dead_code)]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let (state, _) = watch::channel(String::new());
        GreetingView {
            endpoint: endpoint.into(),
            state: Arc::new(state),
            mounted: AtomicBool::new(false),
        }
    }

    // -----------------------------------------------------------------------
    // mount:
    // -----------------------------------------------------------------------
    /** Issue the one-time fetch against the greeting endpoint.  Only the
     * first call has any effect; it returns the handle of the spawned fetch
     * task.  Later calls are no-ops that return None, so re-renders never
     * re-fetch.  The fetch runs in the background and callers keep reading
     * the display state without blocking.  Dropping the view does not abort
     * an in-flight request.
     */
    #[allow(dead_code)]
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return None;
        }
        let endpoint = self.endpoint.clone();
        let state = Arc::clone(&self.state);
        Some(tokio::spawn(async move {
            match fetch_greeting(&endpoint).await {
                Ok(greeting) => apply_message(&state, greeting.message),
                Err(e) => debug!("Greeting fetch failed, message stays empty: {}", e),
            }
        }))
    }

    // -----------------------------------------------------------------------
    // message:
    // -----------------------------------------------------------------------
    /// The currently displayed message.
    #[allow(dead_code)]
    pub fn message(&self) -> String {
        self.state.borrow().clone()
    }

    // -----------------------------------------------------------------------
    // subscribe:
    // -----------------------------------------------------------------------
    /// Observe display state changes; each change is one re-render.
    #[allow(dead_code)]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.state.subscribe()
    }
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// apply_message:
// ---------------------------------------------------------------------------
/** The single mutation entry point for the display state.  Called at most
 * once per view, after a successful fetch.
 */
#[allow(dead_code)]
fn apply_message(state: &watch::Sender<String>, message: String) {
    state.send_replace(message);
}

// ---------------------------------------------------------------------------
// fetch_greeting:
// ---------------------------------------------------------------------------
/** Fetch and decode the greeting payload.  Network errors, non-2xx statuses
 * and undecodable bodies all surface here as errors.
 */
#[allow(dead_code)]
async fn fetch_greeting(endpoint: &str) -> Result<RespGreeting> {
    let response = reqwest::get(endpoint).await?.error_for_status()?;
    Ok(response.json::<RespGreeting>().await?)
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::hello::greeting;
    use poem::listener::{Acceptor, Listener, TcpListener};
    use poem::{Route, Server};

    /** Run the greeting route on an ephemeral port and return the endpoint
     * url.  The server task is detached; it dies with the test runtime.
     */
    async fn spawn_greeting_server() -> String {
        let acceptor = TcpListener::bind("127.0.0.1:0")
            .into_acceptor()
            .await
            .unwrap();
        let port = acceptor.local_addr()[0].as_socket_addr().unwrap().port();
        let app = Route::new().at("/api/hello", greeting);
        tokio::spawn(async move {
            let _ = Server::new_with_acceptor(acceptor).run(app).await;
        });
        format!("http://127.0.0.1:{}/api/hello", port)
    }

    /// A url nothing listens on: bind to grab a free port, then close it.
    fn refused_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/api/hello", port)
    }

    #[tokio::test]
    async fn round_trip_updates_display_state_once() {
        let endpoint = spawn_greeting_server().await;
        let view = GreetingView::new(endpoint);

        // Initial render shows the empty message.
        assert_eq!(view.message(), "");

        let mut renders = view.subscribe();
        let fetch = view.mount().expect("first mount spawns the fetch");

        // The fetch task has not run yet on the current-thread runtime, so
        // the message is still empty while the request is in flight.
        assert_eq!(view.message(), "");

        fetch.await.unwrap();

        // Exactly one re-render, and the round trip is the identity.
        assert!(renders.has_changed().unwrap());
        renders.borrow_and_update();
        assert!(!renders.has_changed().unwrap());
        assert_eq!(view.message(), "Hello World");
    }

    #[tokio::test]
    async fn mount_fetches_only_once() {
        let endpoint = spawn_greeting_server().await;
        let view = GreetingView::new(endpoint);

        let fetch = view.mount().expect("first mount spawns the fetch");
        assert!(view.mount().is_none(), "second mount must not re-fetch");
        fetch.await.unwrap();
        assert!(view.mount().is_none(), "mounting after completion must not re-fetch");
        assert_eq!(view.message(), "Hello World");
    }

    #[tokio::test]
    async fn fetch_failure_leaves_message_empty() {
        let view = GreetingView::new(refused_endpoint());
        let mut renders = view.subscribe();

        let fetch = view.mount().expect("first mount spawns the fetch");
        fetch.await.unwrap();

        // The rejection is swallowed: no state change, no panic.
        assert_eq!(view.message(), "");
        assert!(!renders.has_changed().unwrap());
    }

    #[tokio::test]
    async fn non_json_body_leaves_message_empty() {
        // A route that answers 200 with a body that is not the wire payload.
        #[poem::handler]
        fn not_json() -> &'static str {
            "plain text"
        }
        let acceptor = TcpListener::bind("127.0.0.1:0")
            .into_acceptor()
            .await
            .unwrap();
        let port = acceptor.local_addr()[0].as_socket_addr().unwrap().port();
        let app = Route::new().at("/api/hello", not_json);
        tokio::spawn(async move {
            let _ = Server::new_with_acceptor(acceptor).run(app).await;
        });

        let view = GreetingView::new(format!("http://127.0.0.1:{}/api/hello", port));
        let fetch = view.mount().expect("first mount spawns the fetch");
        fetch.await.unwrap();
        assert_eq!(view.message(), "");
    }
}
