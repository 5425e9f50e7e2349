#![forbid(unsafe_code)]

use log::debug;
use poem::{handler, web::Json};
use serde::{Deserialize, Serialize};

// ***************************************************************************
//                                Constants
// ***************************************************************************
const GREETING_MESSAGE : &str = "Hello World";

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
/// Wire payload for the greeting endpoint.  GreetingView decodes the
/// same type on the client side.
#[derive(Debug, Serialize, Deserialize)]
pub struct RespGreeting {
    pub message: String,
}

impl RespGreeting {
    fn new(message: &str) -> Self {
        Self { message: message.to_string() }
    }
}

// ***************************************************************************
//                                 Handler
// ***************************************************************************
// ---------------------------------------------------------------------------
// greeting:
// ---------------------------------------------------------------------------
/** Respond to any request on the greeting route.  Method, query string and
 * body are all ignored; the reply is always 200 with the canned message.
 * The route is registered without a method guard in main, which is what
 * lets every method reach this handler.
 */
#[handler]
pub fn greeting() -> Json<RespGreeting> {
    debug!("Greeting requested; replying with the canned message.");
    Json(RespGreeting::new(GREETING_MESSAGE))
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::test::TestClient;
    use poem::Route;

    const GREETING_BODY: &str = r#"{"message":"Hello World"}"#;

    fn app() -> Route {
        Route::new().at("/api/hello", greeting)
    }

    #[test]
    fn payload_serializes_byte_for_byte() {
        let resp = RespGreeting::new(GREETING_MESSAGE);
        assert_eq!(serde_json::to_string(&resp).unwrap(), GREETING_BODY);
    }

    #[tokio::test]
    async fn get_returns_canned_greeting() {
        let cli = TestClient::new(app());
        let resp = cli.get("/api/hello").send().await;
        resp.assert_status_is_ok();
        resp.assert_header("content-type", "application/json; charset=utf-8");
        resp.assert_text(GREETING_BODY).await;
    }

    #[tokio::test]
    async fn query_and_body_are_ignored() {
        let cli = TestClient::new(app());
        let resp = cli.get("/api/hello?name=somebody").body("unused").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(GREETING_BODY).await;
    }

    #[tokio::test]
    async fn all_methods_reach_the_handler() {
        let cli = TestClient::new(app());

        let resp = cli.post("/api/hello").body("ignored").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(GREETING_BODY).await;

        let resp = cli.put("/api/hello").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(GREETING_BODY).await;

        let resp = cli.delete("/api/hello").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(GREETING_BODY).await;

        let resp = cli.patch("/api/hello").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(GREETING_BODY).await;
    }
}
