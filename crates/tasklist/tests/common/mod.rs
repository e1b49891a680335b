#![allow(dead_code)]

use tasklist::client::ScriptClient;
use tasklist::config::Config;
use wiremock::{Match, MockServer, Request};

/// Matches a multipart form body containing the text field `name` = `value`.
pub struct FormField(pub &'static str, pub &'static str);

impl Match for FormField {
    fn matches(&self, request: &Request) -> bool {
        let body = String::from_utf8_lossy(&request.body);
        let needle = format!("name=\"{}\"\r\n\r\n{}\r\n", self.0, self.1);
        body.contains(&needle)
    }
}

/// Matches requests whose `action` field is `action`.
pub fn action(action: &'static str) -> FormField {
    FormField("action", action)
}

pub fn client_for(server: &MockServer) -> ScriptClient {
    let config = Config {
        endpoint: format!("{}/exec", server.uri()),
        request_timeout_secs: Some(5),
    };
    ScriptClient::new(&config).expect("client builds")
}
