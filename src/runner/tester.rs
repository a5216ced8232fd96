use super::console;
use super::state::{SessionState, TestResult};
use crate::client::{ApiClient, HttpMethod, ResponseBody};
use crate::config::Config;
use anyhow::Result;
use serde_json::{Map, Value};

/// Characters of a mismatched response echoed into the failure message
const RESPONSE_PREVIEW_CHARS: usize = 200;

/// Sequential tester for the trading platform's HTTP API
pub struct ApiTester {
    pub(super) client: ApiClient,
    pub(super) config: Config,
    pub(super) session: SessionState,
}

impl ApiTester {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config.base_url, config.request_timeout())?;
        let session = SessionState::new(&config.base_url);
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.bearer_token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.authenticated_user_id.as_deref()
    }

    /// Record a test outcome and print it.
    pub fn log_test(
        &mut self,
        name: &str,
        success: bool,
        message: &str,
        response_data: Option<ResponseBody>,
    ) {
        let result = self.session.record(TestResult {
            name: name.to_string(),
            success,
            message: message.to_string(),
            response_data,
        });
        console::print_result(result);
    }

    /// Issue one request and log it as a test.
    ///
    /// Passes when the status matches `expected_status`. Transport errors are
    /// logged as failures and reported as `(false, {})`.
    pub async fn run_test(
        &mut self,
        name: &str,
        method: HttpMethod,
        endpoint: &str,
        expected_status: u16,
        body: Option<&Value>,
        headers: Option<&[(&str, &str)]>,
    ) -> (bool, ResponseBody) {
        let url = self.client.endpoint_url(endpoint);
        console::print_request(name, method, &url);

        let token = self.session.bearer_token.clone();
        let outcome = self
            .client
            .send(method, endpoint, body, headers, token.as_deref())
            .await;

        match outcome {
            Ok(response) => {
                let success = response.status == expected_status;
                let mut message = format!("Status: {}", response.status);
                if !success {
                    message.push_str(&format!(
                        ", Expected: {}, Response: {}",
                        expected_status,
                        response.body.preview(RESPONSE_PREVIEW_CHARS)
                    ));
                }
                self.log_test(name, success, &message, Some(response.body.clone()));
                (success, response.body)
            }
            Err(e) => {
                log::debug!("{} {} failed: {}", method, url, e);
                self.log_test(name, false, &format!("Error: {}", e), None);
                (false, ResponseBody::empty_object())
            }
        }
    }

    /// Log a failed sub-test `"<label> - <field> field"` for each missing key.
    ///
    /// Returns true when every field is present.
    pub fn check_required_fields(
        &mut self,
        label: &str,
        object: &Map<String, Value>,
        fields: &[&str],
    ) -> bool {
        let mut all_present = true;
        for field in fields {
            if !object.contains_key(*field) {
                all_present = false;
                self.log_test(
                    &format!("{} - {} field", label, field),
                    false,
                    &format!("Missing field: {}", field),
                    None,
                );
            }
        }
        all_present
    }

    /// Print the run summary; true when every executed test passed.
    pub fn print_summary(&self) -> bool {
        console::print_summary(&self.session);
        self.session.all_passed()
    }
}
