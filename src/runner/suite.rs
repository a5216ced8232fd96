use super::console;
use super::tester::ApiTester;
use crate::client::HttpMethod;
use crate::report;
use anyhow::Result;
use serde_json::{json, Value};

const ACCOUNT_SUMMARY_FIELDS: &[&str] = &[
    "balance",
    "available_margin",
    "day_pnl",
    "total_pnl",
    "portfolio_value",
];

const MARKET_SYMBOL_FIELDS: &[&str] = &[
    "symbol",
    "name",
    "price",
    "change",
    "change_percent",
    "category",
];

const ORDER_FIELDS: &[&str] = &["order_id", "symbol", "side", "quantity", "status"];

/// Test groups in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestGroup {
    Connectivity,
    Authentication,
    Account,
    MarketData,
    Trading,
    OrderManagement,
    ErrorHandling,
}

impl TestGroup {
    pub const ALL: [TestGroup; 7] = [
        TestGroup::Connectivity,
        TestGroup::Authentication,
        TestGroup::Account,
        TestGroup::MarketData,
        TestGroup::Trading,
        TestGroup::OrderManagement,
        TestGroup::ErrorHandling,
    ];

    pub fn banner(&self) -> &'static str {
        match self {
            TestGroup::Connectivity => "📡 CONNECTIVITY TESTS",
            TestGroup::Authentication => "🔐 AUTHENTICATION TESTS",
            TestGroup::Account => "💰 ACCOUNT TESTS",
            TestGroup::MarketData => "📈 MARKET DATA TESTS",
            TestGroup::Trading => "📊 TRADING TESTS",
            TestGroup::OrderManagement => "📋 ORDER MANAGEMENT TESTS",
            TestGroup::ErrorHandling => "⚠️  ERROR HANDLING TESTS",
        }
    }
}

fn market_order(symbol: &str, side: &str) -> Value {
    json!({
        "symbol": symbol,
        "side": side,
        "quantity": 1,
        "order_type": "market"
    })
}

impl ApiTester {
    pub async fn test_api_root(&mut self) -> bool {
        self.run_test("API Root", HttpMethod::Get, "", 200, None, None)
            .await
            .0
    }

    /// Log in with the demo account; stores the token on success.
    ///
    /// Returns false unless the call passed and the body carried a `token`.
    pub async fn test_demo_login(&mut self) -> bool {
        let credentials = json!({
            "email": self.config.demo_email,
            "password": self.config.demo_password,
        });
        let (success, response) = self
            .run_test(
                "Demo Login",
                HttpMethod::Post,
                "auth/login",
                200,
                Some(&credentials),
                None,
            )
            .await;

        if !success {
            return false;
        }
        let Some(body) = response.as_object() else {
            return false;
        };
        let Some(token) = body.get("token") else {
            return false;
        };

        self.session.bearer_token = Some(match token {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        if let Some(user) = body.get("user") {
            self.session.authenticated_user_id = user
                .get("user_id")
                .map(|id| id.as_str().map(str::to_string).unwrap_or_else(|| id.to_string()));
            let email = user.get("email").and_then(Value::as_str).unwrap_or("None");
            console::print_detail(&format!("Logged in as: {}", email));
            console::print_detail(&format!(
                "User ID: {}",
                self.session.authenticated_user_id.as_deref().unwrap_or("None")
            ));
        }
        log::debug!("bearer token acquired");
        true
    }

    pub async fn test_get_me(&mut self) -> bool {
        self.run_test("Get Current User", HttpMethod::Get, "auth/me", 200, None, None)
            .await
            .0
    }

    pub async fn test_account_summary(&mut self) -> bool {
        let (success, response) = self
            .run_test(
                "Account Summary",
                HttpMethod::Get,
                "account/summary",
                200,
                None,
                None,
            )
            .await;

        let Some(summary) = response.as_object().filter(|_| success) else {
            return success;
        };
        let all_present =
            self.check_required_fields("Account Summary", summary, ACCOUNT_SUMMARY_FIELDS);
        print_present_fields(summary, ACCOUNT_SUMMARY_FIELDS);
        all_present
    }

    pub async fn test_market_symbols(&mut self) -> bool {
        let (success, response) = self
            .run_test(
                "Market Symbols",
                HttpMethod::Get,
                "market/symbols",
                200,
                None,
                None,
            )
            .await;

        let Some(symbols) = response.as_array().filter(|_| success) else {
            return success;
        };
        let Some(first) = symbols.first() else {
            return success;
        };
        let Some(sample) = first.as_object() else {
            // A non-object entry has none of the fields.
            let empty = serde_json::Map::new();
            return self.check_required_fields("Market Symbols", &empty, MARKET_SYMBOL_FIELDS);
        };

        if !self.check_required_fields("Market Symbols", sample, MARKET_SYMBOL_FIELDS) {
            return false;
        }
        console::print_detail(&format!("Found {} symbols", symbols.len()));
        console::print_detail(&format!(
            "Sample symbol: {} - {}",
            render(&sample["symbol"]),
            render(&sample["price"])
        ));
        true
    }

    pub async fn test_symbol_price(&mut self) -> bool {
        self.run_test(
            "Symbol Price",
            HttpMethod::Get,
            "market/price/RELIANCE",
            200,
            None,
            None,
        )
        .await
        .0
    }

    pub async fn test_place_buy_order(&mut self) -> bool {
        let order = market_order("RELIANCE", "buy");
        let (success, response) = self
            .run_test("Place Buy Order", HttpMethod::Post, "orders", 200, Some(&order), None)
            .await;

        let Some(placed) = response.as_object().filter(|_| success) else {
            return success;
        };
        if !self.check_required_fields("Buy Order", placed, ORDER_FIELDS) {
            return false;
        }
        console::print_detail(&format!("Order ID: {}", render(&placed["order_id"])));
        console::print_detail(&format!(
            "Symbol: {}, Side: {}",
            render(&placed["symbol"]),
            render(&placed["side"])
        ));
        console::print_detail(&format!(
            "Quantity: {}, Status: {}",
            render(&placed["quantity"]),
            render(&placed["status"])
        ));
        true
    }

    pub async fn test_place_sell_order(&mut self) -> bool {
        let order = market_order("RELIANCE", "sell");
        self.run_test("Place Sell Order", HttpMethod::Post, "orders", 200, Some(&order), None)
            .await
            .0
    }

    pub async fn test_limit_order(&mut self) -> bool {
        let order = json!({
            "symbol": "TCS",
            "side": "buy",
            "quantity": 1,
            "order_type": "limit",
            "price": 3900.0
        });
        self.run_test("Place Limit Order", HttpMethod::Post, "orders", 200, Some(&order), None)
            .await
            .0
    }

    pub async fn test_get_orders(&mut self) -> bool {
        self.run_test("Get Orders", HttpMethod::Get, "orders", 200, None, None)
            .await
            .0
    }

    pub async fn test_order_history(&mut self) -> bool {
        self.run_test("Order History", HttpMethod::Get, "orders/history", 200, None, None)
            .await
            .0
    }

    pub async fn test_positions(&mut self) -> bool {
        self.run_test("Positions", HttpMethod::Get, "positions", 200, None, None)
            .await
            .0
    }

    /// Order for an unknown symbol, expected to be rejected with 404.
    ///
    /// Not scheduled by `run_all_tests`: the backend accepts any symbol.
    pub async fn test_invalid_symbol_order(&mut self) -> bool {
        let order = market_order("INVALID_SYMBOL", "buy");
        self.run_test(
            "Invalid Symbol Order",
            HttpMethod::Post,
            "orders",
            404,
            Some(&order),
            None,
        )
        .await
        .0
    }

    /// Run every group in order.
    ///
    /// Returns false only when the login gate failed; later groups are then skipped.
    pub async fn run_all_tests(&mut self) -> bool {
        console::print_header();

        for group in TestGroup::ALL {
            console::print_group_banner(group.banner());
            if !self.run_group(group).await {
                console::print_gate_failure("Demo login failed - stopping tests");
                return false;
            }
        }
        true
    }

    /// Run the suite, print the summary and write reports if configured.
    ///
    /// Ok(true) only when the login gate passed and every executed test passed.
    pub async fn run(&mut self) -> Result<bool> {
        log::debug!("Testing against {}", self.config.base_url);

        let completed = self.run_all_tests().await;
        let all_passed = self.print_summary();

        if let Some(dir) = self.config.report_dir.clone() {
            report::write_reports(&self.session, completed, &dir)?;
        }

        Ok(completed && all_passed)
    }

    /// Returns false only for a failed gate.
    async fn run_group(&mut self, group: TestGroup) -> bool {
        match group {
            TestGroup::Connectivity => {
                self.test_api_root().await;
            }
            TestGroup::Authentication => {
                if !self.test_demo_login().await {
                    return false;
                }
                self.test_get_me().await;
            }
            TestGroup::Account => {
                self.test_account_summary().await;
            }
            TestGroup::MarketData => {
                self.test_market_symbols().await;
                self.test_symbol_price().await;
            }
            TestGroup::Trading => {
                self.test_place_buy_order().await;
                self.test_place_sell_order().await;
                self.test_limit_order().await;
            }
            TestGroup::OrderManagement => {
                self.test_get_orders().await;
                self.test_order_history().await;
                self.test_positions().await;
            }
            TestGroup::ErrorHandling => {
                console::print_detail("Invalid symbol check disabled: backend accepts any symbol");
            }
        }
        true
    }
}

fn print_present_fields(object: &serde_json::Map<String, Value>, fields: &[&str]) {
    for field in fields {
        if let Some(value) = object.get(*field) {
            console::print_detail(&format!("{}: {}", field, render(value)));
        }
    }
}

/// Strings without quotes, everything else as JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_order() {
        let banners: Vec<_> = TestGroup::ALL.iter().map(|g| g.banner()).collect();
        assert_eq!(banners.first(), Some(&"📡 CONNECTIVITY TESTS"));
        assert_eq!(banners[1], "🔐 AUTHENTICATION TESTS");
        assert_eq!(banners.last(), Some(&"⚠️  ERROR HANDLING TESTS"));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&json!("RELIANCE")), "RELIANCE");
        assert_eq!(render(&json!(2450.5)), "2450.5");
        assert_eq!(render(&Value::Null), "null");
    }

    #[test]
    fn test_market_order_body() {
        let order = market_order("TCS", "sell");
        assert_eq!(order["order_type"], "market");
        assert_eq!(order["quantity"], 1);
    }
}
