use metrics::{counter, histogram};
use std::time::Instant;

pub fn increment_user_registered() {
    counter!("kasho_users_registered_total").increment(1);
}

pub fn increment_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("kasho_logins_total", "outcome" => outcome).increment(1);
}

pub fn increment_account_created() {
    counter!("kasho_accounts_created_total").increment(1);
}

/// Track HTTP request latency and count, labelled by route and status.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    let labels = [
        ("path", path.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    histogram!("http_request_duration_seconds", &labels).record(elapsed);
    counter!("http_requests_total", &labels).increment(1);
}
