use std::time::Duration;

pub const NET_CONNECT_TIMEOUT: Duration = Duration::from_millis(8 * 1000);

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Agent configuration shared by every HTTP transport.  `timeout` bounds the
/// whole request; `None` leaves requests unbounded.  Error statuses are
/// returned as responses so their JSON bodies can still be read.
pub fn default_ureq_agent_builder(
    proxy_url: Option<&str>,
    timeout: Option<Duration>,
) -> ureq::config::ConfigBuilder<ureq::typestate::AgentScope> {
    let mut agent = ureq::Agent::config_builder()
        .timeout_global(timeout)
        .timeout_connect(Some(NET_CONNECT_TIMEOUT))
        .http_status_as_error(false);

    if let Some(proxy_url) = proxy_url {
        let proxy = ureq::Proxy::new(proxy_url).ok();
        if proxy.is_none() {
            log::warn!("ignoring invalid proxy URL: {proxy_url}");
        }
        agent = agent.proxy(proxy);
    }

    agent
}
