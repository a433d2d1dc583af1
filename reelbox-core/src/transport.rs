use std::time::Duration;

use serde_json::Value;
use ureq::Agent;
use url::Url;

use crate::{error::Error, util::default_ureq_agent_builder};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A single HTTP exchange, described independently of the client issuing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

/// Anything able to perform a request and hand back the decoded JSON body.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Value, Error>;
}

pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    pub fn new(proxy_url: Option<&str>, timeout: Option<Duration>) -> Self {
        Self {
            agent: default_ureq_agent_builder(proxy_url, timeout).build().into(),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Value, Error> {
        log::debug!("{:?} {}", request.method, request.url);

        let mut response = match request.method {
            Method::Get => {
                let mut req = self.agent.get(request.url.as_str());
                for (key, value) in &request.headers {
                    req = req.header(key.as_str(), value.as_str());
                }
                req.call()?
            }
            Method::Post => {
                let mut req = self.agent.post(request.url.as_str());
                for (key, value) in &request.headers {
                    req = req.header(key.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => req.send_json(body)?,
                    None => req.send_empty()?,
                }
            }
        };

        let status = response.status();
        match response.body_mut().read_json::<Value>() {
            Ok(body) => {
                if !status.is_success() {
                    log::debug!("{} answered {status}", request.url);
                }
                Ok(body)
            }
            Err(err) if status.is_success() => Err(err.into()),
            Err(_) => Err(Error::HttpStatus(status.as_u16())),
        }
    }
}
