//! A single request against the game server.

use std::fmt;

/// How a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Plain GET with query parameters.
    Get,
    /// POST with form-encoded parameters.
    Form,
}

/// A request against the game: a server-relative path (which may already
/// carry a query string) plus ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl GameRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn form(path: impl Into<String>) -> Self {
        Self {
            method: Method::Form,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// First value for `key`, if present.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path without any query string.
    pub fn page(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for GameRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self.method {
            Method::Get => "GET",
            Method::Form => "POST",
        };
        write!(f, "{method} {}", self.path)
    }
}
