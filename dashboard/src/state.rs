//! ==============================================================================
//! state.rs - ViewState and its rendering
//! ==============================================================================
//!
//! ViewState starts as Loading and settles exactly once, on Success or
//! Failure. render() turns it into a RenderedView, a framework-free
//! description the leptos view maps onto the DOM and tests read as text.
//!
//! ==============================================================================

use serde_json::Value;

use crate::api::RequestFailure;

pub const HEADING: &str = "Signup Request";
pub const LOADING_TEXT: &str = "Loading...";
pub const DATA_HEADING: &str = "Data from Backend:";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Success(Value),
    Failure(String),
}

impl ViewState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }

    /// Apply the request outcome. Returns false, leaving the state
    /// untouched, if it has already settled.
    pub fn resolve(&mut self, outcome: Result<Value, RequestFailure>) -> bool {
        if self.is_settled() {
            return false;
        }
        *self = match outcome {
            Ok(data) => ViewState::Success(data),
            Err(failure) => ViewState::Failure(failure.to_string()),
        };
        true
    }

    pub fn render(&self) -> RenderedView {
        let error_line = match self {
            ViewState::Failure(message) => Some(format!("Error: {}", message)),
            _ => None,
        };
        // the data block only exists once there is data; everything
        // else, failures included, keeps the loading indicator
        let body = match self {
            ViewState::Success(data) => Body::Data {
                heading: DATA_HEADING,
                json: pretty_json(data),
            },
            _ => Body::Loading(LOADING_TEXT),
        };

        RenderedView {
            heading: HEADING,
            error_line,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Loading(&'static str),
    Data { heading: &'static str, json: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub heading: &'static str,
    pub error_line: Option<String>,
    pub body: Body,
}

impl RenderedView {
    pub fn has_data(&self) -> bool {
        matches!(self.body, Body::Data { .. })
    }

    /// Plain-text form, one block per line, in DOM order
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.heading.to_string()];
        if let Some(line) = &self.error_line {
            lines.push(line.clone());
        }
        match &self.body {
            Body::Loading(text) => lines.push(text.to_string()),
            Body::Data { heading, json } => {
                lines.push(heading.to_string());
                lines.push(json.clone());
            }
        }
        lines.join("\n")
    }
}

/// Two-space indented JSON, same layout as JSON.stringify(v, null, 2)
fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
