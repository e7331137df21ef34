//! RequestView - fires the demo signup once on mount and shows the result

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::FetchTransport;
use crate::config::RequestConfig;
use crate::lifecycle::{initialize, Lifecycle};
use crate::state::{Body, RenderedView, ViewState};

#[component]
pub fn RequestView(
    /// endpoint, payload and credential policy; the demo signup when omitted
    #[prop(optional)]
    config: Option<RequestConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let (state, set_state) = signal(ViewState::Loading);

    let lifecycle = Arc::new(Lifecycle::new());
    on_cleanup({
        let lifecycle = lifecycle.clone();
        move || lifecycle.teardown()
    });

    // send on mount; the lifecycle keeps re-runs from sending again
    Effect::new(move || {
        let lifecycle = lifecycle.clone();
        let config = config.clone();
        leptos::task::spawn_local(async move {
            initialize(&lifecycle, &FetchTransport, &config, |outcome| {
                set_state.update(|s| {
                    s.resolve(outcome);
                });
            })
            .await;
        });
    });

    view! {
        <div class="card">
            {move || state_markup(state.with(ViewState::render))}
        </div>
    }
}

/// heading, optional error line, then the loading or data block
fn state_markup(rendered: RenderedView) -> impl IntoView {
    view! {
        <h2>{rendered.heading}</h2>
        {rendered.error_line.map(|line| view! {
            <p class="result error">{line}</p>
        })}
        {match rendered.body {
            Body::Loading(text) => view! {
                <p><span class="spinner"></span>" "{text}</p>
            }.into_any(),
            Body::Data { heading, json } => view! {
                <div class="result success">
                    <h3>{heading}</h3>
                    <pre class="result-value">{json}</pre>
                </div>
            }.into_any(),
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::tachys::view::RenderHtml;
    use serde_json::json;

    #[test]
    fn test_card_headings_nest_under_page_title() {
        let html = state_markup(ViewState::Success(json!({"ok": true})).render()).to_html();
        assert!(html.contains("<h2>Signup Request</h2>"));
        assert!(html.contains("<h3>Data from Backend:</h3>"));
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_loading_card_has_no_data_heading() {
        let html = state_markup(ViewState::Loading.render()).to_html();
        assert!(html.contains("<h2>Signup Request</h2>"));
        assert!(html.contains("Loading..."));
        assert!(!html.contains("<h3"));
    }
}
