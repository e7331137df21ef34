//! Header component

use leptos::prelude::*;
use leptos_meta::Title;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <Title text="Signup Demo" />
        <header class="header">
            <div>
                <h1>"Signup Demo"</h1>
                <p class="subtitle">"Leptos WASM + Cloudflare Workers"</p>
            </div>
            <span class="badge">"POST /api/v1/user/any/signup"</span>
        </header>
    }
}
