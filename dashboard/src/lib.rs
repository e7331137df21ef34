//! ==============================================================================
//! lib.rs - Signup Demo Dashboard
//! ==============================================================================
//!
//! purpose:
//!     leptos wasm front end that registers a demo account against the
//!     signup api as soon as it mounts, then shows the backend's answer
//!     or the error that stopped it.
//!
//! architecture:
//!     - leptos csr (client-side rendering)
//!     - compiled to wasm, runs in browser
//!     - one request via fetch, behind the Transport trait
//!     - view state is plain data (state.rs), rendered by components
//!
//! ==============================================================================

use leptos::prelude::*;
use leptos_meta::provide_meta_context;
use wasm_bindgen::prelude::*;

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod state;
mod components;

use components::{Header, RequestView};

// ==============================================================================
// main entry point
// ==============================================================================

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

// ==============================================================================
// app component
// ==============================================================================

#[component]
fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Header />
        <div class="container">
            <RequestView />
        </div>
    }
}
