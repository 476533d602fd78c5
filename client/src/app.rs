use leptos::prelude::*;

use crate::rankings::RankingsTab;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main style="max-width: 980px; margin: 0 auto; padding: 24px 16px; background: #0d0f17; min-height: 100vh;">
            <RankingsTab />
        </main>
    }
}
