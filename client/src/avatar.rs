use leptos::prelude::*;
use rankboard_shared::{AvatarState, CharacterApiRenderer, CharacterAppearance};
use web_sys::HtmlImageElement;

pub const AVATAR_SCALE: f32 = 1.1;
const FALLBACK_GLYPH: &str = "\u{1F464}";

/// Decode the image off-screen before showing it, so rows never flash a broken image.
fn preload(state: RwSignal<AvatarState>, url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        let Ok(image) = HtmlImageElement::new() else {
            state.update(|s| {
                s.settle(Err(()));
            });
            return;
        };
        image.set_src(&url);
        let outcome = match wasm_bindgen_futures::JsFuture::from(image.decode()).await {
            Ok(_) => Ok(url),
            Err(err) => {
                web_sys::console::warn_1(&format!("avatar failed to load: {:?}", err).into());
                Err(())
            }
        };
        state.update(|s| {
            s.settle(outcome);
        });
    });
}

#[component]
pub fn CharacterAvatar(appearance: CharacterAppearance, name: String) -> impl IntoView {
    let (initial, url) = AvatarState::request(&CharacterApiRenderer::default(), &appearance, AVATAR_SCALE);
    let state = RwSignal::new(initial);
    if let Some(url) = url {
        preload(state, url);
    }

    view! {
        <div style="width: 56px; height: 64px; display: flex; align-items: flex-end; justify-content: center; flex-shrink: 0;">
            {move || match state.get() {
                AvatarState::Loading => view! {
                    <div class="avatar-spinner" style="width: 20px; height: 20px; border: 2px solid #3a3f55; border-top-color: #f5c542; border-radius: 50%; animation: spin 0.8s linear infinite; margin-bottom: 20px;"></div>
                }.into_any(),
                AvatarState::Ready(src) => view! {
                    <img src=src alt=name.clone() style="max-width: 56px; max-height: 64px; image-rendering: pixelated;" />
                }.into_any(),
                AvatarState::Fallback => view! {
                    <span title=name.clone() style="font-size: 28px; opacity: 0.6; margin-bottom: 12px;">{FALLBACK_GLYPH}</span>
                }.into_any(),
            }}
        </div>
    }
}
