use leptos::prelude::*;
use rankboard_shared::view::{page_window, pagination_summary};
use rankboard_shared::PaginationInfo;

const BUTTON_STYLE: &str = "min-width: 32px; padding: 6px 10px; border-radius: 4px; border: 1px solid #282c3e; background: #1a1d2a; color: #c8c6cf; cursor: pointer; font-size: 13px;";
const ACTIVE_BUTTON_STYLE: &str = "min-width: 32px; padding: 6px 10px; border-radius: 4px; border: 1px solid #f5c542; background: #f5c542; color: #13151f; cursor: default; font-size: 13px; font-weight: 600;";
const DISABLED_BUTTON_STYLE: &str = "min-width: 32px; padding: 6px 10px; border-radius: 4px; border: 1px solid #282c3e; background: #1a1d2a; color: #4a4d5c; cursor: not-allowed; font-size: 13px;";

/// Prev, numbered window, next. `on_page` receives the target page number.
#[component]
pub fn Pagination(
    pagination: PaginationInfo,
    #[prop(into)] on_page: Callback<u32>,
) -> impl IntoView {
    let current = pagination.current_page;
    let total = pagination.total_pages;
    let has_prev = pagination.has_prev_page;
    let has_next = pagination.has_next_page;

    let numbered = page_window(current, total)
        .into_iter()
        .map(|page| {
            let is_current = page == current;
            view! {
                <button
                    style={if is_current { ACTIVE_BUTTON_STYLE } else { BUTTON_STYLE }}
                    disabled=is_current
                    on:click=move |_| on_page.run(page)
                >
                    {page}
                </button>
            }
        })
        .collect_view();

    view! {
        <div style="display: flex; flex-direction: column; align-items: center; gap: 8px; padding: 12px 0;">
            <div style="display: flex; gap: 6px; align-items: center;">
                <button
                    style={if has_prev { BUTTON_STYLE } else { DISABLED_BUTTON_STYLE }}
                    disabled={!has_prev}
                    on:click=move |_| {
                        if has_prev {
                            on_page.run(current - 1);
                        }
                    }
                >
                    "Prev"
                </button>
                {numbered}
                <button
                    style={if has_next { BUTTON_STYLE } else { DISABLED_BUTTON_STYLE }}
                    disabled={!has_next}
                    on:click=move |_| {
                        if has_next {
                            on_page.run(current + 1);
                        }
                    }
                >
                    "Next"
                </button>
            </div>
            <span style="color: #7a7885; font-size: 12px;">{pagination_summary(&pagination)}</span>
        </div>
    }
}
