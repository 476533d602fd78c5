use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use rankboard_shared::jobs::{category_for_job, icon_file, icon_glyph, job_categories, job_glyph};
use rankboard_shared::view::{
    RankTier, TableState, format_signed_thousands, format_thousands, has_level_star,
    ranking_title, show_pagination, show_user_highlight, stats_bar, table_state,
};
use rankboard_shared::{
    JobCategory, RankingEntry, RankingFilters, RankingQueryController, RankingsFeed,
    RankingsSource, Transition,
};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, HttpRankingsSource};
use crate::avatar::CharacterAvatar;
use crate::pagination::Pagination;

const PANEL_BG: &str = "#13151f";
const BORDER: &str = "#282c3e";
const ACCENT: &str = "#f5c542";

/// Run one controller operation and hand back whatever transition it committed.
fn commit(
    controller: StoredValue<RankingQueryController>,
    op: impl FnOnce(&mut RankingQueryController) -> Option<Transition>,
) -> Option<Transition> {
    let mut committed = None;
    controller.update_value(|c| committed = op(c));
    committed
}

/// Show the transition overlay and drop it `clear_after` later, even if newer commits are pending.
fn begin_transition(
    controller: StoredValue<RankingQueryController>,
    transitioning: RwSignal<bool>,
    transition: Option<Transition>,
) {
    let Some(transition) = transition else {
        return;
    };
    transitioning.set(true);
    let ticket = transition.ticket;
    let delay_ms = u32::try_from(transition.clear_after.as_millis()).unwrap_or(u32::MAX);
    Timeout::new(delay_ms, move || {
        let mut cleared = false;
        controller.update_value(|c| cleared = c.finish_transition(ticket));
        if cleared {
            transitioning.set(false);
        }
    })
    .forget();
}

#[component]
pub fn RankingsTab() -> impl IntoView {
    let source = HttpRankingsSource {
        viewer: api::stored_viewer(),
    };
    let filters: RwSignal<RankingFilters> = RwSignal::new(RankingFilters::default());
    let transitioning: RwSignal<bool> = RwSignal::new(false);
    let search_input: RwSignal<String> = RwSignal::new(String::new());
    let feed: RwSignal<RankingsFeed> = RwSignal::new(RankingsFeed::new());
    let jobs: RwSignal<Vec<JobCategory>> = RwSignal::new(job_categories());

    let controller: StoredValue<RankingQueryController> =
        StoredValue::new(RankingQueryController::default());
    controller.update_value(|c| {
        c.subscribe(move |committed| filters.set(committed.clone()));
    });

    // Refetch on every committed filter change, including the initial load.
    Effect::new(move |_| {
        let requested = filters.get();
        let mut ticket = None;
        feed.update(|f| ticket = Some(f.begin(&requested)));
        let Some(ticket) = ticket else {
            return;
        };
        spawn_local(async move {
            let result = source.fetch(&requested).await;
            if let Err(e) = &result {
                web_sys::console::warn_1(&format!("rankings request failed: {e}").into());
            }
            feed.update(|f| {
                f.settle(ticket, result);
            });
        });
    });

    spawn_local(async move {
        match api::fetch_jobs().await {
            Ok(catalogue) if !catalogue.is_empty() => jobs.set(catalogue),
            Ok(_) => {}
            Err(e) => {
                web_sys::console::warn_1(&format!("job catalogue unavailable: {e}").into());
            }
        }
    });

    let on_search_input = move |ev: web_sys::Event| {
        let text = event_target_value(&ev);
        controller.update_value(|c| c.set_search_input(text.clone()));
        search_input.set(text);
    };
    let submit = move || {
        begin_transition(controller, transitioning, commit(controller, |c| c.submit_search()));
    };
    let on_search_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            submit();
        }
    };
    let on_clear = move |_| {
        search_input.set(String::new());
        begin_transition(controller, transitioning, commit(controller, |c| Some(c.clear_search())));
    };
    let on_page = Callback::new(move |page: u32| {
        begin_transition(controller, transitioning, commit(controller, |c| c.set_page(page)));
    });

    let title = move || filters.with(ranking_title);
    let stats = move || {
        feed.with(|f| stats_bar(f.rankings(), f.pagination(), f.user_ranking()))
    };

    view! {
        <section style=format!("background: {PANEL_BG}; border: 1px solid {BORDER}; border-radius: 8px; padding: 20px; color: #e6e4ec; font-family: 'Inter', sans-serif;")>
            <header style="display: flex; justify-content: space-between; align-items: baseline; margin-bottom: 16px;">
                <h2 style=format!("margin: 0; font-size: 20px; color: {ACCENT};")>{title}</h2>
            </header>

            <div style="display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; margin-bottom: 16px;">
                {move || {
                    let s = stats();
                    [
                        ("Champion", s.champion),
                        ("Your Rank", s.your_rank),
                        ("Total Players", s.total_players),
                        ("Max Level", s.max_level),
                    ]
                        .into_iter()
                        .map(|(label, value)| view! {
                            <div style=format!("background: #1a1d2a; border: 1px solid {BORDER}; border-radius: 6px; padding: 10px;")>
                                <div style="font-size: 11px; text-transform: uppercase; color: #7a7885;">{label}</div>
                                <div style="font-size: 16px; font-weight: 600; margin-top: 4px;">{value}</div>
                            </div>
                        })
                        .collect_view()
                }}
            </div>

            <div style="display: flex; gap: 8px; margin-bottom: 12px;">
                <input
                    type="text"
                    placeholder="Search players..."
                    maxlength="32"
                    style=format!("flex: 1; padding: 8px 12px; background: #1a1d2a; border: 1px solid {BORDER}; border-radius: 4px; color: #e6e4ec;")
                    prop:value=move || search_input.get()
                    on:input=on_search_input
                    on:keydown=on_search_keydown
                />
                <button
                    style=format!("padding: 8px 14px; border-radius: 4px; border: none; background: {ACCENT}; color: #13151f; font-weight: 600; cursor: pointer;")
                    on:click=move |_| submit()
                >
                    "Search"
                </button>
                <Show when=move || !search_input.with(String::is_empty) || filters.with(|f| !f.search.is_empty())>
                    <button
                        style=format!("padding: 8px 14px; border-radius: 4px; border: 1px solid {BORDER}; background: transparent; color: #c8c6cf; cursor: pointer;")
                        on:click=on_clear
                    >
                        "Clear"
                    </button>
                </Show>
            </div>

            <div style="display: flex; flex-wrap: wrap; gap: 6px; margin-bottom: 16px;">
                {move || {
                    jobs.get()
                        .into_iter()
                        .map(|job| view! { <JobFilterButton job=job filters=filters controller=controller transitioning=transitioning /> })
                        .collect_view()
                }}
            </div>

            <div style="position: relative; min-height: 240px;">
                {move || {
                    let is_transitioning = transitioning.get();
                    let current = filters.get();
                    feed.with(|f| {
                        let state = table_state(
                            is_transitioning,
                            f.is_loading(),
                            f.error(),
                            &current,
                            f.rankings().len(),
                        );
                        render_table(state, f.rankings())
                    })
                }}
            </div>

            {move || {
                let current = filters.get();
                feed.with(|f| {
                    if !show_user_highlight(&current, f.rankings(), f.user_ranking()) {
                        return ().into_any();
                    }
                    let Some(entry) = f.user_ranking().cloned() else {
                        return ().into_any();
                    };
                    view! {
                        <div style=format!("margin-top: 12px; border: 1px solid {ACCENT}; border-radius: 6px; padding: 8px;")>
                            <div style="font-size: 11px; text-transform: uppercase; color: #7a7885; margin-bottom: 6px;">"Your best character"</div>
                            <table style="width: 100%; border-collapse: collapse;">
                                <tbody>{ranking_row(entry)}</tbody>
                            </table>
                        </div>
                    }
                    .into_any()
                })
            }}

            {move || {
                let pagination = feed.with(|f| f.pagination().copied());
                if !show_pagination(pagination.as_ref()) {
                    return ().into_any();
                }
                match pagination {
                    Some(pagination) => view! { <Pagination pagination=pagination on_page=on_page /> }.into_any(),
                    None => ().into_any(),
                }
            }}
        </section>
    }
}

#[component]
fn JobFilterButton(
    job: JobCategory,
    filters: RwSignal<RankingFilters>,
    controller: StoredValue<RankingQueryController>,
    transitioning: RwSignal<bool>,
) -> impl IntoView {
    let icon_failed = RwSignal::new(false);
    let value = job.value.clone();
    let selected_value = job.value.clone();
    let is_selected = move || filters.with(|f| f.job == selected_value);
    let icon_src = format!("/assets/job-icons/{}.png", icon_file(&job.value));
    let glyph = icon_glyph(&job.value);

    view! {
        <button
            style=move || {
                if is_selected() {
                    format!("display: flex; align-items: center; gap: 6px; padding: 6px 10px; border-radius: 4px; border: 1px solid {ACCENT}; background: {ACCENT}; color: #13151f; font-size: 12px; font-weight: 600; cursor: pointer;")
                } else {
                    format!("display: flex; align-items: center; gap: 6px; padding: 6px 10px; border-radius: 4px; border: 1px solid {BORDER}; background: #1a1d2a; color: #c8c6cf; font-size: 12px; cursor: pointer;")
                }
            }
            on:click=move |_| {
                let value = value.clone();
                begin_transition(controller, transitioning, commit(controller, |c| c.set_job_filter(value)));
            }
        >
            {move || {
                if icon_failed.get() {
                    view! { <span style="width: 18px; text-align: center;">{glyph}</span> }.into_any()
                } else {
                    view! {
                        <img
                            src=icon_src.clone()
                            alt=""
                            style="width: 18px; height: 18px; image-rendering: pixelated;"
                            on:error=move |_| icon_failed.set(true)
                        />
                    }
                    .into_any()
                }
            }}
            <span>{job.label}</span>
        </button>
    }
}

fn render_table(state: TableState, rankings: &[RankingEntry]) -> AnyView {
    match state {
        TableState::Overlay { label, stale_rows } => {
            let stale = rankings
                .iter()
                .take(stale_rows)
                .cloned()
                .map(ranking_row)
                .collect_view();
            view! {
                <div style="position: relative;">
                    <div style="opacity: 0.35; pointer-events: none;">
                        <table style="width: 100%; border-collapse: collapse;">
                            <tbody>{stale}</tbody>
                        </table>
                    </div>
                    <div style="position: absolute; inset: 0; min-height: 160px; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 10px;">
                        <div style=format!("width: 28px; height: 28px; border: 3px solid {BORDER}; border-top-color: {ACCENT}; border-radius: 50%; animation: spin 0.8s linear infinite;")></div>
                        <span style="color: #c8c6cf; font-size: 13px;">{label.text()}</span>
                    </div>
                </div>
            }
            .into_any()
        }
        TableState::Failed(message) => view! {
            <div style="padding: 40px 0; text-align: center; color: #e05252;">
                <div style="font-weight: 600;">"Couldn't load rankings"</div>
                <div style="font-size: 12px; color: #7a7885; margin-top: 4px;">{message}</div>
            </div>
        }
        .into_any(),
        TableState::Empty(message) => view! {
            <div style="padding: 40px 0; text-align: center; color: #7a7885;">{message}</div>
        }
        .into_any(),
        TableState::Rows => {
            let rows = rankings.iter().cloned().map(ranking_row).collect_view();
            view! {
                <table style="width: 100%; border-collapse: collapse;">
                    <thead>
                        <tr style="font-size: 11px; text-transform: uppercase; color: #7a7885; text-align: left;">
                            <th style="padding: 6px;">"Rank"</th>
                            <th style="padding: 6px;">"Character"</th>
                            <th style="padding: 6px;">"Level"</th>
                            <th style="padding: 6px;">"Job"</th>
                            <th style="padding: 6px;">"Fame"</th>
                            <th style="padding: 6px;">"EXP"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            }
            .into_any()
        }
    }
}

fn rank_style(tier: RankTier, is_current_user: bool) -> String {
    let mut style = format!("border-bottom: 1px solid {BORDER};");
    if let Some(background) = tier.background() {
        style.push_str(&format!(" background: {background};"));
    }
    if is_current_user {
        style.push_str(&format!(" outline: 1px solid {ACCENT}; outline-offset: -1px;"));
    }
    style
}

fn crown_color(tier: RankTier) -> &'static str {
    match tier {
        RankTier::Gold => "#f5c542",
        RankTier::Silver => "#c0c4cc",
        RankTier::Bronze => "#cd7f32",
        RankTier::TopTen | RankTier::Standard => "#7a7885",
    }
}

fn ranking_row(entry: RankingEntry) -> impl IntoView {
    let tier = RankTier::of(entry.rank);
    let category = category_for_job(entry.job_id).unwrap_or_default();
    let guild = entry.guild.clone().unwrap_or_else(|| "-".to_string());
    let star = has_level_star(entry.level);

    view! {
        <tr style=rank_style(tier, entry.is_current_user)>
            <td style="padding: 6px; width: 56px; font-weight: 700;">
                {tier.has_crown().then(|| view! {
                    <span style=format!("color: {}; margin-right: 4px;", crown_color(tier))>"\u{265B}"</span>
                })}
                {format!("#{}", entry.rank)}
            </td>
            <td style="padding: 6px;">
                <div style="display: flex; align-items: center; gap: 10px;">
                    <CharacterAvatar appearance=entry.appearance.clone() name=entry.name.clone() />
                    <div>
                        <div style="font-weight: 600;">
                            {entry.name.clone()}
                            {entry.is_current_user.then(|| view! {
                                <span style=format!("margin-left: 6px; font-size: 10px; color: {ACCENT};")>"(You)"</span>
                            })}
                        </div>
                        <div style="font-size: 11px; color: #7a7885;">{guild}</div>
                    </div>
                </div>
            </td>
            <td style="padding: 6px;">
                {entry.level}
                {star.then(|| view! { <span style=format!("color: {ACCENT}; margin-left: 4px;")>"\u{2605}"</span> })}
            </td>
            <td style="padding: 6px;">
                <span title=category>{job_glyph(entry.job_id)}" "{entry.job.clone()}</span>
            </td>
            <td style="padding: 6px;">{format_signed_thousands(entry.fame)}</td>
            <td style="padding: 6px;">{format_thousands(entry.exp)}</td>
        </tr>
    }
}
