//! The client's negotiation list: deal number, status and a link to the
//! quote page of each deal.

use contracts::deal::{Deal, DealStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::deal::api;
use crate::deal::ui::price_quote::status_key;
use crate::routes::routes::quote_path;
use crate::shared::i18n::{tr, use_locale, LocaleSwitcher};
use crate::system::auth::context::use_auth;

#[component]
pub fn NegotiationsPage() -> impl IntoView {
    let locale = use_locale();
    let (auth_state, _) = use_auth();

    let deals = RwSignal::new(Vec::<Deal>::new());
    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);

    // Reload whenever the session becomes available
    Effect::new(move |_| {
        let Some(token) = auth_state.get().token else {
            set_loading.set(false);
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_deals(&token).await {
                Ok(records) => {
                    let decoded: Vec<Deal> = records
                        .into_iter()
                        .filter_map(|record| serde_json::from_value(record).ok())
                        .collect();
                    deals.set(decoded);
                }
                Err(err) => set_load_error.set(Some(err)),
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="negotiations-page" dir=move || locale.get().dir()>
            <header class="page-header">
                <h1>{move || tr(locale.get(), "negotiations")}</h1>
                <LocaleSwitcher />
            </header>

            {move || {
                if loading.get() {
                    return view! { <p class="loading">{tr(locale.get(), "loading")}</p> }.into_any();
                }
                if let Some(err) = load_error.get() {
                    return view! {
                        <div class="load-error">
                            <p>{tr(locale.get(), "load_failed")}</p>
                            <p class="detail">{err}</p>
                        </div>
                    }
                    .into_any();
                }
                if deals.with(Vec::is_empty) {
                    return view! { <p class="empty">{tr(locale.get(), "no_negotiations")}</p> }
                        .into_any();
                }
                view! {
                    <ul class="deal-list">
                        {deals
                            .get()
                            .iter()
                            .map(|deal| {
                                let number = deal
                                    .deal_number
                                    .clone()
                                    .unwrap_or_else(|| deal.id.clone());
                                let status: DealStatus = deal.status;
                                let href = quote_path(&deal.id);
                                view! {
                                    <li>
                                        <span class="deal-number">{number}</span>
                                        <span class="deal-status">
                                            {move || tr(locale.get(), status_key(status))}
                                        </span>
                                        <A href=href>{move || tr(locale.get(), "view_quote")}</A>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any()
            }}
        </div>
    }
}
