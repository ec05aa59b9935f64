//! Client-facing price quote: the rendered deal, the binding financial
//! summary, the accept/reject lifecycle and the spreadsheet export.

pub mod sheet;

use chrono::Utc;
use contracts::deal::{quote_actions, DealPayload, DealStatus, QuoteActions, QuoteItem, QuoteSummary};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::deal::api;
use crate::routes::routes::{deal_cart_path, NEGOTIATIONS_ROUTE};
use crate::shared::api_utils::api_origin;
use crate::shared::export::download_sheet;
use crate::shared::format::{format_int, format_money};
use crate::shared::i18n::{tr, use_locale, Locale, LocaleSwitcher};
use crate::system::auth::context::use_auth;

pub fn status_key(status: DealStatus) -> &'static str {
    match status {
        DealStatus::Negotiation => "status_negotiation",
        DealStatus::Approved => "status_approved",
        DealStatus::Rejected => "status_rejected",
        DealStatus::Cancelled => "status_cancelled",
        DealStatus::Paid => "status_paid",
        DealStatus::Unknown => "status_unknown",
    }
}

/// Where a successful answer leads: accept continues to the deal cart,
/// reject goes back to the negotiations list.
fn answer_target(accept: bool, deal_id: &str) -> String {
    if accept {
        deal_cart_path(deal_id)
    } else {
        NEGOTIATIONS_ROUTE.to_string()
    }
}

/// Known shipping codes get a translation, everything else passes
/// through untouched.
pub fn shipping_label(locale: Locale, raw: Option<&str>) -> String {
    match raw {
        Some(code) if code.eq_ignore_ascii_case("sea") => tr(locale, "shipping_sea"),
        Some(code) if code.eq_ignore_ascii_case("land") => tr(locale, "shipping_land"),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[component]
pub fn PriceQuotePage() -> impl IntoView {
    let locale = use_locale();
    let (auth_state, _) = use_auth();
    let params = use_params_map();
    let navigate = use_navigate();

    let payload = RwSignal::new(Option::<DealPayload>::None);
    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);
    let (acting, set_acting) = signal(false);
    let (action_error, set_action_error) = signal(Option::<String>::None);

    let load = move || {
        let deal_id = params.read_untracked().get("deal_id").unwrap_or_default();
        set_loading.set(true);
        set_load_error.set(None);
        spawn_local(async move {
            match api::fetch_deal(&deal_id).await {
                Ok(fetched) => payload.set(Some(fetched)),
                Err(err) => set_load_error.set(Some(err)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        params.track();
        load();
    });

    // Accept or reject. On success the page is left entirely; the control
    // only comes back when the call fails.
    let answer = {
        let navigate = navigate.clone();
        move |accept: bool| {
            if acting.get_untracked() {
                return;
            }
            let current_locale = locale.get_untracked();
            let failure_key = if accept { "accept_failed" } else { "reject_failed" };
            let Some(token) = auth_state.get_untracked().token else {
                set_action_error.set(Some(tr(current_locale, failure_key)));
                return;
            };
            let deal_id = params.read_untracked().get("deal_id").unwrap_or_default();

            set_acting.set(true);
            set_action_error.set(None);
            let navigate = navigate.clone();
            spawn_local(async move {
                let result = if accept {
                    api::client_accept(&deal_id, &token).await
                } else {
                    api::client_reject(&deal_id, &token).await
                };
                match result {
                    Ok(()) => navigate(&answer_target(accept, &deal_id), Default::default()),
                    Err(err) => {
                        set_acting.set(false);
                        log::warn!("quote answer failed for deal {}: {}", deal_id, err);
                        set_action_error.set(Some(format!("{}: {}", tr(current_locale, failure_key), err)));
                    }
                }
            });
        }
    };

    view! {
        <div class="price-quote-page" dir=move || locale.get().dir()>
            <header class="page-header">
                <h1>{move || tr(locale.get(), "platform_name")}</h1>
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
                            <button on:click=move |_| load()>{tr(locale.get(), "retry")}</button>
                        </div>
                    }
                    .into_any();
                }
                let Some(current) = payload.get() else {
                    return ().into_any();
                };

                let current_locale = locale.get();
                let deal = current.deal;
                let origin = api_origin();
                let items: Vec<QuoteItem> = deal
                    .items()
                    .iter()
                    .filter_map(|line| QuoteItem::from_deal_item(line, &origin))
                    .collect();
                let summary = QuoteSummary::compute(&deal, &items, current.platform_settings.as_ref());
                let actions = quote_actions(&deal, Utc::now());

                let export = {
                    let deal = deal.clone();
                    let items = items.clone();
                    move |_| {
                        let sheet = sheet::quote_sheet(locale.get_untracked(), &deal, &items, &summary);
                        let name = deal.deal_number.clone().unwrap_or_else(|| deal.id.clone());
                        if let Err(err) = download_sheet(&sheet, &format!("price-quote-{}.xls", name)) {
                            log::warn!("sheet export failed: {err}");
                        }
                    }
                };

                let go_to_cart = {
                    let navigate = navigate.clone();
                    let deal_id = deal.id.clone();
                    move |_| navigate(&deal_cart_path(&deal_id), Default::default())
                };

                let notice = match actions {
                    QuoteActions::Expired => {
                        Some(("notice error", tr(current_locale, "quote_expired")))
                    }
                    QuoteActions::GoToCart => {
                        Some(("notice ok", tr(current_locale, "quote_accepted_go_cart")))
                    }
                    QuoteActions::PaymentCompleted => {
                        Some(("notice ok", tr(current_locale, "payment_completed")))
                    }
                    QuoteActions::AutoCancelled => {
                        Some(("notice error", tr(current_locale, "auto_cancelled_notice")))
                    }
                    QuoteActions::Cancelled => {
                        Some(("notice error", tr(current_locale, "cancelled_notice")))
                    }
                    QuoteActions::AcceptOrReject | QuoteActions::ReadOnly => None,
                };

                view! {
                    <h2>{tr(current_locale, "price_quote")}</h2>

                    <dl class="deal-info">
                        <dt>{tr(current_locale, "deal_number")}</dt>
                        <dd>{deal.deal_number.clone().unwrap_or_else(|| deal.id.clone())}</dd>
                        <dt>{tr(current_locale, "date")}</dt>
                        <dd>{deal.created_at.clone().map(|d| d.chars().take(10).collect::<String>()).unwrap_or_default()}</dd>
                        <dt>{tr(current_locale, "client")}</dt>
                        <dd>{deal.client.as_ref().and_then(|p| p.display_name()).unwrap_or_default().to_string()}</dd>
                        <dt>{tr(current_locale, "trader")}</dt>
                        <dd>{deal.trader.as_ref().and_then(|p| p.display_name()).unwrap_or_default().to_string()}</dd>
                        <dt>{tr(current_locale, "employee")}</dt>
                        <dd>{deal.employee.as_ref().and_then(|p| p.display_name()).unwrap_or_default().to_string()}</dd>
                        <dt>{tr(current_locale, "shipping_type")}</dt>
                        <dd>{shipping_label(current_locale, deal.shipping_type.as_deref())}</dd>
                        <dt>{tr(current_locale, "status")}</dt>
                        <dd>{tr(current_locale, status_key(deal.status))}</dd>
                    </dl>

                    {notice.map(|(class, text)| view! { <p class=class>{text}</p> })}

                    <table class="quote-items">
                        <thead>
                            <tr>
                                <th>{tr(current_locale, "serial")}</th>
                                <th>{tr(current_locale, "item")}</th>
                                <th>{tr(current_locale, "item_number")}</th>
                                <th>{tr(current_locale, "negotiated_quantity")}</th>
                                <th>{tr(current_locale, "unit_price")}</th>
                                <th>{tr(current_locale, "negotiated_price")}</th>
                                <th>{tr(current_locale, "cbm")}</th>
                                <th>{tr(current_locale, "total")}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {items
                                .iter()
                                .enumerate()
                                .map(|(index, item)| {
                                    view! {
                                        <tr>
                                            <td>{(index + 1).to_string()}</td>
                                            <td>
                                                <img class="thumb" src=item.image.clone() alt=item.title.clone() />
                                                {item.title.clone()}
                                            </td>
                                            <td>{item.item_number.clone()}</td>
                                            <td>{format_int(item.negotiated_quantity)}</td>
                                            <td>{format_money(item.price_per_piece)}</td>
                                            <td>{format_money(item.negotiated_price)}</td>
                                            <td>{format_money(item.item_cbm())}</td>
                                            <td>{format_money(item.total_price())}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>

                    <dl class="financial-summary">
                        <dt>{tr(current_locale, "deal_amount")}</dt>
                        <dd>{format_money(summary.deal_amount)}</dd>
                        <dt>{format!("{} ({}%)", tr(current_locale, "platform_commission"), summary.platform_rate)}</dt>
                        <dd>{format_money(summary.platform_commission)}</dd>
                        <dt>{format!("{} ({}%)", tr(current_locale, "shipping_commission"), summary.shipping_rate)}</dt>
                        <dd>{format_money(summary.shipping_commission)}</dd>
                        <dt class="grand-total">{tr(current_locale, "grand_total")}</dt>
                        <dd class="grand-total">{format_money(summary.grand_total)}</dd>
                    </dl>

                    {move || {
                        action_error
                            .get()
                            .map(|message| view! { <p class="submit-error">{message}</p> })
                    }}

                    <div class="quote-actions">
                        <button class="export" on:click=export>
                            {tr(current_locale, "download_sheet")}
                        </button>
                        {(actions == QuoteActions::AcceptOrReject)
                            .then(|| {
                                let accept = {
                                    let answer = answer.clone();
                                    move |_| answer(true)
                                };
                                let reject = {
                                    let answer = answer.clone();
                                    move |_| answer(false)
                                };
                                view! {
                                    <button
                                        class="accept"
                                        disabled=move || acting.get()
                                        on:click=accept
                                    >
                                        {move || {
                                            if acting.get() {
                                                tr(locale.get(), "processing")
                                            } else {
                                                tr(locale.get(), "accept_quote")
                                            }
                                        }}
                                    </button>
                                    <button
                                        class="reject"
                                        disabled=move || acting.get()
                                        on:click=reject
                                    >
                                        {move || {
                                            if acting.get() {
                                                tr(locale.get(), "processing")
                                            } else {
                                                tr(locale.get(), "reject_quote")
                                            }
                                        }}
                                    </button>
                                }
                            })}
                        {(actions == QuoteActions::GoToCart)
                            .then(|| {
                                view! {
                                    <button class="go-to-cart" on:click=go_to_cart>
                                        {tr(current_locale, "go_to_cart")}
                                    </button>
                                }
                            })}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_quotes_continue_to_the_cart() {
        assert_eq!(answer_target(true, "d1"), "/deals/d1/cart");
    }

    #[test]
    fn rejected_quotes_return_to_the_negotiation_list() {
        assert_eq!(answer_target(false, "d1"), "/negotiations");
    }

    #[test]
    fn shipping_codes_are_translated() {
        assert_eq!(shipping_label(Locale::En, Some("sea")), "Sea freight");
        assert_eq!(shipping_label(Locale::Ar, Some("SEA")), "شحن بحري");
        assert_eq!(shipping_label(Locale::En, Some("express")), "express");
        assert_eq!(shipping_label(Locale::En, None), "");
    }
}
