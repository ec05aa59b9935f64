//! Trader storefront: the negotiable item list with draft inputs,
//! summary, and the grouped submission flow.

pub mod state;

use contracts::negotiation::draft::{DraftField, NegotiationAction, Totals};
use contracts::negotiation::submit::{
    group_by_offer, AttachItem, AttachItemsBody, CreateNegotiationBody, GroupResult, OfferGroup,
    PublicNegotiationBody, SubmissionReport,
};
use contracts::negotiation::validate::{validate, ValidationError};
use contracts::offer::{normalize_offers, OfferItem};
use contracts::shared::flags::flag_url;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map, use_query_map};

use crate::deal::api as deal_api;
use crate::offer::api as offer_api;
use crate::routes::routes::NEGOTIATIONS_ROUTE;
use crate::shared::api_utils::api_origin;
use crate::shared::format::{format_int, format_money};
use crate::shared::i18n::{tr, use_locale, Locale, LocaleSwitcher};
use crate::shared::inventory;
use crate::system::auth::context::use_auth;
use state::{create_state, dispatch, SellerProductsState};

#[component]
pub fn SellerProductsPage() -> impl IntoView {
    let locale = use_locale();
    let (auth_state, _) = use_auth();
    let params = use_params_map();
    let query = use_query_map();
    let navigate = use_navigate();

    let state = create_state();
    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);
    let (submitting, set_submitting) = signal(false);
    let (submit_error, set_submit_error) = signal(Option::<String>::None);
    let (notes, set_notes) = signal(String::new());
    let (guest_name, set_guest_name) = signal(String::new());
    let (guest_email, set_guest_email) = signal(String::new());
    let (guest_phone, set_guest_phone) = signal(String::new());

    let load = move || {
        let trader_id = params.read_untracked().get("trader_id").unwrap_or_default();
        let offer_id = query.read_untracked().get("offerId");
        set_loading.set(true);
        set_load_error.set(None);
        spawn_local(async move {
            match offer_api::fetch_trader_offers(&trader_id, offer_id.as_deref()).await {
                Ok(records) => {
                    let normalized = normalize_offers(records, offer_id.as_deref(), &api_origin());
                    for warning in &normalized.warnings {
                        log::warn!("offer normalization: {warning}");
                    }
                    state.update(|s| {
                        s.negotiation = contracts::negotiation::NegotiationState::new(normalized.items);
                        s.loaded = true;
                    });
                }
                Err(err) => set_load_error.set(Some(err)),
            }
            set_loading.set(false);
        });
    };

    // Initial load, and reload when the route points at another trader
    Effect::new(move |_| {
        params.track();
        query.track();
        load();
    });

    // Inventory pushes go through the same reducer as keystrokes
    let subscription = inventory::subscribe(move |patch| {
        dispatch(state, NegotiationAction::Inventory(patch));
    });
    on_cleanup(move || drop(subscription));

    let submit = move |_| {
        if submitting.get_untracked() {
            return;
        }
        set_submit_error.set(None);

        let snapshot = state.get_untracked();
        let current_locale = locale.get_untracked();
        if let Err(err) = validate(&snapshot.negotiation) {
            set_submit_error.set(Some(validation_message(current_locale, &err)));
            return;
        }

        let auth = auth_state.get_untracked();
        let name = guest_name.get_untracked().trim().to_string();
        let email = guest_email.get_untracked().trim().to_string();
        let phone = guest_phone.get_untracked().trim().to_string();
        // The public endpoint requires the full guest identity
        if !auth.is_authenticated() && (name.is_empty() || email.is_empty() || phone.is_empty()) {
            set_submit_error.set(Some(tr(current_locale, "guest_contact_required")));
            return;
        }

        let groups = group_by_offer(&snapshot.negotiation);
        let notes = Some(notes.get_untracked())
            .filter(|n| !n.trim().is_empty())
            .map(|n| n.trim().to_string());
        let navigate = navigate.clone();

        set_submitting.set(true);
        spawn_local(async move {
            let report = match auth.token {
                Some(token) => submit_authenticated(groups, &token, notes).await,
                None => submit_public(groups, name, email, phone, notes).await,
            };
            set_submitting.set(false);

            for failure in report.failures() {
                log::warn!(
                    "negotiation for offer {} failed: {}",
                    failure.offer_id,
                    failure.error.as_deref().unwrap_or("unknown error")
                );
            }

            if report.any_succeeded() {
                navigate(NEGOTIATIONS_ROUTE, Default::default());
            } else {
                let message = report
                    .first_error()
                    .map(str::to_string)
                    .unwrap_or_else(|| tr(current_locale, "request_failed"));
                set_submit_error.set(Some(message));
            }
        });
    };

    view! {
        <div class="seller-products-page" dir=move || locale.get().dir()>
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
                if state.with(|s| s.negotiation.items.is_empty()) {
                    return view! { <p class="empty">{tr(locale.get(), "no_products")}</p> }.into_any();
                }
                view! {
                    <div class="products">
                        {move || {
                            state
                                .get()
                                .negotiation
                                .items
                                .iter()
                                .cloned()
                                .map(|item| view! { <ItemCard state locale item /> })
                                .collect_view()
                        }}
                    </div>
                    <SummaryTable state locale />
                    <div class="notes-block">
                        <label>{move || tr(locale.get(), "notes")}</label>
                        <textarea
                            placeholder=move || tr(locale.get(), "notes_placeholder")
                            prop:value=move || notes.get()
                            on:input=move |ev| set_notes.set(event_target_value(&ev))
                        ></textarea>
                    </div>
                    {move || {
                        (!auth_state.get().is_authenticated())
                            .then(|| {
                                view! {
                                    <div class="guest-contact">
                                        <h3>{tr(locale.get(), "guest_contact")}</h3>
                                        <input
                                            placeholder=move || tr(locale.get(), "guest_name")
                                            prop:value=move || guest_name.get()
                                            on:input=move |ev| set_guest_name.set(event_target_value(&ev))
                                        />
                                        <input
                                            type="email"
                                            placeholder=move || tr(locale.get(), "guest_email")
                                            prop:value=move || guest_email.get()
                                            on:input=move |ev| set_guest_email.set(event_target_value(&ev))
                                        />
                                        <input
                                            type="tel"
                                            placeholder=move || tr(locale.get(), "guest_phone")
                                            prop:value=move || guest_phone.get()
                                            on:input=move |ev| set_guest_phone.set(event_target_value(&ev))
                                        />
                                    </div>
                                }
                            })
                    }}
                    {move || {
                        submit_error
                            .get()
                            .map(|message| view! { <p class="submit-error">{message}</p> })
                    }}
                    <button class="submit" disabled=move || submitting.get() on:click=submit.clone()>
                        {move || {
                            if submitting.get() {
                                tr(locale.get(), "sending")
                            } else {
                                tr(locale.get(), "send_request")
                            }
                        }}
                    </button>
                }
                .into_any()
            }}
        </div>
    }
}

#[component]
fn ItemCard(
    state: RwSignal<SellerProductsState>,
    locale: RwSignal<Locale>,
    item: OfferItem,
) -> impl IntoView {
    let draft = state.with_untracked(|s| s.negotiation.draft(&item.id));
    let requested = draft.quantity_value();
    let carton = item.pieces_per_carton.max(1);

    let set_quantity = {
        let item_id = item.id.clone();
        move |value: String| {
            dispatch(
                state,
                NegotiationAction::SetField {
                    item_id: item_id.clone(),
                    field: DraftField::Quantity,
                    value,
                },
            );
        }
    };
    let set_price = {
        let item_id = item.id.clone();
        move |value: String| {
            dispatch(
                state,
                NegotiationAction::SetField {
                    item_id: item_id.clone(),
                    field: DraftField::Price,
                    value,
                },
            );
        }
    };

    let step_down = {
        let set_quantity = set_quantity.clone();
        move |_| set_quantity((requested - carton).max(0).to_string())
    };
    let step_up = {
        let set_quantity = set_quantity.clone();
        move |_| set_quantity((requested + carton).to_string())
    };

    let over_available = requested > item.available_quantity;
    let off_multiple = !item.sold_out && requested > 0 && requested % carton != 0;
    let lower = (requested / carton) * carton;
    let upper = lower + carton;
    let full_cartons = (!off_multiple && requested > 0).then(|| requested / carton);

    let flag = item
        .country_code
        .as_deref()
        .map(|iso| flag_url(iso, 40));

    view! {
        <div class=if item.sold_out { "item-card sold-out" } else { "item-card" }>
            <img class="item-image" src=item.image.clone() alt=item.title.clone() />
            <div class="item-info">
                <h3>
                    {flag.map(|src| view! { <img class="flag" src=src /> })}
                    {item.title.clone()}
                    <span class="item-number">{item.item_number.clone()}</span>
                </h3>
                <p class="description">{item.description.clone()}</p>
                {item.sold_out.then(|| view! { <span class="badge">{move || tr(locale.get(), "sold_out")}</span> })}
                <ul class="facts">
                    <li>
                        {move || tr(locale.get(), "available")} ": " {format_int(item.available_quantity)}
                        " (" {move || tr(locale.get(), "reserved")} ": " {format_int(item.reserved_quantity)} ")"
                    </li>
                    <li>{format_int(carton)} " " {move || tr(locale.get(), "pieces_per_carton")}</li>
                    <li>
                        {move || tr(locale.get(), "unit_price")} ": "
                        {format_money(item.price_per_piece)} " " {item.currency.clone()}
                    </li>
                    <li>{move || tr(locale.get(), "cbm")} ": " {format_money(item.cbm)}</li>
                </ul>
            </div>
            <div class="item-draft">
                <label>{move || tr(locale.get(), "negotiation_quantity")}</label>
                <div class="stepper">
                    <button disabled=item.sold_out on:click=step_down>"-"</button>
                    <input
                        type="number"
                        min="0"
                        step=carton.to_string()
                        placeholder=move || tr(locale.get(), "enter_quantity")
                        prop:value=draft.quantity.clone()
                        disabled=item.sold_out
                        on:input={
                            let set_quantity = set_quantity.clone();
                            move |ev| set_quantity(event_target_value(&ev))
                        }
                    />
                    <button disabled=item.sold_out on:click=step_up>"+"</button>
                </div>
                {over_available
                    .then(|| {
                        view! {
                            <p class="hint error">
                                {move || tr(locale.get(), "exceeds_available")}
                                " (" {format_int(item.available_quantity)} ")"
                            </p>
                        }
                    })}
                {off_multiple
                    .then(|| {
                        let lower_btn = (lower > 0).then(|| {
                            let set_quantity = set_quantity.clone();
                            view! {
                                <button class="suggestion" on:click=move |_| set_quantity(lower.to_string())>
                                    {format_int(lower)}
                                </button>
                            }
                        });
                        let set_quantity = set_quantity.clone();
                        view! {
                            <p class="hint warn">
                                {move || tr(locale.get(), "nearest_multiples")} ": "
                                {lower_btn}
                                <button class="suggestion" on:click=move |_| set_quantity(upper.to_string())>
                                    {format_int(upper)}
                                </button>
                            </p>
                        }
                    })}
                {full_cartons
                    .map(|count| {
                        view! {
                            <p class="hint">
                                {format_int(count)} " " {move || tr(locale.get(), "cartons")}
                            </p>
                        }
                    })}
                <label>{move || tr(locale.get(), "negotiation_price")}</label>
                <input
                    type="number"
                    min="0"
                    step="0.01"
                    placeholder=move || tr(locale.get(), "enter_price")
                    prop:value=draft.price.clone()
                    disabled=item.sold_out
                    on:input=move |ev| set_price(event_target_value(&ev))
                />
            </div>
        </div>
    }
}

#[component]
fn SummaryTable(state: RwSignal<SellerProductsState>, locale: RwSignal<Locale>) -> impl IntoView {
    view! {
        <div class="order-summary">
            <h2>{move || tr(locale.get(), "order_summary")}</h2>
            <table>
                <thead>
                    <tr>
                        <th>{move || tr(locale.get(), "item")}</th>
                        <th>{move || tr(locale.get(), "item_number")}</th>
                        <th>{move || tr(locale.get(), "quantity")}</th>
                        <th>{move || tr(locale.get(), "price")}</th>
                        <th>{move || tr(locale.get(), "cbm")}</th>
                        <th>{move || tr(locale.get(), "total")}</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let snapshot = state.get();
                        let negotiation = &snapshot.negotiation;
                        let mut rows = Vec::new();
                        for item in negotiation.selected() {
                            let draft = negotiation.draft(&item.id);
                            let qty = draft.quantity_value();
                            let price = draft.price_value(item.price_per_piece);
                            rows.push(summary_row(item, qty, price, false));
                        }
                        for item in negotiation.sold_out_with_drafts() {
                            let draft = negotiation.draft(&item.id);
                            let qty = draft.quantity_value();
                            let price = draft.price.parse::<f64>().unwrap_or(0.0);
                            rows.push(summary_row(item, qty, price, true));
                        }
                        rows
                    }}
                </tbody>
                <tfoot>
                    {move || {
                        let totals = state.with(|s| Totals::compute(&s.negotiation));
                        view! {
                            <tr>
                                <td>{tr(locale.get(), "total")}</td>
                                <td></td>
                                <td>{format_int(totals.quantity)}</td>
                                <td></td>
                                <td>{format_money(totals.cbm)}</td>
                                <td>{format_money(totals.price)}</td>
                            </tr>
                        }
                    }}
                </tfoot>
            </table>
        </div>
    }
}

fn summary_row(item: &OfferItem, qty: i64, price: f64, sold_out: bool) -> impl IntoView {
    view! {
        <tr class=if sold_out { "sold-out" } else { "" }>
            <td>{item.title.clone()}</td>
            <td>{item.item_number.clone()}</td>
            <td>{format_int(qty)}</td>
            <td>{format_money(price)}</td>
            <td>{format_money(item.cbm_for(qty))}</td>
            <td>{format_money(qty as f64 * price)}</td>
        </tr>
    }
}

/// One request pipeline per offer group: create the deal, then attach the
/// items. A deal whose attach step failed is reported as a failed group;
/// the server keeps the empty deal, so its id goes into the log.
async fn submit_authenticated(
    groups: Vec<OfferGroup>,
    token: &str,
    notes: Option<String>,
) -> SubmissionReport {
    let requests = groups.into_iter().map(|group| {
        let token = token.to_string();
        let notes = notes.clone();
        async move {
            let body = CreateNegotiationBody { notes };
            match offer_api::create_negotiation(&group.offer_id, &token, &body).await {
                Ok(deal_id) => {
                    let attach = AttachItemsBody {
                        items: group.items.iter().map(AttachItem::from).collect(),
                    };
                    match deal_api::add_deal_items(&deal_id, &token, &attach).await {
                        Ok(()) => GroupResult {
                            offer_id: group.offer_id,
                            deal_id: Some(deal_id),
                            error: None,
                        },
                        Err(err) => {
                            log::warn!(
                                "deal {} for offer {} was created but item attachment failed: {}",
                                deal_id,
                                group.offer_id,
                                err
                            );
                            GroupResult {
                                offer_id: group.offer_id,
                                deal_id: Some(deal_id),
                                error: Some(err),
                            }
                        }
                    }
                }
                Err(err) => GroupResult {
                    offer_id: group.offer_id,
                    deal_id: None,
                    error: Some(err),
                },
            }
        }
    });

    SubmissionReport {
        groups: futures::future::join_all(requests).await,
    }
}

/// Guest pipeline: identity and items in one request per group.
async fn submit_public(
    groups: Vec<OfferGroup>,
    name: String,
    email: String,
    phone: String,
    notes: Option<String>,
) -> SubmissionReport {
    let requests = groups.into_iter().map(|group| {
        let body = PublicNegotiationBody {
            name: name.clone(),
            email: email.clone(),
            phone: phone.clone(),
            notes: notes.clone(),
            items: group.items.clone(),
        };
        async move {
            match offer_api::create_negotiation_public(&group.offer_id, &body).await {
                Ok(deal_id) => GroupResult {
                    offer_id: group.offer_id,
                    deal_id,
                    error: None,
                },
                Err(err) => GroupResult {
                    offer_id: group.offer_id,
                    deal_id: None,
                    error: Some(err),
                },
            }
        }
    });

    SubmissionReport {
        groups: futures::future::join_all(requests).await,
    }
}

/// Turn a validation error into one localized message enumerating every
/// offending item.
fn validation_message(locale: Locale, error: &ValidationError) -> String {
    match error {
        ValidationError::NoItemsSelected => tr(locale, "no_items_selected"),
        ValidationError::QuantityExceedsAvailable(offenders) => {
            let details: Vec<String> = offenders
                .iter()
                .map(|o| format!("{} ({} > {})", o.title, o.requested, o.available))
                .collect();
            format!("{} {}", tr(locale, "quantity_exceeds_for"), details.join(", "))
        }
        ValidationError::NotCartonMultiple(offenders) => {
            let details: Vec<String> = offenders
                .iter()
                .map(|o| {
                    let suggestions = match o.lower {
                        Some(lower) => format!("{} / {}", lower, o.upper),
                        None => o.upper.to_string(),
                    };
                    format!("{} ({} x{}: {})", o.title, o.requested, o.carton_size, suggestions)
                })
                .collect();
            format!("{} {}", tr(locale, "carton_multiple_for"), details.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::negotiation::validate::{CartonOffender, QuantityOffender};

    #[test]
    fn validation_messages_enumerate_offenders() {
        let message = validation_message(
            Locale::En,
            &ValidationError::QuantityExceedsAvailable(vec![
                QuantityOffender {
                    item_id: "a".into(),
                    title: "Kettle".into(),
                    requested: 150,
                    available: 100,
                },
                QuantityOffender {
                    item_id: "b".into(),
                    title: "Teapot".into(),
                    requested: 60,
                    available: 50,
                },
            ]),
        );
        assert!(message.contains("Kettle (150 > 100)"));
        assert!(message.contains("Teapot (60 > 50)"));

        let message = validation_message(
            Locale::En,
            &ValidationError::NotCartonMultiple(vec![CartonOffender {
                item_id: "a".into(),
                title: "Kettle".into(),
                requested: 10,
                carton_size: 24,
                lower: None,
                upper: 24,
            }]),
        );
        // No lower multiple below one carton
        assert!(message.contains("Kettle (10 x24: 24)"));
    }
}
