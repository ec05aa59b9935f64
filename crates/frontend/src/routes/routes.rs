use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

use crate::deal::ui::negotiations::NegotiationsPage;
use crate::deal::ui::price_quote::PriceQuotePage;
use crate::offer::ui::seller_products::SellerProductsPage;
use crate::shared::i18n::{tr, use_locale, LocaleSwitcher};

pub const NEGOTIATIONS_ROUTE: &str = "/negotiations";

pub fn quote_path(deal_id: &str) -> String {
    format!("/deals/{}/quote", deal_id)
}

pub fn deal_cart_path(deal_id: &str) -> String {
    format!("/deals/{}/cart", deal_id)
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <HomePage /> }>
                <Route path=path!("/") view=HomePage />
                <Route path=path!("/traders/:trader_id/products") view=SellerProductsPage />
                <Route path=path!("/negotiations") view=NegotiationsPage />
                <Route path=path!("/deals/:deal_id/quote") view=PriceQuotePage />
                <Route path=path!("/deals/:deal_id/cart") view=DealCartPage />
            </Routes>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let locale = use_locale();

    view! {
        <div class="home-page" dir=move || locale.get().dir()>
            <header class="page-header">
                <h1>{move || tr(locale.get(), "platform_name")}</h1>
                <LocaleSwitcher />
            </header>
            <p>{move || tr(locale.get(), "platform_tagline")}</p>
            <A href=NEGOTIATIONS_ROUTE>{move || tr(locale.get(), "negotiations")}</A>
        </div>
    }
}

/// Payment and shipping continue here once a quote is accepted.
#[component]
fn DealCartPage() -> impl IntoView {
    let locale = use_locale();

    view! {
        <div class="deal-cart-page" dir=move || locale.get().dir()>
            <header class="page-header">
                <h1>{move || tr(locale.get(), "cart_title")}</h1>
                <LocaleSwitcher />
            </header>
            <p>{move || tr(locale.get(), "cart_hint")}</p>
        </div>
    }
}
