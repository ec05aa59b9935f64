use crate::routes::routes::AppRoutes;
use crate::shared::i18n::LocaleProvider;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <LocaleProvider>
            <AuthProvider>
                <AppRoutes />
            </AuthProvider>
        </LocaleProvider>
    }
}
